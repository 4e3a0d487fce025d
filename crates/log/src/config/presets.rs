//! Configuration presets

use super::{Config, DisplayConfig, Format};

/// Level directive variable, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "RYE_LOG";
/// Format variable (`compact`, `pretty` or `json`).
pub const LOG_FORMAT_ENV: &str = "RYE_LOG_FORMAT";

impl Config {
    /// Configuration from `RYE_LOG` / `RUST_LOG` and `RYE_LOG_FORMAT`.
    ///
    /// An unknown format name falls back to compact output.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse().unwrap_or_default();
        }
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.display.colors = false;
        }

        config
    }

    /// Pretty, debug level, with source locations.
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// JSON, info level, flattened, no colors.
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &str)]) -> Config {
        let vars: HashMap<_, _> = vars.iter().map(|(k, v)| (*k, (*v).to_owned())).collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn empty_environment_is_default() {
        assert_eq!(lookup(&[]), Config::default());
    }

    #[test]
    fn rye_log_wins_over_rust_log() {
        let config = lookup(&[("RUST_LOG", "warn"), (LOG_ENV, "rye_resilience=trace")]);
        assert_eq!(config.level, "rye_resilience=trace");

        let config = lookup(&[("RUST_LOG", "warn")]);
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn format_and_colors_from_env() {
        let config = lookup(&[(LOG_FORMAT_ENV, "json"), ("NO_COLOR", "1")]);
        assert_eq!(config.format, Format::Json);
        assert!(!config.display.colors);

        let config = lookup(&[(LOG_FORMAT_ENV, "yaml")]);
        assert_eq!(config.format, Format::Compact);
    }

    #[test]
    fn presets() {
        let dev = Config::development();
        assert_eq!(dev.format, Format::Pretty);
        assert!(dev.display.source);

        let prod = Config::production();
        assert_eq!(prod.format, Format::Json);
        assert!(!prod.display.colors);
        assert!(prod.display.flatten);
    }
}
