//! Logger builder

use tracing::span::EnteredSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{Config, Format, Writer};
use crate::error::LogError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Build a human-readable fmt layer with the shared display toggles.
macro_rules! create_fmt_layer {
    ($format:ident, $display:expr, $writer:expr) => {{
        let layer = tracing_subscriber::fmt::layer()
            .$format()
            .with_writer($writer)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source);
        if $display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}

/// JSON flavour of [`create_fmt_layer`].
macro_rules! create_json_layer {
    ($display:expr, $writer:expr) => {{
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer($writer)
            .with_current_span(true)
            .flatten_event($display.flatten)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source);
        if $display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}

/// Installs a global `tracing` subscriber from a [`Config`].
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps logger resources alive; hold it for the lifetime of `main`.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<EnteredSpan>,
}

impl LoggerBuilder {
    /// Builder for `config`.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Configuration to be installed.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Install the subscriber.
    ///
    /// Fails with [`LogError::AlreadyInitialized`] instead of panicking when
    /// another subscriber is already global.
    pub fn build(self) -> Result<LoggerGuard, LogError> {
        let filter = EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })?;

        let fmt_layer = self.fmt_layer();
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter))
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)?;

        let root_span = self
            .config
            .service
            .as_deref()
            .map(|service| tracing::info_span!("app", service).entered());

        tracing::debug!(
            level = %self.config.level,
            format = %self.config.format,
            "logger initialized"
        );
        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let display = &self.config.display;
        let writer = match self.config.writer {
            Writer::Stderr => BoxMakeWriter::new(std::io::stderr),
            Writer::Stdout => BoxMakeWriter::new(std::io::stdout),
        };

        match self.config.format {
            Format::Compact => create_fmt_layer!(compact, display, writer),
            Format::Pretty => create_fmt_layer!(pretty, display, writer),
            Format::Json => create_json_layer!(display, writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_is_reported_before_install() {
        let config = Config {
            level: "rye=[".to_owned(),
            ..Config::default()
        };
        let err = LoggerBuilder::from_config(config).build().unwrap_err();
        assert!(matches!(err, LogError::Filter { ref filter, .. } if filter == "rye=["));
    }
}
