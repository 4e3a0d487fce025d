//! Poll configuration
//!
//! A [`PollConfig`] pairs an attempt ceiling with a [`WaitStrategy`]. The
//! strategy is a tagged variant so fields that belong to one strategy can
//! never be set on the other. Durations serialize as (fractional) seconds:
//!
//! ```json
//! { "max_attempts": 20, "strategy": { "type": "exponential", "initial_seconds": 5, "max_seconds": 60 } }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Default attempt ceiling.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
/// Default first wait for exponential backoff.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(5);
/// Default wait ceiling for exponential backoff.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// How long to wait between two consecutive attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WaitStrategy {
    /// Constant wait before every attempt after the first.
    Fixed {
        /// Wait between attempts.
        #[serde(rename = "interval_seconds", with = "seconds")]
        interval: Duration,
    },
    /// Doubling wait, capped at `max`.
    Exponential {
        /// First wait.
        #[serde(rename = "initial_seconds", with = "seconds")]
        initial: Duration,
        /// Ceiling applied after each doubling.
        #[serde(rename = "max_seconds", with = "seconds")]
        max: Duration,
    },
}

impl WaitStrategy {
    /// Fixed interval strategy.
    pub const fn fixed(interval: Duration) -> Self {
        Self::Fixed { interval }
    }

    /// Exponential strategy doubling from `initial` up to `max`.
    pub const fn exponential(initial: Duration, max: Duration) -> Self {
        Self::Exponential { initial, max }
    }

    /// Check strategy invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Fixed { .. } => Ok(()),
            Self::Exponential { initial, max } if initial > max => {
                Err(ConfigError::InitialExceedsMax { initial, max })
            }
            Self::Exponential { .. } => Ok(()),
        }
    }

    /// Strategy name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Exponential { .. } => "exponential",
        }
    }
}

impl Default for WaitStrategy {
    fn default() -> Self {
        Self::exponential(DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_INTERVAL)
    }
}

/// Attempt ceiling plus wait strategy for one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum number of fetches, including the first.
    pub max_attempts: u32,
    /// Wait applied between attempts.
    #[serde(default)]
    pub strategy: WaitStrategy,
}

impl PollConfig {
    /// Create a configuration. Validation happens in [`validate`](Self::validate)
    /// or when a poll starts.
    pub const fn new(max_attempts: u32, strategy: WaitStrategy) -> Self {
        Self {
            max_attempts,
            strategy,
        }
    }

    /// Fixed-interval configuration.
    pub const fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self::new(max_attempts, WaitStrategy::fixed(interval))
    }

    /// Exponential-backoff configuration.
    pub const fn exponential(max_attempts: u32, initial: Duration, max: Duration) -> Self {
        Self::new(max_attempts, WaitStrategy::exponential(initial, max))
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts < 1 {
            return Err(ConfigError::ZeroAttempts);
        }
        self.strategy.validate()
    }

    /// Sum of all waits if every attempt comes back non-terminal.
    ///
    /// This is the upper bound on time spent sleeping; fetch latency is extra.
    pub fn max_total_wait(&self) -> Duration {
        let waits = self.max_attempts.saturating_sub(1) as usize;
        crate::patterns::Backoff::new(self.strategy)
            .take(waits)
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, WaitStrategy::default())
    }
}

/// Serde adapter storing a [`Duration`] as seconds (`f64`).
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        if d.subsec_nanos() == 0 {
            s.serialize_u64(d.as_secs())
        } else {
            s.serialize_f64(d.as_secs_f64())
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|e| D::Error::custom(format!("invalid seconds value {secs}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn default_config_matches_node_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.max_attempts, 20);
        assert_eq!(
            config.strategy,
            WaitStrategy::exponential(Duration::from_secs(5), Duration::from_secs(60))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = PollConfig::fixed(0, Duration::from_secs(1));
        assert_eq!(config.validate(), Err(ConfigError::ZeroAttempts));
    }

    #[test]
    fn initial_above_max_rejected() {
        let config = PollConfig::exponential(3, Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InitialExceedsMax {
                initial: Duration::from_secs(10),
                max: Duration::from_secs(5),
            })
        );
    }

    #[rstest]
    #[case::equal_bounds(Duration::from_secs(7), Duration::from_secs(7))]
    #[case::zero_start(Duration::ZERO, Duration::from_secs(60))]
    #[case::all_zero(Duration::ZERO, Duration::ZERO)]
    fn exponential_bounds_accepted(#[case] initial: Duration, #[case] max: Duration) {
        assert!(PollConfig::exponential(1, initial, max).validate().is_ok());
    }

    #[test]
    fn zero_fixed_interval_accepted() {
        assert!(PollConfig::fixed(5, Duration::ZERO).validate().is_ok());
    }

    #[rstest]
    #[case::single_attempt(PollConfig::fixed(1, Duration::from_secs(5)), 0)]
    #[case::fixed(PollConfig::fixed(10, Duration::from_secs(5)), 45)]
    #[case::exponential(
        PollConfig::exponential(7, Duration::from_secs(5), Duration::from_secs(60)),
        5 + 10 + 20 + 40 + 60 + 60
    )]
    fn max_total_wait(#[case] config: PollConfig, #[case] expected_secs: u64) {
        assert_eq!(config.max_total_wait(), Duration::from_secs(expected_secs));
    }

    #[test]
    fn strategy_serializes_as_tagged_seconds() {
        let config = PollConfig::exponential(20, Duration::from_secs(5), Duration::from_secs(60));
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "max_attempts": 20,
                "strategy": { "type": "exponential", "initial_seconds": 5, "max_seconds": 60 }
            })
        );

        let fixed: WaitStrategy =
            serde_json::from_value(serde_json::json!({ "type": "fixed", "interval_seconds": 2.5 }))
                .unwrap();
        assert_eq!(fixed, WaitStrategy::fixed(Duration::from_millis(2500)));
    }

    #[test]
    fn negative_seconds_rejected_by_deserializer() {
        let result: Result<WaitStrategy, _> =
            serde_json::from_value(serde_json::json!({ "type": "fixed", "interval_seconds": -1 }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_strategy_uses_default() {
        let config: PollConfig =
            serde_json::from_value(serde_json::json!({ "max_attempts": 3 })).unwrap();
        assert_eq!(config.strategy, WaitStrategy::default());
    }
}
