//! Error types for polling

use std::time::Duration;

/// Rejected poll configuration.
///
/// Raised before the first fetch is attempted, so a misconfigured poll
/// never performs partial work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `max_attempts` must allow at least one fetch.
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    /// Exponential backoff whose starting wait exceeds its ceiling.
    #[error("initial interval {initial:?} exceeds max interval {max:?}")]
    InitialExceedsMax {
        /// Configured first wait.
        initial: Duration,
        /// Configured ceiling.
        max: Duration,
    },
}

/// A terminal predicate could not decide on a fetched value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PredicateError {
    /// The status field is absent from the fetched value.
    #[error("field `{field}` is missing from the response")]
    MissingField {
        /// Field that was looked up.
        field: String,
    },

    /// The status field exists but is not a string tag.
    #[error("field `{field}` is not a string (found {found})")]
    NotAString {
        /// Field that was looked up.
        field: String,
        /// JSON type name of the value found instead.
        found: &'static str,
    },

    /// Free-form failure raised by a caller-supplied predicate.
    #[error("{0}")]
    Custom(String),
}

impl PredicateError {
    /// Create a custom predicate failure.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Error returned by a poll.
///
/// A fetch that *succeeded* with a non-terminal value is never an error;
/// only configuration problems and failures of the supplied callbacks end
/// up here.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PollError<E> {
    /// The configuration was rejected before any fetch ran.
    #[error("invalid poll configuration: {0}")]
    Config(#[from] ConfigError),

    /// The fetch callback failed; the loop stopped at this attempt.
    #[error("fetch failed on attempt {attempt}: {source}")]
    Fetch {
        /// 1-based attempt that failed.
        attempt: u32,
        /// Error produced by the fetch.
        source: E,
    },

    /// The terminal predicate failed on a fetched value.
    #[error("terminal check failed on attempt {attempt}: {source}")]
    Predicate {
        /// 1-based attempt whose value could not be classified.
        attempt: u32,
        /// Predicate failure.
        source: PredicateError,
    },
}

impl<E> PollError<E> {
    /// Attempt at which the poll aborted, if any fetch ran.
    pub fn attempt(&self) -> Option<u32> {
        match self {
            Self::Config(_) => None,
            Self::Fetch { attempt, .. } | Self::Predicate { attempt, .. } => Some(*attempt),
        }
    }

    /// Returns `true` if the poll never started because of bad configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Take the fetch error out, if this was a fetch failure.
    pub fn into_fetch_error(self) -> Option<E> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
