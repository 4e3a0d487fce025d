//! Observability hooks for polling
//!
//! A [`Poller`](crate::Poller) reports every lifecycle step as a
//! [`PollEvent`] to its hooks. The loop itself already logs through
//! `tracing`; hooks are for callers that want to count, record or forward
//! those events somewhere else.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle event emitted by a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A fetch is about to run.
    Attempt {
        /// 1-based attempt number.
        attempt: u32,
        /// Attempt ceiling of this poll.
        max_attempts: u32,
    },
    /// The poll is about to sleep before the next attempt.
    Wait {
        /// Attempt that just finished non-terminal.
        attempt: u32,
        /// Sleep duration.
        delay: Duration,
    },
    /// A terminal value was observed.
    Terminal {
        /// Attempts used.
        attempts: u32,
    },
    /// All attempts came back non-terminal.
    Exhausted {
        /// Attempts used.
        attempts: u32,
    },
    /// A fetch or predicate failed and the poll aborted.
    Aborted {
        /// Attempt that failed.
        attempt: u32,
        /// Rendered error.
        error: String,
    },
}

impl fmt::Display for PollEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempt {
                attempt,
                max_attempts,
            } => write!(f, "poll attempt {attempt}/{max_attempts}"),
            Self::Wait { attempt, delay } => {
                write!(f, "waiting {delay:?} after attempt {attempt}")
            }
            Self::Terminal { attempts } => write!(f, "terminal state after {attempts} attempt(s)"),
            Self::Exhausted { attempts } => {
                write!(f, "no terminal state after {attempts} attempt(s)")
            }
            Self::Aborted { attempt, error } => write!(f, "aborted on attempt {attempt}: {error}"),
        }
    }
}

/// Receives poll lifecycle events.
pub trait PollHook: Send + Sync {
    /// Called for every event, in order.
    fn on_event(&self, event: &PollEvent);
}

/// Ordered collection of hooks.
#[derive(Default, Clone)]
pub struct PollHooks {
    hooks: Vec<Arc<dyn PollHook>>,
}

impl PollHooks {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook.
    pub fn add(&mut self, hook: Arc<dyn PollHook>) {
        self.hooks.push(hook);
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn emit(&self, event: &PollEvent) {
        for hook in &self.hooks {
            hook.on_event(event);
        }
    }
}

impl fmt::Debug for PollHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollHooks")
            .field("len", &self.hooks.len())
            .finish()
    }
}

/// Hook that forwards events to `tracing` at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct LoggingHook {
    level: tracing::Level,
}

impl LoggingHook {
    /// Log every event at `level`.
    pub const fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingHook {
    fn default() -> Self {
        Self::new(tracing::Level::DEBUG)
    }
}

impl PollHook for LoggingHook {
    fn on_event(&self, event: &PollEvent) {
        match self.level {
            tracing::Level::ERROR => tracing::error!(%event, "poll event"),
            tracing::Level::WARN => tracing::warn!(%event, "poll event"),
            tracing::Level::INFO => tracing::info!(%event, "poll event"),
            tracing::Level::DEBUG => tracing::debug!(%event, "poll event"),
            _ => tracing::trace!(%event, "poll event"),
        }
    }
}
