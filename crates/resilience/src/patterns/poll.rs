//! Bounded status polling
//!
//! [`poll`] runs a fetch until a terminal value shows up or the attempt
//! ceiling is reached, sleeping between attempts according to the
//! configured [`WaitStrategy`](crate::WaitStrategy).
//!
//! ```rust,ignore
//! use rye_resilience::{PollConfig, TerminalStates, poll};
//! use std::time::Duration;
//!
//! let config = PollConfig::exponential(20, Duration::from_secs(5), Duration::from_secs(60));
//! let terminal = TerminalStates::new("state", ["awaiting_confirmation", "completed", "failed"]);
//!
//! let result = poll(&config, || client.get_checkout_intent(&id), &terminal).await?;
//! if !result.terminal {
//!     // attempts ran out; `result.value` is the last state seen
//! }
//! ```
//!
//! Attempts are strictly sequential. Waiting is a `tokio::time::sleep`, so
//! other tasks keep running while a poll is idle. There is no abort hook:
//! to cancel, race the returned future against your own signal.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::backoff::Backoff;
use super::terminal::TerminalPredicate;
use crate::core::{ConfigError, PollConfig, PollError};
use crate::observability::{PollEvent, PollHook, PollHooks};

/// Outcome of a poll that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult<T> {
    /// Most recently fetched value.
    pub value: T,
    /// Number of fetches performed.
    pub attempts_used: u32,
    /// Whether `value` satisfied the terminal predicate.
    pub terminal: bool,
}

impl<T> PollResult<T> {
    /// Map the value, keeping attempt accounting.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PollResult<U> {
        PollResult {
            value: f(self.value),
            attempts_used: self.attempts_used,
            terminal: self.terminal,
        }
    }

    /// Drop accounting and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Validated poll configuration plus hooks.
///
/// Holds no per-run state: every call to [`run`](Self::run) starts a fresh
/// wait schedule, so one `Poller` can drive any number of independent
/// (even concurrent) polls.
#[derive(Debug, Clone)]
pub struct Poller {
    config: PollConfig,
    hooks: PollHooks,
}

impl Poller {
    /// Validate `config` and build a poller.
    pub fn new(config: PollConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            hooks: PollHooks::new(),
        })
    }

    /// Attach an observability hook.
    pub fn with_hook(mut self, hook: Arc<dyn PollHook>) -> Self {
        self.hooks.add(hook);
        self
    }

    /// Configuration this poller runs with.
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Run one poll.
    ///
    /// The first attempt runs immediately. A fetch or predicate failure
    /// stops the loop at that attempt and is returned as-is; running out of
    /// attempts is *not* an error and yields the last value with
    /// `terminal == false`.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        mut fetch: F,
        is_terminal: &P,
    ) -> Result<PollResult<T>, PollError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: TerminalPredicate<T> + ?Sized,
    {
        let max_attempts = self.config.max_attempts;
        let mut backoff = Backoff::new(self.config.strategy);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.hooks.emit(&PollEvent::Attempt {
                attempt,
                max_attempts,
            });
            debug!(
                attempt,
                max_attempts,
                strategy = self.config.strategy.name(),
                "Polling"
            );

            let value = match fetch().await {
                Ok(value) => value,
                Err(source) => {
                    warn!(attempt, error = %source, "Poll aborted: fetch failed");
                    self.hooks.emit(&PollEvent::Aborted {
                        attempt,
                        error: source.to_string(),
                    });
                    return Err(PollError::Fetch { attempt, source });
                }
            };

            let terminal = match is_terminal.is_terminal(&value) {
                Ok(terminal) => terminal,
                Err(source) => {
                    warn!(attempt, error = %source, "Poll aborted: terminal check failed");
                    self.hooks.emit(&PollEvent::Aborted {
                        attempt,
                        error: source.to_string(),
                    });
                    return Err(PollError::Predicate { attempt, source });
                }
            };

            if terminal {
                info!(attempts = attempt, "Poll reached terminal state");
                self.hooks.emit(&PollEvent::Terminal { attempts: attempt });
                return Ok(PollResult {
                    value,
                    attempts_used: attempt,
                    terminal: true,
                });
            }

            if attempt >= max_attempts {
                info!(
                    attempts = attempt,
                    "Poll exhausted attempts; returning last state"
                );
                self.hooks.emit(&PollEvent::Exhausted { attempts: attempt });
                return Ok(PollResult {
                    value,
                    attempts_used: attempt,
                    terminal: false,
                });
            }

            let delay = backoff.next_delay();
            self.hooks.emit(&PollEvent::Wait { attempt, delay });
            debug!(attempt, delay_ms = delay.as_millis(), "Waiting before next attempt");
            sleep(delay).await;
        }
    }
}

/// Validate `config` and run a single poll with it.
///
/// Shorthand for `Poller::new(*config)?.run(fetch, is_terminal)`; a bad
/// configuration is reported before `fetch` is ever called.
pub async fn poll<T, E, F, Fut, P>(
    config: &PollConfig,
    fetch: F,
    is_terminal: &P,
) -> Result<PollResult<T>, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: TerminalPredicate<T> + ?Sized,
{
    Poller::new(*config)?.run(fetch, is_terminal).await
}
