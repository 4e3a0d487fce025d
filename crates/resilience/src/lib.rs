//! # Rye Resilience
//!
//! Bounded status polling for long-running remote operations.
//!
//! A poll fetches a value, asks a [`TerminalPredicate`] whether it is final,
//! and otherwise sleeps according to a [`WaitStrategy`] before trying again,
//! for at most [`PollConfig::max_attempts`] fetches.
//!
//! - **Fixed** waits the same interval before every attempt after the first.
//! - **Exponential** starts at `initial` and doubles up to `max`.
//!
//! Running out of attempts is not an error: the last value comes back with
//! [`PollResult::terminal`] set to `false`, and the caller decides what that
//! means. Fetch and predicate failures abort the poll immediately.
//!
//! ## Quick Start
//!
//! ```rust
//! use rye_resilience::{PollConfig, TerminalStates, poll};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PollConfig::fixed(3, Duration::from_millis(1));
//! let terminal = TerminalStates::new("state", ["completed", "failed"]);
//!
//! let result = poll(
//!     &config,
//!     || async { Ok::<_, std::io::Error>(json!({ "state": "completed" })) },
//!     &terminal,
//! )
//! .await?;
//!
//! assert!(result.terminal);
//! assert_eq!(result.attempts_used, 1);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod core;
pub mod observability;
pub mod patterns;

pub use core::{
    ConfigError, DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_INTERVAL, PollConfig,
    PollError, PredicateError, WaitStrategy,
};
pub use observability::{LoggingHook, PollEvent, PollHook, PollHooks};
pub use patterns::{
    Backoff, PollResult, Poller, TerminalPredicate, TerminalStates, TryPredicate, poll,
};
