//! Polling building blocks

pub mod backoff;
pub mod poll;
pub mod terminal;

pub use backoff::Backoff;
pub use poll::{PollResult, Poller, poll};
pub use terminal::{TerminalPredicate, TerminalStates, TryPredicate};
