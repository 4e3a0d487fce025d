//! Core poll types: configuration and errors

pub mod config;
pub mod error;

pub use config::{
    DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_INTERVAL, PollConfig, WaitStrategy,
};
pub use error::{ConfigError, PollError, PredicateError};
