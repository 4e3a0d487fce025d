//! # Rye Log
//!
//! One-call `tracing` setup for Rye binaries.
//!
//! ```rust,no_run
//! fn main() -> Result<(), rye_log::LogError> {
//!     let _guard = rye_log::init()?;
//!     tracing::info!(port = 8080, "ready");
//!     Ok(())
//! }
//! ```
//!
//! [`Config::from_env`] reads `RYE_LOG` (then `RUST_LOG`) for the filter and
//! `RYE_LOG_FORMAT` for `compact`, `pretty` or `json` output. Events go to
//! stderr unless configured otherwise.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, Writer};
pub use config::presets::{LOG_ENV, LOG_FORMAT_ENV};
pub use error::LogError;

/// Install a logger configured from the environment.
pub fn init() -> Result<LoggerGuard, LogError> {
    init_with(Config::from_env())
}

/// Install a logger with an explicit configuration.
pub fn init_with(config: Config) -> Result<LoggerGuard, LogError> {
    LoggerBuilder::from_config(config).build()
}
