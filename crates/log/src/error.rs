/// Error raised while installing the logger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// The level directive is not a valid `EnvFilter`.
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// Directive as given.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// The log format name is unknown.
    #[error("unknown log format '{0}' (expected compact, pretty or json)")]
    Format(String),

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}
