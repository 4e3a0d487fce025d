use rye_client::ApiError;
use rye_resilience::PollError;
use serde_json::Value;

/// Error type for node execution.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    /// Item parameters were rejected before any request was sent.
    #[error("validation: {0}")]
    Validation(String),

    /// The checkout API rejected a request or could not be reached.
    #[error("api: {message}")]
    Api {
        /// Message from the API error body, or the transport error.
        message: String,
        /// HTTP status, when a response arrived.
        status: Option<u16>,
        /// JSON error body, when the API sent one.
        data: Option<Value>,
    },

    /// Permanent failure that is neither validation nor an API answer.
    #[error("fatal: {error}")]
    Fatal {
        /// Human-readable error message.
        error: String,
        /// Optional structured details about the failure.
        details: Option<Value>,
    },

    /// Execution cancelled via cancellation token.
    #[error("cancelled")]
    Cancelled,

    /// Another error, raised while processing one input item.
    #[error("item {index}: {source}")]
    Item {
        /// Zero-based index of the failing item.
        index: usize,
        /// What went wrong.
        source: Box<ActionError>,
    },
}

impl ActionError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a fatal error.
    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal {
            error: msg.into(),
            details: None,
        }
    }

    /// Create a fatal error with structured details.
    pub fn fatal_with_details(msg: impl Into<String>, details: Value) -> Self {
        Self::Fatal {
            error: msg.into(),
            details: Some(details),
        }
    }

    /// Tag this error with the index of the item that produced it.
    pub fn at_item(self, index: usize) -> Self {
        match self {
            Self::Item { .. } | Self::Cancelled => self,
            other => Self::Item {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Index of the failing item, if tagged.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::Item { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Bare message without the category prefix; what ends up in an
    /// `{ "error": ... }` output item.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Api { message, .. } => message.clone(),
            Self::Fatal { error, .. } => error.clone(),
            Self::Cancelled => "cancelled".to_owned(),
            Self::Item { source, .. } => source.message(),
        }
    }

    /// JSON error body returned by the API, if any.
    pub fn response_data(&self) -> Option<&Value> {
        match self {
            Self::Api { data, .. } => data.as_ref(),
            Self::Item { source, .. } => source.response_data(),
            _ => None,
        }
    }

    /// Returns `true` for cancellation, tagged or not.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Item { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

impl From<ApiError> for ActionError {
    fn from(err: ApiError) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let data = err.response_data().cloned();
        let message = match &err {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self::Api {
            message,
            status,
            data,
        }
    }
}

impl From<PollError<ApiError>> for ActionError {
    fn from(err: PollError<ApiError>) -> Self {
        match err {
            PollError::Config(config) => Self::validation(config.to_string()),
            PollError::Fetch { source, .. } => source.into(),
            other => Self::fatal(other.to_string()),
        }
    }
}
