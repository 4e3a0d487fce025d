use http::StatusCode;
use rye_credential::CredentialError;
use serde_json::Value;

/// Error returned by checkout API calls.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("{status}: {message}")]
    Status {
        /// HTTP status.
        status: StatusCode,
        /// Message taken from the body, or the status reason.
        message: String,
        /// Parsed JSON body, when the API sent one.
        body: Option<Value>,
    },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body is not JSON.
    #[error("invalid JSON in {status} response: {source}")]
    Decode {
        /// HTTP status.
        status: StatusCode,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// Request body could not be encoded.
    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The credential cannot be turned into request headers.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl ApiError {
    /// Build a status error from a response body.
    ///
    /// The message is the body's `message` (or `error`) string when present,
    /// else the canonical reason phrase.
    pub fn from_status(status: StatusCode, raw_body: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(raw_body).ok();
        let message = body
            .as_ref()
            .and_then(body_message)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| "unexpected status".to_owned());
        Self::Status {
            status,
            message,
            body,
        }
    }

    /// JSON body of a failed response, if any.
    pub fn response_data(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_owned)
}
