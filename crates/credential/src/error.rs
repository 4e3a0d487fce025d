/// Errors raised while building or using an [`ApiCredential`](crate::ApiCredential).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CredentialError {
    /// A required credential field is absent or blank.
    #[error("credential field `{field}` is required")]
    MissingField {
        /// Field name as shown to users.
        field: &'static str,
    },

    /// The API URL cannot serve as a base for request paths.
    #[error("invalid API URL `{url}`: {reason}")]
    InvalidUrl {
        /// URL as given.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The access token contains characters not allowed in an HTTP header,
    /// or is the redaction marker rather than a real token.
    #[error("access token is not a usable bearer token")]
    InvalidToken,

    /// A request path segment would navigate the path instead of naming
    /// a resource.
    #[error("`{segment}` is not allowed as a path segment")]
    InvalidPathSegment {
        /// Segment as given.
        segment: String,
    },
}
