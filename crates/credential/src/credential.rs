//! The `ryeApi` credential

use std::fmt;

use http::{HeaderValue, Method};
use serde::Deserialize;
use url::Url;

use crate::error::CredentialError;
use crate::secret::{REDACTED, SecretString};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "https://staging.api.rye.com/api/v1";

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "RYE_API_URL";

/// Environment variable holding the access token.
pub const ACCESS_TOKEN_ENV: &str = "RYE_ACCESS_TOKEN";

/// Request a host sends to check that a credential works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialTest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL.
    pub path: &'static str,
}

/// Base URL plus bearer token for the checkout API.
///
/// Every request path is resolved against `api_url` *below* its existing
/// path, so the `/api/v1` prefix of the default URL survives.
///
/// Deserializable from stored fields but never serialized: the token would
/// only come out as a redaction marker.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCredential")]
pub struct ApiCredential {
    api_url: Url,
    access_token: SecretString,
}

/// Unvalidated credential fields as stored by a host.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCredential {
    #[serde(default = "default_api_url")]
    api_url: String,
    #[serde(default)]
    access_token: SecretString,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

impl TryFrom<RawCredential> for ApiCredential {
    type Error = CredentialError;

    fn try_from(raw: RawCredential) -> Result<Self, Self::Error> {
        Self::new(&raw.api_url, raw.access_token)
    }
}

impl ApiCredential {
    /// Build a credential, validating both fields.
    pub fn new(api_url: &str, access_token: impl Into<SecretString>) -> Result<Self, CredentialError> {
        let access_token = access_token.into();
        if access_token.is_blank() {
            return Err(CredentialError::MissingField {
                field: "accessToken",
            });
        }
        if access_token.expose_secret(|token| token.trim() == REDACTED) {
            return Err(CredentialError::InvalidToken);
        }
        Ok(Self {
            api_url: parse_base_url(api_url)?,
            access_token,
        })
    }

    /// Credential against [`DEFAULT_API_URL`].
    pub fn with_default_url(access_token: impl Into<SecretString>) -> Result<Self, CredentialError> {
        Self::new(DEFAULT_API_URL, access_token)
    }

    /// Read the credential from `RYE_API_URL` and `RYE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, CredentialError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the credential through an arbitrary variable lookup.
    ///
    /// A missing or blank URL falls back to [`DEFAULT_API_URL`]; the token
    /// is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let token = lookup(ACCESS_TOKEN_ENV).ok_or(CredentialError::MissingField {
            field: "accessToken",
        })?;
        Self::new(&api_url, token)
    }

    /// API base URL.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Access token.
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// `Authorization: Bearer <token>` header value, marked sensitive.
    pub fn authorization_header(&self) -> Result<HeaderValue, CredentialError> {
        let mut value = self
            .access_token
            .expose_secret(|token| HeaderValue::from_str(&format!("Bearer {token}")))
            .map_err(|_| CredentialError::InvalidToken)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Absolute URL for a request path given as segments.
    ///
    /// Segments are percent-encoded. `.` and `..` are rejected because
    /// URL normalization would turn them into path navigation, so ids and
    /// domains taken from user input stay in their position in the path.
    pub fn endpoint<I>(&self, segments: I) -> Result<Url, CredentialError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .map(|segment| {
                let segment = segment.as_ref();
                match segment.trim() {
                    "." | ".." => Err(CredentialError::InvalidPathSegment {
                        segment: segment.to_owned(),
                    }),
                    _ => Ok(segment.to_owned()),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&segments);
        }
        Ok(url)
    }

    /// Request used to verify this credential: `GET /health`.
    pub const fn test_request() -> CredentialTest {
        CredentialTest {
            method: Method::GET,
            path: "/health",
        }
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("api_url", &self.api_url.as_str())
            .field("access_token", &self.access_token)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, CredentialError> {
    let invalid = |reason: &str| CredentialError::InvalidUrl {
        url: raw.to_owned(),
        reason: reason.to_owned(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("URL must not carry a query or fragment"));
    }
    tracing::trace!(api_url = %url, "parsed API base URL");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn credential() -> ApiCredential {
        ApiCredential::with_default_url("rye_sk_test").unwrap()
    }

    #[test]
    fn endpoint_keeps_api_prefix() {
        let url = credential().endpoint(["checkout-intents", "ci_123"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://staging.api.rye.com/api/v1/checkout-intents/ci_123"
        );
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let cred = ApiCredential::new("https://api.rye.com/api/v1/", "t").unwrap();
        assert_eq!(
            cred.endpoint(["health"]).unwrap().as_str(),
            "https://api.rye.com/api/v1/health"
        );
    }

    #[test]
    fn endpoint_encodes_segments() {
        let url = credential()
            .endpoint(["brands", "domain", "../admin?x=1"])
            .unwrap();
        assert_eq!(url.path(), "/api/v1/brands/domain/..%2Fadmin%3Fx=1");
        assert_eq!(url.query(), None);
    }

    #[rstest]
    #[case::current(".")]
    #[case::parent("..")]
    #[case::padded(" .. ")]
    fn endpoint_rejects_dot_segments(#[case] segment: &str) {
        let err = credential()
            .endpoint(["checkout-intents", segment])
            .unwrap_err();
        assert_eq!(
            err,
            CredentialError::InvalidPathSegment {
                segment: segment.to_owned()
            }
        );
    }

    #[test]
    fn endpoint_keeps_dots_inside_segments() {
        let url = credential().endpoint(["brands", "shop.example.com"]).unwrap();
        assert_eq!(url.path(), "/api/v1/brands/shop.example.com");
    }

    #[test]
    fn authorization_header_is_bearer_and_sensitive() {
        let header = credential().authorization_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer rye_sk_test");
        assert!(header.is_sensitive());
    }

    #[test]
    fn token_with_newline_is_rejected_as_header() {
        let cred = ApiCredential::with_default_url("abc\ndef").unwrap();
        assert_eq!(
            cred.authorization_header(),
            Err(CredentialError::InvalidToken)
        );
    }

    #[rstest]
    #[case::not_a_url("not a url")]
    #[case::ftp("ftp://example.com/api")]
    #[case::mailto("mailto:team@rye.com")]
    #[case::query("https://api.rye.com/api/v1?x=1")]
    fn bad_urls_are_rejected(#[case] url: &str) {
        let err = ApiCredential::new(url, "token").unwrap_err();
        assert!(matches!(err, CredentialError::InvalidUrl { .. }), "{err}");
    }

    #[test]
    fn blank_token_is_missing() {
        assert_eq!(
            ApiCredential::with_default_url("   ").unwrap_err(),
            CredentialError::MissingField {
                field: "accessToken"
            }
        );
    }

    #[test]
    fn lookup_falls_back_to_default_url() {
        let vars = HashMap::from([(ACCESS_TOKEN_ENV, "tok".to_owned())]);
        let cred = ApiCredential::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cred.api_url().as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn lookup_reads_url_and_requires_token() {
        let vars = HashMap::from([(API_URL_ENV, "http://localhost:8080/api/v1".to_owned())]);
        let err = ApiCredential::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, CredentialError::MissingField { .. }));

        let vars = HashMap::from([
            (API_URL_ENV, "http://localhost:8080/api/v1".to_owned()),
            (ACCESS_TOKEN_ENV, "tok".to_owned()),
        ]);
        let cred = ApiCredential::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(cred.endpoint(["health"]).unwrap().as_str(), "http://localhost:8080/api/v1/health");
    }

    #[test]
    fn debug_redacts_token() {
        let debug = format!("{:?}", credential());
        assert!(debug.contains("staging.api.rye.com"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("rye_sk_test"));
    }

    #[test]
    fn deserializes_from_camel_case() {
        let cred: ApiCredential = serde_json::from_value(serde_json::json!({
            "apiUrl": "https://api.rye.com/api/v1",
            "accessToken": "tok"
        }))
        .unwrap();
        assert_eq!(cred.api_url().host_str(), Some("api.rye.com"));
        cred.access_token()
            .expose_secret(|t| assert_eq!(t, "tok"));
    }

    #[test]
    fn deserialization_validates() {
        let err = serde_json::from_value::<ApiCredential>(serde_json::json!({
            "apiUrl": "https://api.rye.com/api/v1"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("accessToken"));

        let cred: ApiCredential =
            serde_json::from_value(serde_json::json!({ "accessToken": "tok" })).unwrap();
        assert_eq!(cred.api_url().as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn redacted_token_is_not_accepted_back() {
        let err = serde_json::from_value::<ApiCredential>(serde_json::json!({
            "apiUrl": "https://api.rye.com/api/v1",
            "accessToken": "[REDACTED]"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("access token"), "{err}");
        assert_eq!(
            ApiCredential::with_default_url("[REDACTED]").unwrap_err(),
            CredentialError::InvalidToken
        );
    }

    #[test]
    fn test_request_is_health_check() {
        let test = ApiCredential::test_request();
        assert_eq!(test.method, Method::GET);
        assert_eq!(test.path, "/health");
    }
}
