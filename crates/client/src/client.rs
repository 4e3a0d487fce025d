use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use rye_credential::ApiCredential;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;
use crate::model::{ConfirmCheckoutIntent, CreateCheckoutIntent};

/// Operations of the checkout API used by the node.
///
/// The node talks to this trait rather than to [`HttpCheckoutClient`], so
/// tests can drive it with an in-memory fake.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// `POST /checkout-intents`
    async fn create_checkout_intent(&self, request: &CreateCheckoutIntent)
    -> Result<Value, ApiError>;

    /// `GET /checkout-intents/{id}`
    async fn get_checkout_intent(&self, id: &str) -> Result<Value, ApiError>;

    /// `POST /checkout-intents/{id}/confirm`
    async fn confirm_checkout_intent(
        &self,
        id: &str,
        request: &ConfirmCheckoutIntent,
    ) -> Result<Value, ApiError>;

    /// `GET /brands/domain/{domain}`
    async fn verify_brand_support(&self, domain: &str) -> Result<Value, ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<Value, ApiError>;
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("rye-rs/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// [`CheckoutApi`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpCheckoutClient {
    http: reqwest::Client,
    credential: ApiCredential,
}

impl HttpCheckoutClient {
    /// Client with default settings.
    pub fn new(credential: ApiCredential) -> Result<Self, ApiError> {
        Self::with_config(credential, ClientConfig::default())
    }

    /// Client with explicit settings.
    pub fn with_config(credential: ApiCredential, config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, credential.authorization_header()?);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { http, credential })
    }

    /// Credential this client sends.
    pub fn credential(&self) -> &ApiCredential {
        &self.credential
    }

    async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.credential.endpoint(segments)?;
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(ApiError::Encode)?;
            request = request.body(bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%method, %url, status = status.as_u16(), len = bytes.len(), "API response");

        if !status.is_success() {
            let err = ApiError::from_status(status, &bytes);
            warn!(%method, %url, error = %err, "API request failed");
            return Err(err);
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { status, source })
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutClient {
    #[instrument(skip_all, fields(product_url = %request.product_url))]
    async fn create_checkout_intent(
        &self,
        request: &CreateCheckoutIntent,
    ) -> Result<Value, ApiError> {
        self.send(Method::POST, &["checkout-intents"], Some(request))
            .await
    }

    #[instrument(skip(self))]
    async fn get_checkout_intent(&self, id: &str) -> Result<Value, ApiError> {
        self.send::<()>(Method::GET, &["checkout-intents", id], None)
            .await
    }

    #[instrument(skip(self, request))]
    async fn confirm_checkout_intent(
        &self,
        id: &str,
        request: &ConfirmCheckoutIntent,
    ) -> Result<Value, ApiError> {
        self.send(Method::POST, &["checkout-intents", id, "confirm"], Some(request))
            .await
    }

    #[instrument(skip(self))]
    async fn verify_brand_support(&self, domain: &str) -> Result<Value, ApiError> {
        self.send::<()>(Method::GET, &["brands", "domain", domain], None)
            .await
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<Value, ApiError> {
        let test = ApiCredential::test_request();
        let path = test.path.trim_start_matches('/');
        self.send::<()>(test.method, &[path], None).await
    }
}
