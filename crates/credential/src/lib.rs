//! # Rye Credential
//!
//! The `ryeApi` credential: an API base URL and a bearer access token.
//!
//! - [`ApiCredential`] validates both fields, builds the `Authorization`
//!   header and resolves request paths below the base URL.
//! - [`SecretString`] keeps the token out of logs and wipes it on drop.
//! - [`CredentialDescription`] describes the credential form for hosts.
//!
//! ```rust
//! use rye_credential::ApiCredential;
//!
//! let credential = ApiCredential::with_default_url("rye_sk_test").unwrap();
//! let url = credential.endpoint(["checkout-intents", "ci_123"]).unwrap();
//! assert_eq!(url.path(), "/api/v1/checkout-intents/ci_123");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credential;
mod description;
mod error;
mod secret;

pub use credential::{
    ACCESS_TOKEN_ENV, API_URL_ENV, ApiCredential, CredentialTest, DEFAULT_API_URL,
};
pub use description::{CREDENTIAL_KEY, CredentialDescription, CredentialProperty};
pub use error::CredentialError;
pub use secret::SecretString;
