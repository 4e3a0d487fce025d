//! # Rye Client
//!
//! Typed HTTP client for the Rye Universal Checkout API.
//!
//! [`CheckoutApi`] is the seam the node programs against;
//! [`HttpCheckoutClient`] implements it with `reqwest`, sending JSON and the
//! bearer token from an [`ApiCredential`](rye_credential::ApiCredential).
//! Responses come back as `serde_json::Value`; a non-success status becomes
//! [`ApiError::Status`] with the parsed error body attached.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
pub mod model;

pub use client::{CheckoutApi, ClientConfig, HttpCheckoutClient};
pub use error::ApiError;
pub use http::StatusCode;
pub use model::{
    Buyer, ConfirmCheckoutIntent, CreateCheckoutIntent, DEFAULT_QUANTITY, PaymentMethod,
    ShippingAddress,
};
