//! Request bodies
//!
//! Responses stay `serde_json::Value`: their shape belongs to the API and
//! the node passes them through untouched.

use rye_credential::SecretString;
use serde::{Deserialize, Serialize, Serializer};

/// Buyer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    /// Buyer email.
    pub email: String,
}

/// US shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient first name.
    pub first_name: String,
    /// Recipient last name.
    pub last_name: String,
    /// Street line 1.
    pub address1: String,
    /// Street line 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    pub city: String,
    /// Two-letter state code.
    pub province_code: String,
    /// ZIP code.
    pub postal_code: String,
    /// Two-letter country code.
    pub country_code: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Items bought when no quantity is given.
pub const DEFAULT_QUANTITY: u32 = 1;

fn default_quantity() -> u32 {
    DEFAULT_QUANTITY
}

/// Body of `POST /checkout-intents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutIntent {
    /// Product page on a supported merchant.
    pub product_url: String,
    /// Number of items to buy, at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Buyer.
    pub buyer: Buyer,
    /// Where to ship.
    pub shipping_address: ShippingAddress,
}

/// Payment method sent on confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    /// Stripe token.
    #[serde(serialize_with = "expose_secret")]
    pub token: SecretString,
}

/// Body of `POST /checkout-intents/{id}/confirm`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmCheckoutIntent {
    /// Payment method.
    pub payment_method: PaymentMethod,
}

impl ConfirmCheckoutIntent {
    /// Confirm with a Stripe token.
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        Self {
            payment_method: PaymentMethod {
                token: token.into(),
            },
        }
    }
}

// Request bodies are the one place a secret must go out verbatim.
fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    secret.expose_secret(|value| serializer.serialize_str(value))
}
