//! Per-item parameter resolution
//!
//! A node is configured once (resource, operation, defaults) and each input
//! item may override any field. Values are read from the item first, then
//! from the node parameters, then fall back to the documented default.

use std::time::Duration;

use rye_client::{
    Buyer, ConfirmCheckoutIntent, CreateCheckoutIntent, DEFAULT_QUANTITY, ShippingAddress,
};
use rye_resilience::{
    DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_INTERVAL, PollConfig,
    TerminalStates, WaitStrategy,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ActionError;

/// Where non-US shipping is explained.
pub const US_ONLY_DOCS_URL: &str = "https://docs.rye.com/api-v2/example-flows/simple-checkout#step-3%3A-create-a-checkout-intent";

/// Field of a checkout intent that carries its lifecycle tag.
pub const DEFAULT_STATE_FIELD: &str = "state";

/// Checkout intent states after which polling stops.
pub const DEFAULT_TERMINAL_STATES: [&str; 3] = ["awaiting_confirmation", "completed", "failed"];

/// API resource a node operates on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    /// Checkout intents.
    #[default]
    CheckoutIntent,
    /// Merchant brands.
    Brand,
}

impl Resource {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckoutIntent => "checkoutIntent",
            Self::Brand => "brand",
        }
    }
}

/// Operation of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Create a checkout intent.
    Create,
    /// Read (and optionally poll) a checkout intent.
    GetStatus,
    /// Confirm a checkout intent with payment.
    Confirm,
    /// Check whether a merchant domain is supported.
    VerifyBrandSupport,
}

impl Operation {
    /// Wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::GetStatus => "getStatus",
            Self::Confirm => "confirm",
            Self::VerifyBrandSupport => "verifyBrandSupport",
        }
    }

    /// Resource this operation belongs to.
    pub const fn resource(self) -> Resource {
        match self {
            Self::Create | Self::GetStatus | Self::Confirm => Resource::CheckoutIntent,
            Self::VerifyBrandSupport => Resource::Brand,
        }
    }

    /// Default operation of `resource`.
    pub const fn default_for(resource: Resource) -> Self {
        match resource {
            Resource::CheckoutIntent => Self::Create,
            Resource::Brand => Self::VerifyBrandSupport,
        }
    }
}

/// Node-level selection of what to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeOperation {
    /// Resource.
    pub resource: Resource,
    /// Operation.
    pub operation: Operation,
}

impl NodeOperation {
    /// Read `resource` and `operation` from node parameters.
    ///
    /// These are fixed per execution; items cannot override them.
    pub fn from_parameters(parameters: &Map<String, Value>) -> Result<Self, ActionError> {
        let resource: Resource = match parameters.get("resource") {
            None | Some(Value::Null) => Resource::default(),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|_| ActionError::validation(format!("unknown resource {value}")))?,
        };
        let operation: Operation = match parameters.get("operation") {
            None | Some(Value::Null) => Operation::default_for(resource),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|_| ActionError::validation(format!("unknown operation {value}")))?,
        };
        if operation.resource() != resource {
            return Err(ActionError::validation(format!(
                "operation `{}` is not available for resource `{}`",
                operation.as_str(),
                resource.as_str()
            )));
        }
        Ok(Self {
            resource,
            operation,
        })
    }
}

/// Polling settings of one Get Status item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolling {
    /// Attempts and wait strategy.
    pub config: PollConfig,
    /// Which states end the poll.
    pub terminal: TerminalStates,
}

/// Fully resolved request for one item.
#[derive(Debug, Clone)]
pub enum ItemRequest {
    /// `POST /checkout-intents`
    Create(CreateCheckoutIntent),
    /// `GET /checkout-intents/{id}`, polled when `polling` is set.
    GetStatus {
        /// Checkout intent id.
        id: String,
        /// Polling settings.
        polling: Option<StatusPolling>,
    },
    /// `POST /checkout-intents/{id}/confirm`
    Confirm {
        /// Checkout intent id.
        id: String,
        /// Payment body.
        body: ConfirmCheckoutIntent,
    },
    /// `GET /brands/domain/{domain}`
    VerifyBrandSupport {
        /// Merchant domain.
        domain: String,
    },
}

impl ItemRequest {
    /// Resolve the request for `operation` from node and item parameters.
    pub fn resolve(
        operation: Operation,
        node: &Map<String, Value>,
        item: &Value,
    ) -> Result<Self, ActionError> {
        let params = Params::new(node, item);
        match operation {
            Operation::Create => create_request(&params).map(Self::Create),
            Operation::GetStatus => Ok(Self::GetStatus {
                id: params.required_string("checkoutIntentId")?,
                polling: status_polling(&params)?,
            }),
            Operation::Confirm => Ok(Self::Confirm {
                id: params.required_string("checkoutIntentId")?,
                body: ConfirmCheckoutIntent::with_token(params.required_string("stripeToken")?),
            }),
            Operation::VerifyBrandSupport => Ok(Self::VerifyBrandSupport {
                domain: params.required_string("domain")?,
            }),
        }
    }
}

fn create_request(params: &Params<'_>) -> Result<CreateCheckoutIntent, ActionError> {
    let product_url = params.required_string("productUrl")?;
    let quantity = params.u32("itemQuantity", DEFAULT_QUANTITY)?;
    if quantity == 0 {
        return Err(ActionError::validation(
            "parameter `itemQuantity` must be at least 1",
        ));
    }
    let email = params.required_string("buyerEmail")?;

    let shipping = params
        .get("shippingAddress")
        .ok_or_else(|| ActionError::validation("parameter `shippingAddress` is required"))?;
    // Accept both `{ address: {...} }` and the bare address object.
    let address = shipping.get("address").unwrap_or(shipping);
    let address = address
        .as_object()
        .ok_or_else(|| ActionError::validation("parameter `shippingAddress` must be an object"))?;
    let fields = Params::single(address);

    let country_code = fields
        .optional_string("countryCode")?
        .unwrap_or_else(|| "US".to_owned());
    if !country_code.eq_ignore_ascii_case("us") {
        return Err(ActionError::validation(format!(
            "Only US addresses are currently supported. Please refer to the documentation: {US_ONLY_DOCS_URL}"
        )));
    }

    Ok(CreateCheckoutIntent {
        product_url,
        quantity,
        buyer: Buyer { email },
        shipping_address: ShippingAddress {
            first_name: fields.required_string("firstName")?,
            last_name: fields.required_string("lastName")?,
            address1: fields.required_string("address1")?,
            address2: fields.optional_string("address2")?,
            city: fields.required_string("city")?,
            province_code: fields.required_string("provinceCode")?,
            postal_code: fields.required_string("postalCode")?,
            country_code,
            phone: fields.optional_string("phone")?,
        },
    })
}

fn status_polling(params: &Params<'_>) -> Result<Option<StatusPolling>, ActionError> {
    if !params.bool("enablePolling", true)? {
        return Ok(None);
    }

    let max_attempts = params.u32("maxAttempts", DEFAULT_MAX_ATTEMPTS)?;
    let interval = params.seconds("intervalSeconds")?;
    let strategy = match params.optional_string("waitStrategy")?.as_deref() {
        Some("fixed") => WaitStrategy::fixed(interval.unwrap_or(DEFAULT_INITIAL_INTERVAL)),
        Some("exponential") => exponential(params)?,
        None if interval.is_some() => WaitStrategy::fixed(interval.unwrap_or_default()),
        None => exponential(params)?,
        Some(other) => {
            return Err(ActionError::validation(format!(
                "unknown wait strategy `{other}` (expected fixed or exponential)"
            )));
        }
    };

    let config = PollConfig::new(max_attempts, strategy);
    config
        .validate()
        .map_err(|e| ActionError::validation(e.to_string()))?;

    let field = params
        .optional_string("stateField")?
        .unwrap_or_else(|| DEFAULT_STATE_FIELD.to_owned());
    let states = params
        .string_list("terminalStates")?
        .unwrap_or_else(|| DEFAULT_TERMINAL_STATES.map(str::to_owned).to_vec());
    if states.is_empty() {
        return Err(ActionError::validation(
            "parameter `terminalStates` must name at least one state",
        ));
    }

    Ok(Some(StatusPolling {
        config,
        terminal: TerminalStates::new(field, states),
    }))
}

fn exponential(params: &Params<'_>) -> Result<WaitStrategy, ActionError> {
    let initial = params
        .seconds("initialIntervalSeconds")?
        .unwrap_or(DEFAULT_INITIAL_INTERVAL);
    let max = params
        .seconds("maxIntervalSeconds")?
        .unwrap_or(DEFAULT_MAX_INTERVAL);
    Ok(WaitStrategy::exponential(initial, max))
}

/// Layered lookup: item fields first, then node parameters.
struct Params<'a> {
    layers: [Option<&'a Map<String, Value>>; 2],
}

impl<'a> Params<'a> {
    fn new(node: &'a Map<String, Value>, item: &'a Value) -> Self {
        Self {
            layers: [item.as_object(), Some(node)],
        }
    }

    fn single(map: &'a Map<String, Value>) -> Self {
        Self {
            layers: [Some(map), None],
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.layers
            .into_iter()
            .flatten()
            .find_map(|layer| layer.get(name).filter(|v| !v.is_null()))
    }

    fn optional_string(&self, name: &str) -> Result<Option<String>, ActionError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_owned())),
            Some(other) => Err(type_error(name, "a string", other)),
        }
    }

    fn required_string(&self, name: &str) -> Result<String, ActionError> {
        self.optional_string(name)?
            .ok_or_else(|| ActionError::validation(format!("parameter `{name}` is required")))
    }

    fn bool(&self, name: &str, default: bool) -> Result<bool, ActionError> {
        match self.get(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(type_error(name, "a boolean", other)),
        }
    }

    fn u32(&self, name: &str, default: u32) -> Result<u32, ActionError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| type_error(name, "a non-negative integer", value)),
        }
    }

    fn seconds(&self, name: &str) -> Result<Option<Duration>, ActionError> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .map(Some)
                .ok_or_else(|| type_error(name, "a non-negative number of seconds", value)),
        }
    }

    /// Array of strings, or one comma-separated string.
    fn string_list(&self, name: &str) -> Result<Option<Vec<String>>, ActionError> {
        let split = |s: &str| -> Vec<String> {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        };
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(split(s))),
            Some(Value::Array(values)) => {
                let mut list = Vec::with_capacity(values.len());
                for v in values {
                    let s = v
                        .as_str()
                        .ok_or_else(|| type_error(name, "a list of strings", v))?
                        .trim();
                    if !s.is_empty() {
                        list.push(s.to_owned());
                    }
                }
                Ok(Some(list))
            }
            Some(other) => Err(type_error(name, "a list of strings", other)),
        }
    }
}

fn type_error(name: &str, expected: &str, found: &Value) -> ActionError {
    ActionError::validation(format!("parameter `{name}` must be {expected}, got {found}"))
}
