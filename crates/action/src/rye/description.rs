//! Form description of the Rye node

use rye_credential::CREDENTIAL_KEY;
use serde_json::json;

use super::params::{DEFAULT_STATE_FIELD, DEFAULT_TERMINAL_STATES, Operation, Resource};
use crate::metadata::{
    ActionMetadata, DisplayCondition, HintLocation, NodeHint, ParameterDescriptor, ParameterKind,
    ParameterOption,
};

/// Node key.
pub const NODE_KEY: &str = "rye";

fn show(resource: Resource, operations: &[Operation]) -> DisplayCondition {
    DisplayCondition {
        resource: vec![resource.as_str().to_owned()],
        operation: operations.iter().map(|o| o.as_str().to_owned()).collect(),
        enable_polling: None,
    }
}

fn when_polling() -> DisplayCondition {
    DisplayCondition {
        enable_polling: Some(true),
        ..show(Resource::CheckoutIntent, &[Operation::GetStatus])
    }
}

fn option(operation: Operation, name: &str, description: &str) -> ParameterOption {
    ParameterOption::new(name, operation.as_str()).with_description(description)
}

fn address_fields() -> Vec<ParameterDescriptor> {
    vec![
        ParameterDescriptor::string("firstName", "First Name").required(),
        ParameterDescriptor::string("lastName", "Last Name").required(),
        ParameterDescriptor::string("address1", "Address Line 1").required(),
        ParameterDescriptor::string("address2", "Address Line 2"),
        ParameterDescriptor::string("city", "City").required(),
        ParameterDescriptor::string("provinceCode", "State")
            .required()
            .with_description("Two-letter state code (e.g., CA, NY)"),
        ParameterDescriptor::string("postalCode", "ZIP Code").required(),
        ParameterDescriptor::string("countryCode", "Country Code")
            .with_default("US")
            .with_description("Two-letter country code (currently only US supported)"),
        ParameterDescriptor::string("phone", "Phone"),
    ]
}

/// Metadata of the Rye node.
pub fn rye_metadata() -> ActionMetadata {
    let checkout = Resource::CheckoutIntent;
    let get_status = [Operation::GetStatus];

    ActionMetadata::new(
        NODE_KEY,
        "Rye",
        "Interact with the Rye Universal Checkout API",
    )
    .with_group("transform")
    .with_version(1)
    .with_required_credential(CREDENTIAL_KEY)
    .with_parameter(
        ParameterDescriptor::new(
            "resource",
            "Resource",
            ParameterKind::Options {
                options: vec![
                    ParameterOption::new("Checkout Intent", Resource::CheckoutIntent.as_str()),
                    ParameterOption::new("Brand", Resource::Brand.as_str()),
                ],
            },
        )
        .with_default(Resource::CheckoutIntent.as_str()),
    )
    .with_parameter(
        ParameterDescriptor::new(
            "operation",
            "Operation",
            ParameterKind::Options {
                options: vec![
                    option(Operation::Create, "Create", "Create a new checkout intent"),
                    option(
                        Operation::GetStatus,
                        "Get Status",
                        "Get the status of a checkout intent",
                    ),
                    option(
                        Operation::Confirm,
                        "Confirm",
                        "Confirm a checkout intent with payment",
                    ),
                ],
            },
        )
        .with_default(Operation::Create.as_str())
        .shown_when(show(checkout, &[])),
    )
    .with_parameter(
        ParameterDescriptor::new(
            "operation",
            "Operation",
            ParameterKind::Options {
                options: vec![option(
                    Operation::VerifyBrandSupport,
                    "Verify Support",
                    "Check if a brand/domain is supported",
                )],
            },
        )
        .with_default(Operation::VerifyBrandSupport.as_str())
        .shown_when(show(Resource::Brand, &[])),
    )
    .with_parameter(
        ParameterDescriptor::string("productUrl", "Product URL")
            .required()
            .with_description("The URL of the product to purchase from any supported merchant")
            .with_placeholder("https://www.amazon.com/Apple-MX532LL-A-AirTag/dp/B0CWXNS552")
            .shown_when(show(checkout, &[Operation::Create])),
    )
    .with_parameter(
        ParameterDescriptor::new("itemQuantity", "Item Quantity", ParameterKind::Number)
            .with_default(rye_client::DEFAULT_QUANTITY)
            .with_description("Number of items to purchase")
            .shown_when(show(checkout, &[Operation::Create])),
    )
    .with_parameter(
        ParameterDescriptor::string("buyerEmail", "Buyer Email")
            .required()
            .with_description("Email address of the buyer")
            .shown_when(show(checkout, &[Operation::Create])),
    )
    .with_parameter(
        ParameterDescriptor::new(
            "shippingAddress",
            "Shipping Address",
            ParameterKind::Collection {
                fields: address_fields(),
            },
        )
        .required()
        .with_default(json!({}))
        .with_description("Shipping address for the order (US only)")
        .shown_when(show(checkout, &[Operation::Create])),
    )
    .with_parameter(
        ParameterDescriptor::string("checkoutIntentId", "Checkout Intent ID")
            .required()
            .with_description(
                "The ID of the checkout intent to check or confirm. Typically obtained from the \"Create\" operation output.",
            )
            .with_placeholder("e.g., ci_abc123xyz")
            .shown_when(show(checkout, &[Operation::GetStatus, Operation::Confirm])),
    )
    .with_parameter(
        ParameterDescriptor::new("enablePolling", "Enable Polling", ParameterKind::Boolean)
            .with_default(true)
            .with_description(
                "Whether to keep checking until the checkout reaches a terminal state or the attempts run out",
            )
            .shown_when(show(checkout, &get_status)),
    )
    .with_parameter(
        ParameterDescriptor::new("maxAttempts", "Max Attempts", ParameterKind::Number)
            .with_default(rye_resilience::DEFAULT_MAX_ATTEMPTS)
            .with_description(
                "Maximum number of status checks. If no terminal state is reached, the last known status is returned.",
            )
            .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::new(
            "waitStrategy",
            "Wait Strategy",
            ParameterKind::Options {
                options: vec![
                    ParameterOption::new("Exponential", "exponential")
                        .with_description("Double the wait after each check, up to the maximum interval"),
                    ParameterOption::new("Fixed", "fixed")
                        .with_description("Wait the same interval between checks"),
                ],
            },
        )
        .with_description("Defaults to fixed when an interval is set, exponential otherwise")
        .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::new("intervalSeconds", "Interval (Seconds)", ParameterKind::Number)
            .with_description("Seconds to wait between checks with the fixed strategy")
            .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::new(
            "initialIntervalSeconds",
            "Initial Interval (Seconds)",
            ParameterKind::Number,
        )
        .with_default(rye_resilience::DEFAULT_INITIAL_INTERVAL.as_secs())
        .with_description("First wait with the exponential strategy")
        .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::new(
            "maxIntervalSeconds",
            "Max Interval (Seconds)",
            ParameterKind::Number,
        )
        .with_default(rye_resilience::DEFAULT_MAX_INTERVAL.as_secs())
        .with_description("Longest wait with the exponential strategy")
        .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::string("stateField", "State Field")
            .with_default(DEFAULT_STATE_FIELD)
            .with_description("Response field holding the checkout state")
            .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::new("terminalStates", "Terminal States", ParameterKind::StringList)
            .with_default(json!(DEFAULT_TERMINAL_STATES))
            .with_description("States after which polling stops")
            .shown_when(when_polling()),
    )
    .with_parameter(
        ParameterDescriptor::password("stripeToken", "Stripe Token")
            .required()
            .with_description("The Stripe token that will be used to process the checkout payment")
            .with_placeholder("tok_visa")
            .shown_when(show(checkout, &[Operation::Confirm])),
    )
    .with_parameter(
        ParameterDescriptor::string("domain", "Brand Domain")
            .required()
            .with_description(
                "The merchant domain to check for Rye API support. Use this before creating a checkout to verify the merchant is supported.",
            )
            .with_placeholder("amazon.com")
            .shown_when(show(Resource::Brand, &[Operation::VerifyBrandSupport])),
    )
    .with_hint(NodeHint {
        message: "Tip: When using \"Get Status\" with polling enabled, add a Switch or IF node after this node to route your workflow based on the final checkout status.".to_owned(),
        location: HintLocation::OutputPane,
        after_execution: true,
        display_condition: when_polling(),
    })
}
