use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rye_action::prelude::*;
use rye_action::{PairedItem, PollingSummary};
use rye_client::{ApiError, ConfirmCheckoutIntent, CreateCheckoutIntent, StatusCode};
use serde_json::{Map, Value, json};
use tokio::time::Instant;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// In-memory checkout API.
///
/// `get_checkout_intent` pops scripted states in order and repeats the last
/// one once the script runs out.
#[derive(Default)]
struct FakeApi {
    states: Mutex<VecDeque<&'static str>>,
    calls: Mutex<Vec<(String, Instant)>>,
    bodies: Mutex<Vec<Value>>,
    fail_ids: Vec<&'static str>,
}

impl FakeApi {
    fn with_states(states: &[&'static str]) -> Self {
        Self {
            states: Mutex::new(states.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn failing(mut self, id: &'static str) -> Self {
        self.fail_ids.push(id);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1].1 - w[0].1).collect()
    }

    fn not_found() -> ApiError {
        ApiError::from_status(
            StatusCode::NOT_FOUND,
            br#"{"message":"Checkout intent not found"}"#,
        )
    }
}

#[async_trait]
impl CheckoutApi for FakeApi {
    async fn create_checkout_intent(&self, request: &CreateCheckoutIntent) -> Result<Value, ApiError> {
        self.record("create".into());
        let body = serde_json::to_value(request).unwrap();
        self.bodies.lock().unwrap().push(body);
        Ok(json!({ "id": "ci_new", "state": "retrieving_offer" }))
    }

    async fn get_checkout_intent(&self, id: &str) -> Result<Value, ApiError> {
        self.record(format!("get {id}"));
        if self.fail_ids.iter().any(|failing| *failing == id) {
            return Err(Self::not_found());
        }
        let mut states = self.states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front().unwrap()
        } else {
            states.front().copied().unwrap_or("retrieving_offer")
        };
        Ok(json!({ "id": id, "state": state }))
    }

    async fn confirm_checkout_intent(
        &self,
        id: &str,
        request: &ConfirmCheckoutIntent,
    ) -> Result<Value, ApiError> {
        self.record(format!("confirm {id}"));
        self.bodies.lock().unwrap().push(serde_json::to_value(request).unwrap());
        Ok(json!({ "id": id, "state": "placing_order" }))
    }

    async fn verify_brand_support(&self, domain: &str) -> Result<Value, ApiError> {
        self.record(format!("brand {domain}"));
        Ok(json!({ "domain": domain, "supported": true }))
    }

    async fn health(&self) -> Result<Value, ApiError> {
        Ok(json!({ "ok": true }))
    }
}

/// Records the message of every event emitted while installed.
#[derive(Clone, Default)]
struct Messages(Arc<Mutex<Vec<String>>>);

impl Messages {
    fn count(&self, message: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|m| *m == message).count()
    }
}

impl<S: tracing::Subscriber> Layer<S> for Messages {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Visitor(Option<String>);
        impl tracing::field::Visit for Visitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = Some(format!("{value:?}"));
                }
            }
        }
        let mut visitor = Visitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0.lock().unwrap().push(message);
        }
    }
}

fn params(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn items(values: &[Value]) -> Vec<NodeItem> {
    values.iter().cloned().map(NodeItem::new).collect()
}

async fn run(api: &Arc<FakeApi>, input: NodeInput, ctx: &ActionContext) -> Result<Vec<NodeItem>, ActionError> {
    RyeNode::new(api.clone()).execute(input, ctx).await
}

fn create_params() -> Value {
    json!({
        "resource": "checkoutIntent",
        "operation": "create",
        "productUrl": "https://shop.example/p/1",
        "itemQuantity": 2,
        "buyerEmail": "jane@example.com",
        "shippingAddress": {
            "address": {
                "firstName": "Jane",
                "lastName": "Doe",
                "address1": "1 Main St",
                "address2": "",
                "city": "Springfield",
                "provinceCode": "IL",
                "postalCode": "62701",
                "countryCode": "US",
                "phone": "555-0100"
            }
        }
    })
}

#[tokio::test]
async fn create_sends_nested_body() {
    let api = Arc::new(FakeApi::default());
    let output = run(&api, NodeInput::single(params(create_params())), &ActionContext::new())
        .await
        .unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json["id"], "ci_new");
    assert_eq!(output[0].paired_item, Some(PairedItem { item: 0 }));
    assert_eq!(output[0].polling, None);

    let bodies = api.bodies.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({
            "productUrl": "https://shop.example/p/1",
            "quantity": 2,
            "buyer": { "email": "jane@example.com" },
            "shippingAddress": {
                "firstName": "Jane",
                "lastName": "Doe",
                "address1": "1 Main St",
                "city": "Springfield",
                "provinceCode": "IL",
                "postalCode": "62701",
                "countryCode": "US",
                "phone": "555-0100"
            }
        })
    );
}

#[tokio::test]
async fn non_us_address_fails_before_any_request() {
    let api = Arc::new(FakeApi::default());
    let mut node_params = create_params();
    node_params["shippingAddress"]["address"]["countryCode"] = json!("CA");

    let err = run(&api, NodeInput::single(params(node_params)), &ActionContext::new())
        .await
        .unwrap_err();

    assert_eq!(err.item_index(), Some(0));
    assert!(err.message().starts_with("Only US addresses are currently supported."));
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn get_status_polls_until_terminal() {
    let api = Arc::new(FakeApi::with_states(&[
        "retrieving_offer",
        "retrieving_offer",
        "awaiting_confirmation",
    ]));
    let input = NodeInput::single(params(json!({
        "operation": "getStatus",
        "checkoutIntentId": "ci_1",
        "initialIntervalSeconds": 2,
        "maxIntervalSeconds": 3
    })));

    let output = run(&api, input, &ActionContext::new()).await.unwrap();

    assert_eq!(output[0].json["state"], "awaiting_confirmation");
    assert_eq!(
        output[0].polling,
        Some(PollingSummary {
            attempts_used: 3,
            terminal: true
        })
    );
    assert_eq!(api.gaps(), vec![Duration::from_secs(2), Duration::from_secs(3)]);
}

#[tokio::test(start_paused = true)]
async fn polling_logs_each_event_once() {
    let messages = Messages::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(messages.clone()));

    let api = Arc::new(FakeApi::with_states(&["retrieving_offer", "completed"]));
    let input = NodeInput::single(params(json!({
        "operation": "getStatus",
        "checkoutIntentId": "ci_1"
    })));
    run(&api, input, &ActionContext::new()).await.unwrap();

    assert_eq!(messages.count("Poll reached terminal state"), 1);
    assert_eq!(messages.count("Waiting before next attempt"), 1);
    assert_eq!(messages.count("poll event"), 0);
}

#[tokio::test(start_paused = true)]
async fn exhausted_poll_returns_last_known_status() {
    let api = Arc::new(FakeApi::with_states(&["retrieving_offer"]));
    let input = NodeInput::single(params(json!({
        "operation": "getStatus",
        "checkoutIntentId": "ci_1",
        "maxAttempts": 4,
        "intervalSeconds": 1
    })));

    let output = run(&api, input, &ActionContext::new()).await.unwrap();

    assert_eq!(output[0].json["state"], "retrieving_offer");
    assert_eq!(
        output[0].polling,
        Some(PollingSummary {
            attempts_used: 4,
            terminal: false
        })
    );
    assert_eq!(api.gaps(), vec![Duration::from_secs(1); 3]);
}

#[tokio::test(start_paused = true)]
async fn custom_terminal_vocabulary() {
    let api = Arc::new(FakeApi::with_states(&["awaiting_confirmation", "completed"]));
    let input = NodeInput::single(params(json!({
        "operation": "getStatus",
        "checkoutIntentId": "ci_1",
        "intervalSeconds": 0,
        "terminalStates": ["completed", "failed", "cancelled"]
    })));

    let output = run(&api, input, &ActionContext::new()).await.unwrap();
    assert_eq!(output[0].json["state"], "completed");
    assert_eq!(output[0].polling.unwrap().attempts_used, 2);
}

#[tokio::test]
async fn polling_disabled_fetches_once() {
    let api = Arc::new(FakeApi::with_states(&["retrieving_offer"]));
    let input = NodeInput::single(params(json!({
        "operation": "getStatus",
        "checkoutIntentId": "ci_1",
        "enablePolling": false
    })));

    let output = run(&api, input, &ActionContext::new()).await.unwrap();
    assert_eq!(api.calls(), vec!["get ci_1"]);
    assert_eq!(output[0].polling, None);
}

#[tokio::test]
async fn item_fields_override_node_parameters() {
    let api = Arc::new(FakeApi::with_states(&["completed"]));
    let input = NodeInput::new(
        params(json!({ "operation": "getStatus", "checkoutIntentId": "ci_default", "enablePolling": false })),
        items(&[json!({}), json!({ "checkoutIntentId": "ci_2" })]),
    );

    let output = run(&api, input, &ActionContext::new()).await.unwrap();
    assert_eq!(api.calls(), vec!["get ci_default", "get ci_2"]);
    assert_eq!(output[1].paired_item, Some(PairedItem { item: 1 }));
}

#[tokio::test]
async fn continue_on_fail_emits_error_items() {
    let api = Arc::new(FakeApi::with_states(&["completed"]).failing("ci_missing"));
    let input = NodeInput::new(
        params(json!({ "operation": "getStatus", "enablePolling": false })),
        items(&[
            json!({ "checkoutIntentId": "ci_1" }),
            json!({ "checkoutIntentId": "ci_missing" }),
            json!({}),
            json!({ "checkoutIntentId": "ci_3" }),
        ]),
    );
    let ctx = ActionContext::new().with_continue_on_fail(true);

    let output = run(&api, input, &ctx).await.unwrap();

    assert_eq!(output.len(), 4);
    assert_eq!(output[1].json, json!({ "error": "Checkout intent not found" }));
    assert_eq!(output[1].paired_item, Some(PairedItem { item: 1 }));
    assert_eq!(output[2].json, json!({ "error": "parameter `checkoutIntentId` is required" }));
    assert_eq!(output[3].json["id"], "ci_3");
}

#[tokio::test]
async fn fail_fast_reports_item_and_response_data() {
    let api = Arc::new(FakeApi::default().failing("ci_missing"));
    let input = NodeInput::new(
        params(json!({ "operation": "getStatus" })),
        items(&[json!({ "checkoutIntentId": "ci_missing" }), json!({ "checkoutIntentId": "ci_2" })]),
    );

    let err = run(&api, input, &ActionContext::new()).await.unwrap_err();

    assert_eq!(err.item_index(), Some(0));
    assert_eq!(
        err.response_data(),
        Some(&json!({ "message": "Checkout intent not found" }))
    );
    assert_eq!(api.calls(), vec!["get ci_missing"]);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_polling_and_ignores_continue_on_fail() {
    let api = Arc::new(FakeApi::with_states(&["retrieving_offer"]));
    let ctx = ActionContext::new().with_continue_on_fail(true);
    let token = ctx.cancellation.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(12)).await;
        token.cancel();
    });

    let input = NodeInput::new(
        params(json!({ "operation": "getStatus", "intervalSeconds": 5 })),
        items(&[json!({ "checkoutIntentId": "ci_1" }), json!({ "checkoutIntentId": "ci_2" })]),
    );
    let err = run(&api, input, &ctx).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(api.calls(), vec!["get ci_1", "get ci_1", "get ci_1"]);
}

#[tokio::test]
async fn confirm_and_brand_operations() {
    let api = Arc::new(FakeApi::default());
    let confirm = NodeInput::single(params(json!({
        "operation": "confirm",
        "checkoutIntentId": "ci_1",
        "stripeToken": "tok_visa"
    })));
    let output = run(&api, confirm, &ActionContext::new()).await.unwrap();
    assert_eq!(output[0].json["state"], "placing_order");
    assert_eq!(
        api.bodies.lock().unwrap()[0],
        json!({ "paymentMethod": { "token": "tok_visa" } })
    );

    let brand = NodeInput::single(params(json!({ "resource": "brand", "domain": "amazon.com" })));
    let output = run(&api, brand, &ActionContext::new()).await.unwrap();
    assert_eq!(output[0].json, json!({ "domain": "amazon.com", "supported": true }));
    assert_eq!(api.calls(), vec!["confirm ci_1", "brand amazon.com"]);
}

#[rstest]
#[case::operation_of_other_resource(json!({ "resource": "brand", "operation": "confirm" }))]
#[case::unknown_operation(json!({ "operation": "refund" }))]
#[tokio::test]
async fn invalid_node_operation_is_not_item_scoped(#[case] node_params: Value) {
    let api = Arc::new(FakeApi::default());
    let ctx = ActionContext::new().with_continue_on_fail(true);
    let err = run(&api, NodeInput::single(params(node_params)), &ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Validation(_)));
    assert_eq!(err.item_index(), None);
}

#[tokio::test]
async fn empty_input_produces_empty_output() {
    let api = Arc::new(FakeApi::default());
    let input = NodeInput::new(params(json!({ "operation": "create" })), Vec::new());
    assert!(run(&api, input, &ActionContext::new()).await.unwrap().is_empty());
}

#[test]
fn get_status_form_fields() {
    let node = RyeNode::new(Arc::new(FakeApi::default()));
    let fields: Vec<&str> = node
        .metadata()
        .parameters
        .iter()
        .filter(|p| p.applies_to("checkoutIntent", "getStatus"))
        .map(|p| p.name.as_str())
        .collect();

    insta::assert_json_snapshot!(fields, @r#"
    [
      "resource",
      "operation",
      "checkoutIntentId",
      "enablePolling",
      "maxAttempts",
      "waitStrategy",
      "intervalSeconds",
      "initialIntervalSeconds",
      "maxIntervalSeconds",
      "stateField",
      "terminalStates"
    ]
    "#);
}

#[test]
fn polling_hint_shows_after_get_status() {
    let node = RyeNode::new(Arc::new(FakeApi::default()));
    let hint = &node.metadata().hints[0];
    insta::assert_json_snapshot!(hint.display_condition, @r#"
    {
      "resource": [
        "checkoutIntent"
      ],
      "operation": [
        "getStatus"
      ],
      "enablePolling": true
    }
    "#);
}
