//! The Rye checkout node
//!
//! [`RyeNode`] resolves each input item into an [`ItemRequest`], sends it
//! through a [`CheckoutApi`] and emits one output item per input item.
//! Get Status requests can poll until the checkout intent reaches a terminal
//! state; see [`rye_resilience::Poller`].

mod description;
mod params;

use std::sync::Arc;

use async_trait::async_trait;
use rye_client::CheckoutApi;
use rye_resilience::Poller;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{Instrument, debug, info_span, warn};

pub use description::{NODE_KEY, rye_metadata};
pub use params::{
    DEFAULT_STATE_FIELD, DEFAULT_TERMINAL_STATES, ItemRequest, NodeOperation, Operation, Resource,
    StatusPolling, US_ONLY_DOCS_URL,
};

use crate::action::{Action, ProcessAction};
use crate::context::ActionContext;
use crate::error::ActionError;
use crate::item::{NodeItem, PollingSummary};
use crate::metadata::ActionMetadata;

/// Input of one node execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInput {
    /// Node-level parameters: `resource`, `operation` and defaults for every
    /// item field.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Input items. Fields in an item's `json` override node parameters.
    #[serde(default)]
    pub items: Vec<NodeItem>,
}

impl NodeInput {
    /// Input with `parameters` and `items`.
    pub fn new(parameters: Map<String, Value>, items: Vec<NodeItem>) -> Self {
        Self { parameters, items }
    }

    /// Input with `parameters` and one empty item.
    pub fn single(parameters: Map<String, Value>) -> Self {
        Self::new(parameters, vec![NodeItem::new(json!({}))])
    }
}

/// Workflow node for the Rye Universal Checkout API.
pub struct RyeNode {
    api: Arc<dyn CheckoutApi>,
    meta: ActionMetadata,
}

impl RyeNode {
    /// Node sending requests through `api`.
    pub fn new(api: Arc<dyn CheckoutApi>) -> Self {
        Self {
            api,
            meta: rye_metadata(),
        }
    }

    async fn run_item(&self, request: ItemRequest) -> Result<NodeItem, ActionError> {
        match request {
            ItemRequest::Create(body) => Ok(self.api.create_checkout_intent(&body).await?.into()),
            ItemRequest::GetStatus { id, polling: None } => {
                Ok(self.api.get_checkout_intent(&id).await?.into())
            }
            ItemRequest::GetStatus {
                id,
                polling: Some(polling),
            } => self.poll_status(&id, polling).await,
            ItemRequest::Confirm { id, body } => {
                Ok(self.api.confirm_checkout_intent(&id, &body).await?.into())
            }
            ItemRequest::VerifyBrandSupport { domain } => {
                Ok(self.api.verify_brand_support(&domain).await?.into())
            }
        }
    }

    async fn poll_status(&self, id: &str, polling: StatusPolling) -> Result<NodeItem, ActionError> {
        let poller =
            Poller::new(polling.config).map_err(|e| ActionError::validation(e.to_string()))?;
        let api = self.api.as_ref();
        let result = poller
            .run(move || api.get_checkout_intent(id), &polling.terminal)
            .await?;

        if !result.terminal {
            debug!(
                checkout_intent = id,
                attempts = result.attempts_used,
                "returning last known status"
            );
        }
        Ok(NodeItem::new(result.value).with_polling(PollingSummary {
            attempts_used: result.attempts_used,
            terminal: result.terminal,
        }))
    }
}

impl Action for RyeNode {
    fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }
}

#[async_trait]
impl ProcessAction for RyeNode {
    type Input = NodeInput;
    type Output = Vec<NodeItem>;

    async fn execute(
        &self,
        input: NodeInput,
        ctx: &ActionContext,
    ) -> Result<Vec<NodeItem>, ActionError> {
        let NodeOperation {
            resource,
            operation,
        } = NodeOperation::from_parameters(&input.parameters)?;
        let mut output = Vec::with_capacity(input.items.len());

        for (index, item) in input.items.iter().enumerate() {
            ctx.check_cancelled()?;

            let span = info_span!(
                "rye_item",
                item = index,
                resource = resource.as_str(),
                operation = operation.as_str()
            );
            let outcome = async {
                let request = ItemRequest::resolve(operation, &input.parameters, &item.json)?;
                ctx.cancellable(self.run_item(request)).await
            }
            .instrument(span)
            .await;

            match outcome {
                Ok(produced) => output.push(produced.paired_with(index)),
                Err(err) if err.is_cancelled() => return Err(err),
                Err(err) if ctx.continue_on_fail => {
                    warn!(item = index, error = %err, "item failed, continuing");
                    output.push(NodeItem::new(json!({ "error": err.message() })).paired_with(index));
                }
                Err(err) => return Err(err.at_item(index)),
            }
        }

        Ok(output)
    }
}
