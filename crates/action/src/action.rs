use async_trait::async_trait;

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::metadata::ActionMetadata;

/// Base trait for workflow nodes: identity and static description.
///
/// Object-safe; hosts keep nodes as `Arc<dyn Action>` for discovery.
pub trait Action: Send + Sync + 'static {
    /// Static metadata describing this node type.
    fn metadata(&self) -> &ActionMetadata;
}

/// Node that turns an input into an output in one execution.
#[async_trait]
pub trait ProcessAction: Action {
    /// Input received from the host.
    type Input: Send + Sync + 'static;
    /// Output passed downstream.
    type Output: Send + Sync + 'static;

    /// Execute the node.
    ///
    /// Implementations should call `ctx.check_cancelled()` between units of
    /// work and race long waits against `ctx.cancellation`.
    async fn execute(
        &self,
        input: Self::Input,
        ctx: &ActionContext,
    ) -> Result<Self::Output, ActionError>;
}
