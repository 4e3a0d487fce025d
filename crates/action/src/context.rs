use tokio_util::sync::CancellationToken;

use crate::error::ActionError;

/// Runtime context handed to a node for one execution.
///
/// Long-running work must either call
/// [`check_cancelled`](Self::check_cancelled) between steps or race its
/// futures against [`cancellation`](Self::cancellation).
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ActionContext {
    /// Cancellation signal, checked cooperatively.
    pub cancellation: CancellationToken,
    /// Turn per-item failures into `{ "error": ... }` output items instead of
    /// failing the execution.
    pub continue_on_fail: bool,
}

impl ActionContext {
    /// Context with a fresh token and fail-fast behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set continue-on-fail.
    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Returns [`ActionError::Cancelled`] once the token has fired.
    pub fn check_cancelled(&self) -> Result<(), ActionError> {
        if self.cancellation.is_cancelled() {
            Err(ActionError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run `future` unless cancellation fires first.
    pub async fn cancellable<F, T>(&self, future: F) -> Result<T, ActionError>
    where
        F: Future<Output = Result<T, ActionError>>,
    {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(ActionError::Cancelled),
            result = future => result,
        }
    }
}
