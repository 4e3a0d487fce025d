//! Items flowing between workflow nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Link from an output item back to the input item it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    /// Index of the input item.
    pub item: usize,
}

/// Poll bookkeeping attached to a Get Status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingSummary {
    /// Fetches performed.
    pub attempts_used: u32,
    /// Whether a terminal state was reached before attempts ran out.
    pub terminal: bool,
}

/// One item of node input or output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeItem {
    /// Item payload.
    pub json: Value,
    /// Input item this output was produced from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<PairedItem>,
    /// Present on Get Status outputs produced by polling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling: Option<PollingSummary>,
}

impl NodeItem {
    /// Item carrying `json`.
    pub fn new(json: Value) -> Self {
        Self {
            json,
            paired_item: None,
            polling: None,
        }
    }

    /// Pair with input item `index`.
    pub fn paired_with(mut self, index: usize) -> Self {
        self.paired_item = Some(PairedItem { item: index });
        self
    }

    /// Attach poll bookkeeping.
    pub fn with_polling(mut self, summary: PollingSummary) -> Self {
        self.polling = Some(summary);
        self
    }
}

impl From<Value> for NodeItem {
    fn from(json: Value) -> Self {
        Self::new(json)
    }
}
