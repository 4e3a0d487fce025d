//! # Rye Action
//!
//! Workflow node for the Rye Universal Checkout API.
//!
//! The node takes a batch of input items plus node-level parameters and
//! produces one output item per input item. Items are processed in order;
//! a failing item either aborts the run or, with continue-on-fail, becomes an
//! `{ "error": ... }` output item paired with its input.
//!
//! ## Core Types
//!
//! - [`Action`] – identity and static metadata
//! - [`ProcessAction`] – single-execution node
//! - [`RyeNode`] – the checkout node itself
//! - [`ActionContext`] – cancellation and continue-on-fail
//! - [`ActionError`] – validation, API, fatal and cancellation failures
//! - [`ActionMetadata`] – form description a host renders
//! - [`NodeItem`] – item payload with pairing and polling bookkeeping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rye_action::prelude::*;
//! use serde_json::json;
//!
//! let node = RyeNode::new(Arc::new(client));
//! let parameters = json!({ "operation": "getStatus", "checkoutIntentId": "ci_123" });
//! let output = node
//!     .execute(NodeInput::single(parameters.as_object().cloned().unwrap_or_default()), &ActionContext::new())
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Node traits.
pub mod action;
/// Runtime context provided to nodes during execution.
pub mod context;
/// Error type for node execution.
pub mod error;
/// Input and output items.
pub mod item;
/// Static node description.
pub mod metadata;
/// Convenience re-exports.
pub mod prelude;
pub mod rye;

pub use action::{Action, ProcessAction};
pub use context::ActionContext;
pub use error::ActionError;
pub use item::{NodeItem, PairedItem, PollingSummary};
pub use metadata::{
    ActionMetadata, DisplayCondition, HintLocation, NodeHint, ParameterDescriptor, ParameterKind,
    ParameterOption,
};
pub use rye::{NodeInput, Operation, Resource, RyeNode};
