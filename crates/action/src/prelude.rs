//! Convenience re-exports for hosts driving the node.
//!
//! ```rust,ignore
//! use rye_action::prelude::*;
//! ```

pub use crate::action::{Action, ProcessAction};
pub use crate::context::ActionContext;
pub use crate::error::ActionError;
pub use crate::item::NodeItem;
pub use crate::rye::{NodeInput, RyeNode};

pub use rye_client::{CheckoutApi, HttpCheckoutClient};
pub use rye_credential::ApiCredential;
