//! Top-level facade crate for gqlsub.
//!
//! Re-exports the protocol core and the client engine so users can depend on a single crate.

pub mod core {
    pub use gqlsub_core::*;
}

pub mod client {
    pub use gqlsub_client::*;
}

pub use gqlsub_client::{Subscription, SubscriptionClient, SubscriptionPayload, SubscriptionRequest};
pub use gqlsub_core::{GqlSubError, Result};
