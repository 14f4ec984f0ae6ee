//! Subscriptions: caller handles, payload types, and the shared registry.

mod handle;
mod registry;
mod types;

pub(crate) use handle::{DeliveryOutcome, Route};
pub use handle::Subscription;
pub use registry::SubscriptionRegistry;
pub use types::{SubscriptionPayload, SubscriptionRequest};
