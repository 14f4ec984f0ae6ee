//! gqlsub client library entry.
//!
//! This crate wires the transport, handshake, subscription registry and
//! dispatch loop into `SubscriptionClient`. It is consumed by the demo binary
//! (`main.rs`) and by integration tests.

pub mod client;
pub mod config;
mod dispatch;
pub mod obs;
pub mod subscription;
pub mod transport;

pub use client::SubscriptionClient;
pub use subscription::{Subscription, SubscriptionPayload, SubscriptionRequest};
