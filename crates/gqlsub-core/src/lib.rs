//! gqlsub core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the `graphql-ws` wire contract (message types and the
//! `{id, type, payload}` envelope) and the error surface shared by the client
//! engine and its tooling. It carries no transport or runtime dependencies so
//! it can back both the client and scripted test peers.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed frames surface as `GqlSubError::FrameDecode` instead of crashing
//! the reader.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorKind, GqlSubError, Result};
