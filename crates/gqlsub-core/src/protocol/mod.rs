//! Protocol modules for the `graphql-ws` subscription protocol.
//!
//! - `message`: the nine wire message types and their direction/scope.
//! - `envelope`: the `{id, type, payload}` frame used in both directions, with
//!   payloads kept as `RawValue` so nothing is parsed that the caller does not
//!   ask for.
//!
//! Decoding is panic-free: malformed input is reported as
//! `GqlSubError::FrameDecode` and the reader decides whether to drop it.

pub mod envelope;
pub mod message;

pub use envelope::{raw_payload, Envelope, StartPayload};
pub use message::MessageType;
