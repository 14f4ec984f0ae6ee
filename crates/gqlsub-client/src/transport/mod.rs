//! Transport layer.
//!
//! The engine talks to the connection through `Transport` (outbound frames,
//! close) and a `FrameStream` (inbound text frames, ending when the connection
//! ends). `ws` backs this with a WebSocket, `memory` with in-process channels.

pub mod codec;
pub mod handshake;
pub mod memory;
pub mod ws;

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use gqlsub_core::error::Result;
use gqlsub_core::protocol::Envelope;

/// Inbound raw text frames, in arrival order.
pub type FrameStream = BoxStream<'static, String>;

/// Outbound half of a connection. Shared by every caller of the client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one text frame.
    async fn send(&self, frame: String) -> Result<()>;

    /// Close the connection. Idempotent; ends the paired `FrameStream`.
    async fn close(&self) -> Result<()>;
}

/// Encode and send one envelope.
pub async fn send_envelope(transport: &dyn Transport, env: &Envelope) -> Result<()> {
    let frame = env.encode()?;
    transport.send(frame).await
}

/// A live connection: the shared outbound half plus the inbound stream.
pub struct Connection {
    pub transport: Arc<dyn Transport>,
    pub frames: FrameStream,
}

impl Connection {
    pub fn new(transport: Arc<dyn Transport>, frames: FrameStream) -> Self {
        Self { transport, frames }
    }
}
