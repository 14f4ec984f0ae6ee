//! In-process transport.
//!
//! `pair()` returns the client-side `Connection` and a `MemoryPeer` that plays
//! the server. Either side closing ends the client's frame stream; dropping the
//! peer behaves like a remote hang-up.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use gqlsub_core::error::{GqlSubError, Result};
use gqlsub_core::protocol::Envelope;

use crate::transport::{Connection, Transport};

struct MemoryTransport {
    to_peer: mpsc::UnboundedSender<String>,
    closed: CancellationToken,
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, frame: String) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(GqlSubError::Transport("connection closed".into()));
        }
        self.to_peer
            .send(frame)
            .map_err(|_| GqlSubError::Transport("peer hung up".into()))
    }

    async fn close(&self) -> Result<()> {
        self.closed.cancel();
        Ok(())
    }
}

/// Server side of an in-process connection.
pub struct MemoryPeer {
    from_client: mpsc::UnboundedReceiver<String>,
    to_client: mpsc::UnboundedSender<String>,
    closed: CancellationToken,
}

impl MemoryPeer {
    /// Next frame sent by the client; `None` once the connection is closed and
    /// every frame sent before the close has been read.
    pub async fn recv(&mut self) -> Option<String> {
        tokio::select! {
            biased;
            frame = self.from_client.recv() => frame,
            _ = self.closed.cancelled() => self.from_client.try_recv().ok(),
        }
    }

    /// Next client frame, decoded. Undecodable frames yield `None` as well.
    pub async fn recv_envelope(&mut self) -> Option<Envelope> {
        let frame = self.recv().await?;
        Envelope::decode(&frame).ok()
    }

    pub fn send_raw(&self, frame: impl Into<String>) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(GqlSubError::Transport("connection closed".into()));
        }
        self.to_client
            .send(frame.into())
            .map_err(|_| GqlSubError::Transport("client hung up".into()))
    }

    pub fn send_envelope(&self, env: &Envelope) -> Result<()> {
        self.send_raw(env.encode()?)
    }

    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

pub fn pair() -> (Connection, MemoryPeer) {
    let (to_peer, from_client) = mpsc::unbounded_channel();
    let (to_client, from_peer) = mpsc::unbounded_channel::<String>();
    let closed = CancellationToken::new();

    let frames = stream::unfold((from_peer, closed.clone()), |(mut rx, closed)| async move {
        let frame = tokio::select! {
            biased;
            _ = closed.cancelled() => None,
            frame = rx.recv() => frame,
        };
        frame.map(|f| (f, (rx, closed)))
    })
    .boxed();

    let transport = Arc::new(MemoryTransport {
        to_peer,
        closed: closed.clone(),
    });

    (
        Connection::new(transport, frames),
        MemoryPeer {
            from_client,
            to_client,
            closed,
        },
    )
}
