//! `connection_init` / `connection_ack` exchange.
//!
//! Sends one init envelope and waits for exactly one inbound frame:
//! - `connection_ack` -> ready
//! - `connection_error` -> `HandshakeRejected` carrying the raw server payload
//! - anything else, a decode failure, or end of stream -> `HandshakeMalformed`
//!
//! Every failure path (including cancellation and timeout) closes the
//! transport before returning, so a half-initialized connection never leaks.

use std::time::Duration;

use futures_util::StreamExt;
use serde_json::value::RawValue;
use tokio_util::sync::CancellationToken;

use gqlsub_core::error::{GqlSubError, Result};
use gqlsub_core::protocol::{Envelope, MessageType};

use crate::transport::{send_envelope, Connection};

/// Default wait for the server's answer.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn handshake(
    conn: &mut Connection,
    init_payload: Option<Box<RawValue>>,
    cancel: &CancellationToken,
    timeout: Duration,
) -> Result<()> {
    let res = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(GqlSubError::HandshakeCancelled),
        _ = tokio::time::sleep(timeout) => Err(GqlSubError::HandshakeTimeout),
        res = exchange(conn, init_payload) => res,
    };

    if let Err(e) = &res {
        tracing::warn!(kind = e.kind().as_str(), error = %e, "handshake failed; closing connection");
        if let Err(close_err) = conn.transport.close().await {
            tracing::debug!(error = %close_err, "close after failed handshake");
        }
    }
    res
}

async fn exchange(conn: &mut Connection, init_payload: Option<Box<RawValue>>) -> Result<()> {
    send_envelope(conn.transport.as_ref(), &Envelope::init(init_payload)).await?;

    let frame = conn.frames.next().await.ok_or_else(|| {
        GqlSubError::HandshakeMalformed("connection closed before acknowledge".into())
    })?;
    let env = Envelope::decode(&frame)
        .map_err(|e| GqlSubError::HandshakeMalformed(e.to_string()))?;

    match env.msg_type {
        MessageType::ConnectionAck => {
            tracing::debug!("handshake acknowledged");
            Ok(())
        }
        MessageType::ConnectionError => Err(GqlSubError::HandshakeRejected(
            String::from_utf8_lossy(&env.payload_bytes()).into_owned(),
        )),
        other => Err(GqlSubError::HandshakeMalformed(format!(
            "failed acknowledge: got {other}"
        ))),
    }
}

