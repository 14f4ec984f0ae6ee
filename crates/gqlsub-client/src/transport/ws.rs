//! WebSocket transport (tokio-tungstenite).
//!
//! Responsibilities:
//! - Rewrite an `http(s)` endpoint to `ws(s)`
//! - Negotiate the `graphql-ws` subprotocol plus caller headers
//! - Split the socket: a mutex-guarded sink shared by callers, and the inbound
//!   half turned into a `FrameStream` for the dispatch loop

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, SplitSink};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header, HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use gqlsub_core::error::{GqlSubError, Result};

use crate::transport::codec::{decode, Inbound};
use crate::transport::{Connection, FrameStream, Transport};

/// Subprotocol spoken by the engine.
pub const SUBPROTOCOL: &str = "graphql-ws";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outbound half of a WebSocket connection.
pub struct WsTransport {
    sink: Mutex<SplitSink<WsStream, Message>>,
    closed: AtomicBool,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&self, frame: String) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(GqlSubError::Transport("connection closed".into()));
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::text(frame))
            .await
            .map_err(|e| GqlSubError::Transport(format!("send failed: {e}")))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let mut sink = self.sink.lock().await;
        match sink.close().await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(GqlSubError::Transport(format!("close failed: {e}"))),
        }
    }
}

/// `http://` -> `ws://`, `https://` -> `wss://`; anything else is kept.
pub fn ws_url(endpoint: &str) -> String {
    match endpoint.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => endpoint.to_string(),
    }
}

/// Dial the endpoint and return a ready-to-handshake connection.
pub async fn connect(endpoint: &str, headers: &HashMap<String, String>) -> Result<Connection> {
    let url = ws_url(endpoint);
    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| GqlSubError::Transport(format!("invalid endpoint {url}: {e}")))?;

    let h = request.headers_mut();
    for (k, v) in headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .map_err(|e| GqlSubError::Transport(format!("invalid header name {k}: {e}")))?;
        let value = HeaderValue::from_str(v)
            .map_err(|e| GqlSubError::Transport(format!("invalid header value for {k}: {e}")))?;
        h.insert(name, value);
    }
    h.insert(header::SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(SUBPROTOCOL));
    h.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let (socket, _resp) = connect_async(request)
        .await
        .map_err(|e| GqlSubError::Transport(format!("connect {url} failed: {e}")))?;
    tracing::debug!(%url, "websocket connected");

    let (sink, read) = socket.split();
    let transport = Arc::new(WsTransport {
        sink: Mutex::new(sink),
        closed: AtomicBool::new(false),
    });

    Ok(Connection::new(transport, frames(read)))
}

fn frames(read: futures_util::stream::SplitStream<WsStream>) -> FrameStream {
    stream::unfold(read, |mut read| async move {
        loop {
            match read.next().await? {
                Ok(msg) => match decode(msg) {
                    Ok(Inbound::Frame(frame)) => return Some((frame, read)),
                    Ok(Inbound::Control) => continue,
                    Ok(Inbound::Close) => return None,
                    Err(e) => {
                        tracing::debug!(error = %e, "dropping undecodable websocket message");
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "websocket read failed; ending stream");
                    return None;
                }
            }
        }
    })
    .boxed()
}
