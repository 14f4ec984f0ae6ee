//! WebSocket message -> inbound frame mapping.
//!
//! - Text frames are protocol frames
//! - Binary frames are accepted when they hold UTF-8 text
//! - Ping/Pong are transport lifecycle only (tungstenite answers pings itself)
//! - Close ends the inbound stream

use gqlsub_core::error::{GqlSubError, Result};
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Frame(String),
    Control,
    Close,
}

pub fn decode(msg: Message) -> Result<Inbound> {
    match msg {
        Message::Text(s) => Ok(Inbound::Frame(s.as_str().to_owned())),
        Message::Binary(b) => String::from_utf8(b.to_vec())
            .map(Inbound::Frame)
            .map_err(|e| GqlSubError::FrameDecode(format!("binary frame is not utf-8: {e}"))),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(Inbound::Control),
        Message::Close(_) => Ok(Inbound::Close),
    }
}
