//! `{id, type, payload}` envelope (JSON text frame).
//!
//! `payload` is stored as `RawValue`: the engine never interprets data or
//! error bodies, it hands the bytes to the subscriber untouched.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::error::{GqlSubError, Result};
use crate::protocol::message::MessageType;

/// Envelope exchanged in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Subscription id; absent on connection-scoped messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    /// Optional payload, stored as raw JSON. A JSON `null` decodes as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<RawValue>>,
}

/// Body of a `start` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPayload {
    pub query: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

/// Serialize any value into a raw payload.
pub fn raw_payload<T: Serialize + ?Sized>(value: &T) -> Result<Box<RawValue>> {
    serde_json::value::to_raw_value(value)
        .map_err(|e| GqlSubError::Encode(format!("payload encode failed: {e}")))
}

impl Envelope {
    fn new(id: Option<String>, msg_type: MessageType, payload: Option<Box<RawValue>>) -> Self {
        Self {
            id,
            msg_type,
            payload,
        }
    }

    pub fn init(payload: Option<Box<RawValue>>) -> Self {
        Self::new(None, MessageType::ConnectionInit, payload)
    }

    pub fn start(id: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self::new(Some(id.into()), MessageType::Start, Some(payload))
    }

    pub fn stop(id: impl Into<String>) -> Self {
        Self::new(Some(id.into()), MessageType::Stop, None)
    }

    pub fn terminate() -> Self {
        Self::new(None, MessageType::ConnectionTerminate, None)
    }

    pub fn ack() -> Self {
        Self::new(None, MessageType::ConnectionAck, None)
    }

    pub fn connection_error(payload: Box<RawValue>) -> Self {
        Self::new(None, MessageType::ConnectionError, Some(payload))
    }

    pub fn data(id: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self::new(Some(id.into()), MessageType::Data, Some(payload))
    }

    pub fn error(id: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self::new(Some(id.into()), MessageType::Error, Some(payload))
    }

    pub fn complete(id: impl Into<String>) -> Self {
        Self::new(Some(id.into()), MessageType::Complete, None)
    }

    /// Decode a text frame.
    pub fn decode(frame: &str) -> Result<Self> {
        serde_json::from_str(frame)
            .map_err(|e| GqlSubError::FrameDecode(format!("invalid envelope json: {e}")))
    }

    /// Encode to a text frame.
    pub fn encode(&self) -> Result<String> {
        if self.msg_type == MessageType::Unknown {
            return Err(GqlSubError::Encode("cannot encode unknown message type".into()));
        }
        serde_json::to_string(self)
            .map_err(|e| GqlSubError::Encode(format!("envelope encode failed: {e}")))
    }

    /// Payload as uninterpreted bytes (empty when absent).
    pub fn payload_bytes(&self) -> Bytes {
        self.payload
            .as_ref()
            .map(|raw| Bytes::copy_from_slice(raw.get().as_bytes()))
            .unwrap_or_default()
    }

    /// Decode the payload of a `start` frame.
    pub fn start_payload(&self) -> Result<StartPayload> {
        let raw = self
            .payload
            .as_ref()
            .ok_or_else(|| GqlSubError::FrameDecode("start frame without payload".into()))?;
        serde_json::from_str(raw.get())
            .map_err(|e| GqlSubError::FrameDecode(format!("invalid start payload: {e}")))
    }
}
