//! Wire message types.
//!
//! The literals are a compatibility contract with existing `graphql-ws`
//! servers and must not change.

use serde::{Deserialize, Serialize};

/// Envelope `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Client -> Server
    #[serde(rename = "connection_init")]
    ConnectionInit,
    /// Client -> Server
    #[serde(rename = "start")]
    Start,
    /// Client -> Server
    #[serde(rename = "stop")]
    Stop,
    /// Client -> Server
    #[serde(rename = "connection_terminate")]
    ConnectionTerminate,
    /// Server -> Client
    #[serde(rename = "connection_ack")]
    ConnectionAck,
    /// Server -> Client
    #[serde(rename = "connection_error")]
    ConnectionError,
    /// Server -> Client
    #[serde(rename = "data")]
    Data,
    /// Server -> Client
    #[serde(rename = "error")]
    Error,
    /// Server -> Client
    #[serde(rename = "complete")]
    Complete,
    /// Any unrecognized literal. Decoded frames carrying it are inert; it is
    /// never encoded.
    #[serde(other)]
    Unknown,
}

impl MessageType {
    /// Wire literal.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::ConnectionInit => "connection_init",
            MessageType::Start => "start",
            MessageType::Stop => "stop",
            MessageType::ConnectionTerminate => "connection_terminate",
            MessageType::ConnectionAck => "connection_ack",
            MessageType::ConnectionError => "connection_error",
            MessageType::Data => "data",
            MessageType::Error => "error",
            MessageType::Complete => "complete",
            MessageType::Unknown => "unknown",
        }
    }

    pub fn is_client_to_server(self) -> bool {
        matches!(
            self,
            MessageType::ConnectionInit
                | MessageType::Start
                | MessageType::Stop
                | MessageType::ConnectionTerminate
        )
    }

    /// Subscription-scoped messages carry an `id`; connection-scoped ones do not.
    pub fn is_subscription_scoped(self) -> bool {
        matches!(
            self,
            MessageType::Start
                | MessageType::Stop
                | MessageType::Data
                | MessageType::Error
                | MessageType::Complete
        )
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
