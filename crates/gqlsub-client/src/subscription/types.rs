use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use gqlsub_core::error::{GqlSubError, Result};
use gqlsub_core::protocol::{raw_payload, StartPayload};

/// Query text plus variables; becomes the `start` payload.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRequest {
    pub query: String,
    pub variables: Map<String, Value>,
}

impl SubscriptionRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    /// Add one variable. Values that fail to serialize are stored as `null`.
    pub fn var(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.variables.insert(name.into(), value);
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    pub(crate) fn start_payload(&self) -> Result<Box<serde_json::value::RawValue>> {
        raw_payload(&StartPayload {
            query: self.query.clone(),
            variables: self.variables.clone(),
        })
    }
}

/// One delivery on a subscription: server data or a server error body, both
/// as uninterpreted JSON bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionPayload {
    Data(Bytes),
    Error(Bytes),
}

impl SubscriptionPayload {
    pub fn data(&self) -> Option<&Bytes> {
        match self {
            SubscriptionPayload::Data(b) => Some(b),
            SubscriptionPayload::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Bytes> {
        match self {
            SubscriptionPayload::Error(b) => Some(b),
            SubscriptionPayload::Data(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SubscriptionPayload::Error(_))
    }

    pub fn as_bytes(&self) -> &Bytes {
        match self {
            SubscriptionPayload::Data(b) | SubscriptionPayload::Error(b) => b,
        }
    }

    /// Decode the body into a caller type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(self.as_bytes())
            .map_err(|e| GqlSubError::FrameDecode(format!("payload decode failed: {e}")))
    }
}
