use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use gqlsub_core::error::{GqlSubError, Result};

use crate::subscription::SubscriptionRequest;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    pub client: ClientSection,

    #[serde(default)]
    pub subscriptions: Vec<SubscriptionConfig>,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GqlSubError::UnsupportedVersion);
        }

        self.client.validate()?;

        for (i, s) in self.subscriptions.iter().enumerate() {
            if s.query.trim().is_empty() {
                return Err(GqlSubError::BadConfig(format!(
                    "subscriptions[{i}].query must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// `http(s)://` or `ws(s)://` URL of the subscription endpoint.
    pub endpoint: String,

    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,

    /// Extra upgrade-request headers (e.g. `Authorization`).
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Sent as the `connection_init` payload.
    #[serde(default)]
    pub init_payload: Value,
}

impl ClientSection {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            headers: HashMap::new(),
            init_payload: Value::Null,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let scheme_ok = ["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|p| self.endpoint.starts_with(p));
        if !scheme_ok {
            return Err(GqlSubError::BadConfig(
                "client.endpoint must start with http://, https://, ws:// or wss://".into(),
            ));
        }
        if !(100..=120000).contains(&self.handshake_timeout_ms) {
            return Err(GqlSubError::BadConfig(
                "client.handshake_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        Ok(())
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

fn default_handshake_timeout_ms() -> u64 {
    10000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionConfig {
    pub query: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl SubscriptionConfig {
    pub fn to_request(&self) -> SubscriptionRequest {
        SubscriptionRequest::new(self.query.clone()).with_variables(self.variables.clone())
    }
}
