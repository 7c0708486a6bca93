//! Mixpanel HTTP ingestion sink
//!
//! Delivers events to Mixpanel's `/track` endpoint. One sink instance
//! corresponds to one visitor session: it carries the distinct id every
//! event is attributed to.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::traits::{EventSink, Properties};
use crate::error::SinkError;

/// Default ingestion endpoint
const DEFAULT_API_HOST: &str = "https://api.mixpanel.com";

/// Configuration for [`MixpanelSink`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixpanelConfig {
    /// Project token; an empty token leaves the sink permanently not ready
    pub token: String,

    /// Ingestion host
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Distinct id to attribute events to; generated per session when absent
    #[serde(default)]
    pub distinct_id: Option<String>,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

impl MixpanelConfig {
    /// Config with the default ingestion host and a generated distinct id
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_host: default_api_host(),
            distinct_id: None,
        }
    }
}

/// Event envelope for the `/track` endpoint
#[derive(Debug, Serialize)]
struct TrackPayload<'a> {
    event: &'a str,
    properties: Properties,
}

/// Sink that posts events to Mixpanel over HTTP
pub struct MixpanelSink {
    config: MixpanelConfig,
    client: reqwest::Client,
    distinct_id: RwLock<String>,
}

impl MixpanelSink {
    pub fn new(config: MixpanelConfig) -> Self {
        let distinct_id = config
            .distinct_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            config,
            client: reqwest::Client::new(),
            distinct_id: RwLock::new(distinct_id),
        }
    }

    /// The distinct id events are currently attributed to
    pub fn distinct_id(&self) -> String {
        self.distinct_id.read().unwrap().clone()
    }

    /// Adopt a known visitor id for subsequent events
    pub fn identify(&self, distinct_id: impl Into<String>) {
        *self.distinct_id.write().unwrap() = distinct_id.into();
    }

    // Folds the session identity and the per-event bookkeeping Mixpanel
    // expects into the caller's properties.
    fn envelope<'a>(&self, event: &'a str, mut properties: Properties) -> TrackPayload<'a> {
        properties.insert("token".to_string(), Value::from(self.config.token.clone()));
        properties.insert("distinct_id".to_string(), Value::from(self.distinct_id()));
        properties.insert("time".to_string(), Value::from(Utc::now().timestamp_millis()));
        properties.insert(
            "$insert_id".to_string(),
            Value::from(Uuid::new_v4().to_string()),
        );

        TrackPayload { event, properties }
    }
}

#[async_trait]
impl EventSink for MixpanelSink {
    fn is_ready(&self) -> bool {
        !self.config.token.is_empty()
    }

    async fn emit(&self, event: &str, properties: Properties) -> Result<(), SinkError> {
        // The /track endpoint takes a JSON array of envelopes.
        let payload = [self.envelope(event, properties)];
        let endpoint = format!("{}/track", self.config.api_host.trim_end_matches('/'));

        let response = self.client.post(endpoint).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(event, "delivered event to Mixpanel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_iff_token_configured() {
        let with_token = MixpanelSink::new(MixpanelConfig::new("t0ken"));
        assert!(with_token.is_ready());

        let without = MixpanelSink::new(MixpanelConfig::new(""));
        assert!(!without.is_ready());
    }

    #[test]
    fn generates_a_distinct_id_when_none_configured() {
        let sink = MixpanelSink::new(MixpanelConfig::new("t0ken"));
        assert!(!sink.distinct_id().is_empty());
    }

    #[test]
    fn configured_distinct_id_is_used() {
        let config = MixpanelConfig {
            distinct_id: Some("visitor-42".to_string()),
            ..MixpanelConfig::new("t0ken")
        };
        let sink = MixpanelSink::new(config);
        assert_eq!(sink.distinct_id(), "visitor-42");
    }

    #[test]
    fn identify_replaces_the_distinct_id() {
        let sink = MixpanelSink::new(MixpanelConfig::new("t0ken"));
        sink.identify("visitor-42");
        assert_eq!(sink.distinct_id(), "visitor-42");
    }

    #[test]
    fn envelope_injects_session_identity() {
        let sink = MixpanelSink::new(MixpanelConfig::new("t0ken"));
        sink.identify("visitor-42");

        let mut properties = Properties::new();
        properties.insert("Referral Source".to_string(), Value::from("Bing"));

        let payload = sink.envelope("Referral Source Identified", properties);

        assert_eq!(payload.event, "Referral Source Identified");
        assert_eq!(payload.properties.get("token"), Some(&Value::from("t0ken")));
        assert_eq!(
            payload.properties.get("distinct_id"),
            Some(&Value::from("visitor-42"))
        );
        assert_eq!(
            payload.properties.get("Referral Source"),
            Some(&Value::from("Bing"))
        );
        assert!(payload.properties.contains_key("time"));
        assert!(payload.properties.contains_key("$insert_id"));
    }

    #[test]
    fn config_defaults_to_public_api_host() {
        let config = MixpanelConfig::new("t0ken");
        assert_eq!(config.api_host, "https://api.mixpanel.com");
        assert!(config.distinct_id.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = MixpanelConfig {
            token: "t0ken".to_string(),
            api_host: "https://api-eu.mixpanel.com".to_string(),
            distinct_id: Some("visitor-42".to_string()),
        };
        let toml = toml::to_string(&config).unwrap();
        let parsed: MixpanelConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }
}
