//! Event model
//!
//! Events are produced elsewhere in the hosting application and handed to
//! every registered listener. Listeners treat them as opaque JSON documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Event envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub details: Metadata,
    #[serde(default)]
    pub content: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl Event {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            details: Metadata {
                source: Some(source.into()),
                event_type: Some(event_type.into()),
                created: Some(chrono::Utc::now().timestamp_millis().to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    pub fn with_event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    pub fn event_type(&self) -> Option<&str> {
        self.details.event_type.as_deref()
    }
}

/// Where an event came from and what it is about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Creation time, epoch millis as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub request_headers: HashMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_json_shape() {
        let mut event = Event::default()
            .with_content("execution", json!({"id": "42"}))
            .with_event_id("evt-1");
        event.details.event_type = Some("pipeline.started".into());
        event.details.source = Some("orca".into());

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "details": {"source": "orca", "type": "pipeline.started"},
                "content": {"execution": {"id": "42"}},
                "eventId": "evt-1"
            })
        );
    }

    #[test]
    fn test_event_parses_partial_document() {
        let event: Event =
            serde_json::from_str(r#"{"details":{"type":"build","application":"app"}}"#).unwrap();
        assert_eq!(event.event_type(), Some("build"));
        assert_eq!(event.details.application.as_deref(), Some("app"));
        assert!(event.content.is_empty());
        assert!(event.event_id.is_none());
    }

    #[test]
    fn test_new_sets_created() {
        let event = Event::new("igor", "git");
        assert_eq!(event.details.source.as_deref(), Some("igor"));
        assert!(event.details.created.is_some());
    }
}
