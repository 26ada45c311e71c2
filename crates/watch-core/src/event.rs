//! Deployment event decoding
//!
//! Raw events come from the platform's deployment events endpoint. Only
//! stderr, build and output events become [`Record`]s; metric values are
//! extracted from the free-text payload.

use crate::{EventKind, MetricValues, Record, Result};
use serde::{Deserialize, Serialize};

/// Event as delivered by the platform API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// Unix timestamp in milliseconds
    pub created: i64,
    #[serde(default)]
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub info: EventInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(rename = "type", default)]
    pub info_type: Option<String>,
}

impl DeploymentEvent {
    /// Classify the event; `None` for events that carry no metrics
    pub fn kind(&self) -> Option<EventKind> {
        if self.event_type == "stderr" {
            return Some(EventKind::Error);
        }

        match self.payload.info.info_type.as_deref() {
            Some("build") => Some(EventKind::Build),
            Some("output") => Some(EventKind::Output),
            _ => None,
        }
    }

    pub fn to_record(&self) -> Option<Record> {
        self.kind().map(|kind| {
            Record::new(
                self.created,
                kind,
                MetricValues::from_log_text(&self.payload.text),
            )
        })
    }
}

/// Decode the JSON array returned by the events endpoint
pub fn parse_events(json: &str) -> Result<Vec<DeploymentEvent>> {
    Ok(serde_json::from_str(json)?)
}

/// Keep the events that map to records, preserving their order
pub fn records_from_events(events: &[DeploymentEvent]) -> Vec<Record> {
    events.iter().filter_map(DeploymentEvent::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Metric;

    const EVENTS: &str = r#"[
        {"type": "stdout", "created": 1000, "payload": {"deploymentId": "dpl_1", "text": "Cloning repository", "info": {"type": "build"}}},
        {"type": "stdout", "created": 2000, "payload": {"deploymentId": "dpl_1", "text": "REPORT Duration: 4.5 ms Billed Duration: 100 ms Memory Size: 1024 MB Max Memory Used: 70 MB", "info": {"type": "output"}}},
        {"type": "stderr", "created": 3000, "payload": {"deploymentId": "dpl_1", "text": "Error: boom"}},
        {"type": "command", "created": 4000, "payload": {"text": "now deploy", "info": {"type": "command"}}}
    ]"#;

    #[test]
    fn test_parse_and_classify() {
        let events = parse_events(EVENTS).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].kind(), Some(EventKind::Build));
        assert_eq!(events[1].kind(), Some(EventKind::Output));
        assert_eq!(events[2].kind(), Some(EventKind::Error));
        assert_eq!(events[3].kind(), None);
        assert_eq!(events[0].payload.deployment_id.as_deref(), Some("dpl_1"));
    }

    #[test]
    fn test_records_from_events() {
        let events = parse_events(EVENTS).unwrap();
        let records = records_from_events(&events);

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].timestamp, 2000);
        assert_eq!(records[1].get(Metric::Duration), Some(4.5));
        assert_eq!(records[1].get(Metric::MaxMemoryUsed), Some(70.0));
        assert_eq!(records[0].get(Metric::Duration), None);
    }

    #[test]
    fn test_missing_payload_defaults() {
        let events = parse_events(r#"[{"type": "stderr", "created": 5}]"#).unwrap();
        let records = records_from_events(&events);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metrics, MetricValues::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(parse_events("{not json").is_err());
    }
}
