//! The assembled record emitted once per request

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Header keys that always win over field groups of the same name.
pub const RESERVED_KEYS: [&str; 6] = [
    "timestamp",
    "request_id",
    "method",
    "path",
    "status",
    "duration_ms",
];

/// Top-level key carrying the error payload.
pub const ERROR_KEY: &str = "error";

/// A fully assembled wide event, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Emission time
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: u64,
    /// Field groups in the order they were last written
    pub fields: Vec<(String, Value)>,
    pub error: Option<Value>,
}

impl EventRecord {
    /// Whether an error payload was recorded.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// ISO-8601 timestamp with millisecond precision, e.g. `2025-01-01T12:00:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        format_timestamp(&self.timestamp)
    }

    /// Flatten into a single JSON object.
    ///
    /// Header first, then field groups, then the header again so reserved
    /// keys win, then `error`. Key positions stay where they were first
    /// inserted, so the header leads the object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        self.write_header(&mut map);

        for (key, data) in &self.fields {
            map.insert(key.clone(), data.clone());
        }

        self.write_header(&mut map);

        if let Some(error) = &self.error {
            map.insert(ERROR_KEY.to_string(), error.clone());
        }

        map
    }

    fn write_header(&self, map: &mut Map<String, Value>) {
        map.insert("timestamp".to_string(), Value::from(self.timestamp_iso()));
        map.insert("request_id".to_string(), Value::from(self.request_id.clone()));
        map.insert("method".to_string(), Value::from(self.method.clone()));
        map.insert("path".to_string(), Value::from(self.path.clone()));
        map.insert("status".to_string(), Value::from(self.status));
        map.insert("duration_ms".to_string(), Value::from(self.duration_ms));
    }
}

/// Format a timestamp the way records carry it.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record() -> EventRecord {
        EventRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 5).unwrap(),
            request_id: "req-1".to_string(),
            method: "GET".to_string(),
            path: "/users/42".to_string(),
            status: 200,
            duration_ms: 7,
            fields: vec![],
            error: None,
        }
    }

    #[test]
    fn test_empty_record_has_full_header() {
        let map = record().to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, RESERVED_KEYS);
        assert_eq!(map["timestamp"], "2025-03-01T09:30:05.000Z");
        assert_eq!(map["status"], 200);
        assert!(!map.contains_key(ERROR_KEY));
    }

    #[test]
    fn test_header_wins_over_field_group() {
        let mut record = record();
        record.fields.push(("status".to_string(), json!({"spoofed": true})));
        record.fields.push(("path".to_string(), json!("/elsewhere")));
        record.fields.push(("user".to_string(), json!({"id": 1})));

        let map = record.to_map();
        assert_eq!(map["status"], 200);
        assert_eq!(map["path"], "/users/42");
        assert_eq!(map["user"], json!({"id": 1}));
    }

    #[test]
    fn test_error_payload_is_last_and_wins() {
        let mut record = record();
        record.fields.push(("error".to_string(), json!({"from": "group"})));
        record.error = Some(json!({"type": "AuthError"}));

        let map = record.to_map();
        assert_eq!(map[ERROR_KEY], json!({"type": "AuthError"}));
        assert!(record.has_error());
    }

    #[test]
    fn test_field_groups_keep_order() {
        let mut record = record();
        record.fields.push(("b".to_string(), json!({})));
        record.fields.push(("a".to_string(), json!({})));

        let map = record.to_map();
        let keys: Vec<&str> = map.keys().skip(RESERVED_KEYS.len()).map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
