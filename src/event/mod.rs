//! Per-request wide event accumulator
//!
//! A [`WideEvent`] collects every observation made while handling one
//! request and emits them as a single record when flushed. Field groups are
//! named bundles of arbitrary data; writing the same name twice replaces the
//! earlier group. At most one error payload is kept (last write wins).
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use wide_event::event::WideEvent;
//! use wide_event::render::RenderMode;
//! use wide_event::sink::{MemorySink, Stream};
//!
//! let mut event = WideEvent::new("req-1", "POST", "/users", RenderMode::Json);
//! event.set("user", &json!({"email": "a@b.com"}));
//!
//! let sink = MemorySink::new();
//! event.flush_to(201, &sink).unwrap();
//!
//! let line = &sink.output(Stream::Stdout).remove(0);
//! assert!(line.contains(r#""status":201"#));
//! ```

pub mod error;
mod finite;
pub mod handle;
pub mod record;

pub use error::WideEventError;
pub use handle::WideEventHandle;
pub use record::{EventRecord, ERROR_KEY, RESERVED_KEYS};

use crate::render::{self, RenderMode};
use crate::sink::{EventSink, StdioSink, Stream};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// A value captured by `set` or `error`.
#[derive(Debug, Clone)]
enum Slot {
    Encoded(Value),
    /// Encoding failed; holds the serializer's message
    Unencodable(String),
}

impl Slot {
    /// NaN and infinities count as unencodable rather than becoming `null`.
    fn encode<T: Serialize + ?Sized>(data: &T) -> Self {
        match serde_json::to_value(data).and_then(|value| finite::check(data).map(|_| value)) {
            Ok(value) => Slot::Encoded(value),
            Err(e) => Slot::Unencodable(e.to_string()),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Slot::Encoded(value) => value,
            Slot::Unencodable(message) => Value::String(format!("[unserializable: {}]", message)),
        }
    }
}

/// Accumulates one request's observations until flush.
#[derive(Debug)]
pub struct WideEvent {
    request_id: String,
    method: String,
    path: String,
    mode: RenderMode,
    ansi: bool,
    started: Instant,
    started_at: DateTime<Utc>,
    fields: Vec<(String, Slot)>,
    error: Option<Slot>,
}

impl WideEvent {
    /// Start accumulating for a request. The start time is captured here.
    pub fn new(
        request_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        mode: RenderMode,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            method: method.into(),
            path: path.into(),
            mode,
            ansi: true,
            started: Instant::now(),
            started_at: Utc::now(),
            fields: Vec::new(),
            error: None,
        }
    }

    /// Enable or disable ANSI colors in pretty output.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Store or replace the field group named `key`.
    ///
    /// The group moves to the end of the render order. Data that fails to
    /// serialize is kept as an `[unserializable: ...]` string and reported by
    /// [`flush`](Self::flush).
    pub fn set<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, data: &T) {
        let key = key.into();
        self.fields.retain(|(existing, _)| *existing != key);
        self.fields.push((key, Slot::encode(data)));
    }

    /// Store or replace the error payload. The payload is free-form.
    pub fn error<T: Serialize + ?Sized>(&mut self, payload: &T) {
        self.error = Some(Slot::encode(payload));
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Number of field groups currently held.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Emit the record to the standard streams.
    pub fn flush(self, status: u16) -> Result<(), WideEventError> {
        self.flush_to(status, &StdioSink)
    }

    /// Emit the record to `sink`.
    ///
    /// JSON records carrying an error payload go to [`Stream::Stderr`]; every
    /// other record goes to [`Stream::Stdout`]. The record is written even
    /// when some value failed to serialize; that failure is then returned.
    pub fn flush_to(self, status: u16, sink: &dyn EventSink) -> Result<(), WideEventError> {
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let header_time = render::format_time(&self.started_at);
        let mode = self.mode;
        let ansi = self.ansi;

        let (record, failure) = self.into_record(status, duration_ms, Utc::now());

        let (stream, output) = match mode {
            RenderMode::Json => {
                let stream = if record.has_error() {
                    Stream::Stderr
                } else {
                    Stream::Stdout
                };
                (stream, render::render_json(&record)?)
            }
            RenderMode::Pretty => (Stream::Stdout, render::render_pretty(&record, &header_time, ansi)),
        };

        sink.write(stream, &output)?;

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Assemble the record, returning the first serialization failure if any.
    fn into_record(
        self,
        status: u16,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> (EventRecord, Option<WideEventError>) {
        let mut failure = None;
        let mut note_failure = |field: &str, slot: &Slot| {
            if failure.is_some() {
                return;
            }
            if let Slot::Unencodable(message) = slot {
                failure = Some(WideEventError::Serialization {
                    field: field.to_string(),
                    message: message.clone(),
                });
            }
        };

        let mut fields = Vec::with_capacity(self.fields.len());
        for (key, slot) in self.fields {
            note_failure(&key, &slot);
            fields.push((key, slot.into_value()));
        }

        let error = self.error.map(|slot| {
            note_failure(ERROR_KEY, &slot);
            slot.into_value()
        });

        let record = EventRecord {
            timestamp,
            request_id: self.request_id,
            method: self.method,
            path: self.path,
            status,
            duration_ms,
            fields,
            error,
        };

        (record, failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn parse(line: &str) -> Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_set_overwrites_instead_of_merging() {
        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.set("user", &json!({"id": 1, "email": "a@b.com"}));
        event.set("user", &json!({"id": 2}));
        assert_eq!(event.field_count(), 1);

        let sink = MemorySink::new();
        event.flush_to(200, &sink).unwrap();

        let record = parse(&sink.output(Stream::Stdout).remove(0));
        assert_eq!(record["user"], json!({"id": 2}));
    }

    #[test]
    fn test_rewritten_group_moves_to_end() {
        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.set("a", &json!({"n": 1}));
        event.set("b", &json!({"n": 2}));
        event.set("a", &json!({"n": 3}));

        let (record, failure) = event.into_record(200, 0, Utc::now());
        assert!(failure.is_none());
        let keys: Vec<&str> = record.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_error_last_write_wins() {
        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.error(&json!({"type": "First"}));
        event.error(&json!({"type": "Second", "code": "E2"}));

        let sink = MemorySink::new();
        event.flush_to(500, &sink).unwrap();

        let record = parse(&sink.output(Stream::Stderr).remove(0));
        assert_eq!(record["error"], json!({"type": "Second", "code": "E2"}));
    }

    #[test]
    fn test_json_without_error_goes_to_stdout() {
        let event = WideEvent::new("req-1", "GET", "/health", RenderMode::Json);
        let sink = MemorySink::new();
        event.flush_to(200, &sink).unwrap();

        assert_eq!(sink.output(Stream::Stdout).len(), 1);
        assert!(sink.output(Stream::Stderr).is_empty());

        let record = parse(&sink.output(Stream::Stdout).remove(0));
        assert!(record.get("error").is_none());
        assert_eq!(record["method"], "GET");
        assert_eq!(record["path"], "/health");
    }

    #[test]
    fn test_pretty_error_stays_on_stdout() {
        let mut event =
            WideEvent::new("req-1", "POST", "/login", RenderMode::Pretty).with_ansi(false);
        event.error(&json!({"type": "AuthError"}));

        let sink = MemorySink::new();
        event.flush_to(401, &sink).unwrap();

        assert!(sink.output(Stream::Stderr).is_empty());
        let out = &sink.output(Stream::Stdout).remove(0);
        assert!(out.contains("POST /login 401"));
        assert!(out.contains("✗ AuthError"));
    }

    #[test]
    fn test_duration_reflects_elapsed_time() {
        let event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        std::thread::sleep(Duration::from_millis(20));

        let sink = MemorySink::new();
        event.flush_to(200, &sink).unwrap();

        let record = parse(&sink.output(Stream::Stdout).remove(0));
        let duration = record["duration_ms"].as_u64().unwrap();
        assert!(duration >= 20, "duration was {}ms", duration);
        assert!(duration < 2000, "duration was {}ms", duration);
    }

    #[test]
    fn test_unserializable_group_is_stringified_and_reported() {
        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys are not JSON");

        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.set("ok", &json!({"fine": true}));
        event.set("bad", &bad);

        let sink = MemorySink::new();
        let err = event.flush_to(200, &sink).unwrap_err();
        assert!(matches!(err, WideEventError::Serialization { ref field, .. } if field == "bad"));

        // The rest of the record is still emitted
        let record = parse(&sink.output(Stream::Stdout).remove(0));
        assert_eq!(record["ok"], json!({"fine": true}));
        assert!(record["bad"]
            .as_str()
            .unwrap()
            .starts_with("[unserializable:"));
    }

    #[test]
    fn test_non_finite_floats_are_reported_not_nulled() {
        #[derive(Serialize)]
        struct Metrics {
            ratio: f64,
            latency: f64,
        }

        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.set(
            "metrics",
            &Metrics {
                ratio: f64::NAN,
                latency: f64::INFINITY,
            },
        );
        event.set("ok", &json!({"ratio": 0.25}));

        let sink = MemorySink::new();
        let err = event.flush_to(200, &sink).unwrap_err();
        assert!(matches!(err, WideEventError::Serialization { ref field, .. } if field == "metrics"));

        let record = parse(&sink.output(Stream::Stdout).remove(0));
        let metrics = record["metrics"].as_str().unwrap();
        assert!(metrics.starts_with("[unserializable:"), "got {}", metrics);
        assert!(metrics.contains("NaN"));
        assert_eq!(record["ok"], json!({"ratio": 0.25}));
    }

    #[test]
    fn test_non_finite_error_payload_is_reported() {
        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.error(&json!({"type": "Overflow"}));
        event.error(&[f64::NEG_INFINITY]);

        let sink = MemorySink::new();
        let err = event.flush_to(500, &sink).unwrap_err();
        assert!(err.to_string().contains("'error'"));

        let record = parse(&sink.output(Stream::Stderr).remove(0));
        assert!(record["error"].as_str().unwrap().starts_with("[unserializable:"));
    }

    #[test]
    fn test_unserializable_error_still_routes_to_stderr() {
        let mut bad = HashMap::new();
        bad.insert((0, 0), 1);

        let mut event = WideEvent::new("req-1", "GET", "/", RenderMode::Json);
        event.error(&bad);

        let sink = MemorySink::new();
        let err = event.flush_to(500, &sink).unwrap_err();
        assert!(err.to_string().contains("'error'"));
        assert_eq!(sink.output(Stream::Stderr).len(), 1);
    }

    #[test]
    fn test_non_object_data_is_accepted() {
        let mut event =
            WideEvent::new("req-1", "GET", "/", RenderMode::Pretty).with_ansi(false);
        event.set("count", &3);
        event.set("tags", &vec!["a", "b"]);

        let sink = MemorySink::new();
        event.flush_to(200, &sink).unwrap();

        let out = &sink.output(Stream::Stdout).remove(0);
        assert!(out.contains("  count: 3\n"));
        assert!(out.contains("  tags: [\"a\",\"b\"]\n"));
    }

    #[test]
    fn test_accessors() {
        let event = WideEvent::new("req-9", "DELETE", "/users/9", RenderMode::Pretty);
        assert_eq!(event.request_id(), "req-9");
        assert_eq!(event.method(), "DELETE");
        assert_eq!(event.path(), "/users/9");
        assert_eq!(event.mode(), RenderMode::Pretty);
        assert!(!event.has_error());
        assert_eq!(event.field_count(), 0);
    }
}
