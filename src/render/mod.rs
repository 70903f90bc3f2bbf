//! Record rendering
//!
//! Pure functions turning an [`EventRecord`] into either a single JSON line
//! for machine ingestion or a colorized multi-line block for humans. Nothing
//! here measures time or accumulates state.

use crate::event::{EventRecord, WideEventError};
use crate::event::record::format_timestamp;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output format, selected once per accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Colorized multi-line block
    #[default]
    Pretty,
    /// Single-line JSON object
    Json,
}

impl RenderMode {
    /// Resolve the mode: an explicit choice wins, then a `production`
    /// environment selects JSON, otherwise pretty.
    pub fn resolve(json: Option<bool>, environment: Option<&str>) -> Self {
        match (json, environment) {
            (Some(true), _) => RenderMode::Json,
            (Some(false), _) => RenderMode::Pretty,
            (None, Some(env)) if env.eq_ignore_ascii_case("production") => RenderMode::Json,
            (None, _) => RenderMode::Pretty,
        }
    }
}

/// Terminal styles used by the pretty renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Dim,
    Green,
    Red,
    Yellow,
    Blue,
}

/// Marker prefixed to the error line in pretty output.
pub const ERROR_MARKER: &str = "✗";

/// Apply a style, or return the text untouched when `ansi` is off.
pub fn paint(text: &str, style: Style, ansi: bool) -> String {
    if !ansi {
        return text.to_string();
    }
    match style {
        Style::Dim => text.dimmed().to_string(),
        Style::Green => text.green().to_string(),
        Style::Red => text.red().to_string(),
        Style::Yellow => text.yellow().to_string(),
        Style::Blue => text.blue().to_string(),
    }
}

/// Client and server errors stand out from successes.
pub fn status_style(status: u16) -> Style {
    if status >= 400 {
        Style::Red
    } else {
        Style::Green
    }
}

/// Short wall-clock time (`HH:MM:SS`, UTC) for pretty headers.
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Space-joined `key=value` pairs with JSON-encoded values.
///
/// Non-object data is shown as its JSON encoding.
pub fn format_data(data: &Value) -> String {
    match data {
        Value::Object(map) => format_map(map),
        other => other.to_string(),
    }
}

fn format_map(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of an error payload: `type: message`, `type`, or the raw
/// data when no `type` is present.
pub fn error_summary(payload: &Value) -> String {
    let Some(map) = payload.as_object() else {
        return payload.to_string();
    };

    match map.get("type") {
        Some(kind) => {
            let kind = plain_text(kind);
            match map.get("message").filter(|m| is_present(m)) {
                Some(message) => format!("{}: {}", kind, plain_text(message)),
                None => kind,
            }
        }
        None => format_map(map),
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Render a record as one JSON line (newline-terminated).
pub fn render_json(record: &EventRecord) -> Result<String, WideEventError> {
    encode_line(&Value::Object(record.to_map()))
}

/// Render a record as a human-readable block.
///
/// `header_time` is shown in the header; the record's own timestamp is only
/// used by the JSON form.
pub fn render_pretty(record: &EventRecord, header_time: &str, ansi: bool) -> String {
    let mut out = String::from("\n");

    out.push_str(&format!(
        "{} {} {} {}\n",
        paint(&format!("[{}]", header_time), Style::Dim, ansi),
        paint(&format!("{} {}", record.method, record.path), Style::Yellow, ansi),
        paint(&record.status.to_string(), status_style(record.status), ansi),
        paint(&format!("{}ms", record.duration_ms), Style::Dim, ansi),
    ));

    for (key, data) in &record.fields {
        out.push_str(&format!(
            "  {} {}\n",
            paint(&format!("{}:", key), Style::Blue, ansi),
            format_data(data)
        ));
    }

    if let Some(error) = &record.error {
        out.push_str(&format!(
            "  {} {}\n",
            paint(ERROR_MARKER, Style::Red, ansi),
            error_summary(error)
        ));
    }

    out
}

/// Render the startup record as one JSON line. `timestamp` and `url` win
/// over payload keys of the same name.
pub fn render_startup_json(
    timestamp: &DateTime<Utc>,
    start: &Map<String, Value>,
    url: &str,
) -> Result<String, WideEventError> {
    let timestamp = Value::from(format_timestamp(timestamp));

    let mut map = Map::new();
    map.insert("timestamp".to_string(), timestamp.clone());
    for (key, value) in start {
        map.insert(key.clone(), value.clone());
    }
    map.insert("timestamp".to_string(), timestamp);
    map.insert("url".to_string(), Value::from(url));

    encode_line(&Value::Object(map))
}

/// Render the startup record as a human-readable block.
pub fn render_startup_pretty(
    header_time: &str,
    start: &Map<String, Value>,
    url: &str,
    ansi: bool,
) -> String {
    let mut out = format!(
        "\n{} {} {}\n",
        paint(&format!("[{}]", header_time), Style::Dim, ansi),
        paint("server started", Style::Green, ansi),
        url
    );

    if !start.is_empty() {
        out.push_str(&format!("  {}\n", format_map(start)));
    }

    out
}

fn encode_line(value: &Value) -> Result<String, WideEventError> {
    let mut line = serde_json::to_string(value).map_err(|e| WideEventError::Serialization {
        field: "record".to_string(),
        message: e.to_string(),
    })?;
    line.push('\n');
    Ok(line)
}
