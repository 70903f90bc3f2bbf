//! Wide event configuration

use super::ConfigError;
use crate::render::RenderMode;
use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default header carrying a caller-supplied request ID.
pub const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

/// Environment variable naming the execution environment.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Settings for the wide event layer, supplied once at setup.
///
/// The ID generator override is not part of this struct since it cannot be
/// deserialized; see [`WideEventState::with_id_generator`](crate::logging::WideEventState::with_id_generator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WideEventConfig {
    /// Header to read an incoming request ID from
    pub request_id_header: String,
    /// Force JSON (`Some(true)`) or pretty (`Some(false)`) output.
    /// `None` derives the mode from `APP_ENV`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
    /// Colorize pretty output
    pub ansi: bool,
    /// Extra fields for the startup record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Map<String, Value>>,
}

impl Default for WideEventConfig {
    fn default() -> Self {
        Self {
            request_id_header: DEFAULT_REQUEST_ID_HEADER.to_string(),
            json: None,
            ansi: true,
            start: None,
        }
    }
}

impl WideEventConfig {
    /// Apply environment variable overrides
    ///
    /// Supports `WIDE_EVENT_JSON` and `WIDE_EVENT_REQUEST_ID_HEADER`.
    /// Invalid values are silently ignored (current values are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(json) = std::env::var("WIDE_EVENT_JSON") {
            match json.to_lowercase().as_str() {
                "true" | "1" => self.json = Some(true),
                "false" | "0" => self.json = Some(false),
                _ => {}
            }
        }
        if let Ok(header) = std::env::var("WIDE_EVENT_REQUEST_ID_HEADER") {
            if !header.is_empty() {
                self.request_id_header = header;
            }
        }
        self
    }

    /// Resolve the render mode from this config and the process environment.
    pub fn render_mode(&self) -> RenderMode {
        let environment = std::env::var(ENVIRONMENT_VAR).ok();
        RenderMode::resolve(self.json, environment.as_deref())
    }

    /// Parsed request ID header name.
    pub fn header_name(&self) -> Result<HeaderName, ConfigError> {
        if self.request_id_header.is_empty() {
            return Err(ConfigError::Validation {
                field: "wide_event.request_id_header".to_string(),
                message: "header name cannot be empty".to_string(),
            });
        }
        HeaderName::from_bytes(self.request_id_header.to_lowercase().as_bytes()).map_err(|e| {
            ConfigError::Validation {
                field: "wide_event.request_id_header".to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.header_name().map(|_| ())
    }
}

/// Parse a `key=value` startup entry.
///
/// The value is read as JSON when it parses, so `--start replicas=3` yields a
/// number; anything else is kept as a plain string.
pub fn parse_start_entry(entry: &str) -> Result<(String, Value), ConfigError> {
    let (key, raw) = entry
        .split_once('=')
        .ok_or_else(|| ConfigError::Parse(format!("expected key=value, got '{}'", entry)))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::Parse(format!("missing key in '{}'", entry)));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
