//! Diagnostic logging configuration
//!
//! Governs the process's own `tracing` output on stderr: generator
//! fallbacks, flush failures, late writes to a flushed handle, server
//! lifecycle. Wide event records never pass through here.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Format of the stderr diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per diagnostic, for collectors that already parse
    /// the JSON wide event stream
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::Validation {
                field: "logging.format".to_string(),
                message: format!("expected 'pretty' or 'json', got '{}'", s),
            }),
        }
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base `EnvFilter` level
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels keyed by module path under the crate, e.g.
    /// `{"logging::state": "debug"}` to see every ID generator fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}
