//! Configuration module
//!
//! Configuration is supplied once, process-wide, at setup. Nothing here reads
//! files: hosts embed [`WideEventConfig`] in their own configuration (it is
//! `Deserialize`), and the bundled demo server fills [`AppConfig`] from
//! defaults, environment variables, and CLI flags.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`WIDE_EVENT_*`)
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use wide_event::config::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.server.port, 3000);
//! assert_eq!(config.wide_event.request_id_header, "x-request-id");
//! ```

pub mod error;
pub mod logging;
pub mod server;
pub mod wide_event;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use wide_event::{
    parse_start_entry, WideEventConfig, DEFAULT_REQUEST_ID_HEADER, ENVIRONMENT_VAR,
};

use serde::{Deserialize, Serialize};

/// Configuration for the demo server binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Diagnostic logging configuration
    pub logging: LoggingConfig,
    /// Wide event layer configuration
    pub wide_event: WideEventConfig,
}

impl AppConfig {
    /// Apply environment variable overrides
    ///
    /// Supports WIDE_EVENT_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("WIDE_EVENT_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("WIDE_EVENT_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("WIDE_EVENT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WIDE_EVENT_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self.wide_event = self.wide_event.with_env_overrides();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        self.wide_event.validate()
    }
}
