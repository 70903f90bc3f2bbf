//! Request lifecycle binding for wide events
//!
//! Ties a [`WideEvent`](crate::event::WideEvent) to each request flowing
//! through an axum router: the middleware resolves the request ID and creates
//! the accumulator before the handler runs, and flushes it exactly once with
//! the final status after the handler returns.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use wide_event::event::WideEventHandle;
//! use wide_event::logging::{with_wide_events, WideEventState};
//!
//! async fn handler(event: WideEventHandle) -> &'static str {
//!     event.set("cart", &serde_json::json!({"items": 3}));
//!     "ok"
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = with_wide_events(Router::new().route("/", get(handler)), WideEventState::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod fields;
pub mod middleware;
pub mod state;

pub use fields::{header_request_id, request_path};
pub use middleware::{generate_request_id, wide_event_middleware, with_wide_events, RequestId};
pub use state::{IdGenerator, WideEventState};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use wide_event::config::LoggingConfig;
/// use wide_event::logging::build_filter_directives;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("logging".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     component_levels: Some(component_levels),
///     ..Default::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,wide_event::logging=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",wide_event::{}={}", component, level));
        }
    }

    filter_str
}
