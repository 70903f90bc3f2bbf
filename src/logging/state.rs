//! Process-wide wide event settings shared by every request

use super::fields::{header_request_id, request_path};
use super::middleware::generate_request_id;
use crate::config::{ConfigError, WideEventConfig, DEFAULT_REQUEST_ID_HEADER};
use crate::event::{WideEvent, WideEventError, WideEventHandle};
use crate::render::{self, RenderMode};
use crate::sink::{EventSink, StdioSink, Stream};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use chrono::Utc;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Custom request ID generator.
///
/// An `Err` or an empty ID falls back to [`generate_request_id`] for that
/// request.
pub type IdGenerator = Arc<dyn Fn() -> anyhow::Result<String> + Send + Sync>;

/// State for the wide event middleware.
///
/// Cheap to clone; the render mode is resolved once when the state is built.
#[derive(Clone)]
pub struct WideEventState {
    header_name: HeaderName,
    mode: RenderMode,
    ansi: bool,
    start: Arc<Map<String, Value>>,
    generator: Option<IdGenerator>,
    sink: Arc<dyn EventSink>,
}

impl WideEventState {
    /// Build state from configuration.
    pub fn new(config: &WideEventConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            header_name: config.header_name()?,
            mode: config.render_mode(),
            ansi: config.ansi,
            start: Arc::new(config.start.clone().unwrap_or_default()),
            generator: None,
            sink: Arc::new(StdioSink),
        })
    }

    /// Override request ID generation.
    pub fn with_id_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.generator = Some(Arc::new(generator));
        self
    }

    /// Send records somewhere other than the standard streams.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// Resolve the request ID: caller-supplied header first, then the
    /// configured generator, then a random UUID.
    pub fn resolve_request_id(&self, headers: &HeaderMap) -> String {
        if let Some(id) = header_request_id(headers, &self.header_name) {
            return id;
        }

        if let Some(generator) = &self.generator {
            match generator() {
                Ok(id) if !id.is_empty() => return id,
                Ok(_) => {
                    tracing::warn!("Request ID generator returned an empty ID, using default")
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Request ID generator failed, using default")
                }
            }
        }

        generate_request_id()
    }

    /// Start a request: resolve its ID and create its accumulator.
    pub fn begin(&self, method: &Method, uri: &Uri, headers: &HeaderMap) -> WideEventHandle {
        let request_id = self.resolve_request_id(headers);
        let event = WideEvent::new(request_id, method.as_str(), request_path(uri), self.mode)
            .with_ansi(self.ansi);
        WideEventHandle::new(event)
    }

    /// Finish a request: flush its accumulator once with the final status.
    ///
    /// Does nothing if the accumulator was already taken. Flush failures are
    /// reported through `tracing` and never propagate to the response.
    pub fn finish(&self, handle: &WideEventHandle, status: StatusCode) {
        let Some(event) = handle.take() else {
            tracing::debug!(
                request_id = %handle.request_id(),
                "No wide event to flush"
            );
            return;
        };

        if let Err(e) = event.flush_to(status.as_u16(), self.sink.as_ref()) {
            tracing::error!(
                request_id = %handle.request_id(),
                error = %e,
                "Failed to flush wide event"
            );
        }
    }

    /// Write the startup record for a server listening on `url`.
    ///
    /// Always goes to standard output, in the configured render mode.
    pub fn emit_startup(&self, url: &str) -> Result<(), WideEventError> {
        let now = Utc::now();
        let output = match self.mode {
            RenderMode::Json => render::render_startup_json(&now, &self.start, url)?,
            RenderMode::Pretty => {
                render::render_startup_pretty(&render::format_time(&now), &self.start, url, self.ansi)
            }
        };

        self.sink.write(Stream::Stdout, &output)?;
        Ok(())
    }
}

impl Default for WideEventState {
    fn default() -> Self {
        let config = WideEventConfig::default();
        Self {
            header_name: HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER),
            mode: config.render_mode(),
            ansi: config.ansi,
            start: Arc::new(Map::new()),
            generator: None,
            sink: Arc::new(StdioSink),
        }
    }
}

impl fmt::Debug for WideEventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WideEventState")
            .field("header_name", &self.header_name)
            .field("mode", &self.mode)
            .field("ansi", &self.ansi)
            .field("start", &self.start)
            .field("custom_generator", &self.generator.is_some())
            .finish()
    }
}
