//! Shared test utilities for wide event integration tests.
//!
//! Provides helpers for building capture-backed state, sending requests
//! through a router, and parsing emitted records.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::Service;
use wide_event::logging::WideEventState;
use wide_event::render::RenderMode;
use wide_event::sink::{MemorySink, Stream};

// =============================================================================
// Well-Known Test Constants
// =============================================================================

/// UUID v4 string length: "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
pub const UUID_V4_STRING_LEN: usize = 36;

// =============================================================================
// State Builders
// =============================================================================

/// State in the given mode writing to a fresh in-memory sink, without colors.
pub fn capture_state(mode: RenderMode) -> (WideEventState, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let state = WideEventState::default()
        .with_render_mode(mode)
        .with_ansi(false)
        .with_sink(sink.clone());
    (state, sink)
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Build a request with a JSON body.
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless request.
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request through the router.
pub async fn send(app: &mut Router, request: Request<Body>) -> Response<Body> {
    app.call(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Record Helpers
// =============================================================================

/// Parse one JSON record line.
pub fn parse_record(line: &str) -> Value {
    serde_json::from_str(line).unwrap_or_else(|e| panic!("invalid record {:?}: {}", line, e))
}

/// The only record captured on `stream`.
pub fn single_record(sink: &MemorySink, stream: Stream) -> String {
    let records = sink.output(stream);
    assert_eq!(records.len(), 1, "expected exactly one record, got {:?}", records);
    records.into_iter().next().unwrap()
}
