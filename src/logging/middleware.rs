//! Wide event middleware and request ID generation

use super::state::WideEventState;
use crate::event::WideEventHandle;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use uuid::Uuid;

/// Generate a new request ID using UUID v4
///
/// # Examples
///
/// ```
/// use wide_event::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Resolved request ID, available to handlers and other middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wide event lifecycle middleware.
///
/// This middleware:
/// 1. Resolves the request ID and creates the request's accumulator
/// 2. Exposes a [`WideEventHandle`] and a [`RequestId`] through request extensions
/// 3. Runs the rest of the stack
/// 4. Flushes the accumulator once with the response status
pub async fn wide_event_middleware(
    State(state): State<WideEventState>,
    mut request: Request,
    next: Next,
) -> Response {
    let handle = state.begin(request.method(), request.uri(), request.headers());

    request
        .extensions_mut()
        .insert(RequestId(handle.request_id().to_string()));
    request.extensions_mut().insert(handle.clone());

    let response = next.run(request).await;

    state.finish(&handle, response.status());
    response
}

/// Wrap `router` so every request carries a wide event.
///
/// Layers added to `router` before this call run inside the wide event, so a
/// `CatchPanicLayer` added first turns handler panics into a 500 that is
/// still recorded.
pub fn with_wide_events<S>(router: Router<S>, state: WideEventState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(state, wide_event_middleware))
}

const MISSING_LAYER: &str = "wide event middleware is not installed";

#[async_trait]
impl<S> FromRequestParts<S> for WideEventHandle
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<WideEventHandle>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, MISSING_LAYER))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, MISSING_LAYER))
    }
}
