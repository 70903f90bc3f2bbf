//! # Demo API
//!
//! A small axum application wired with the wide event layer, used by the
//! `wide-event serve` command and by the integration tests.
//!
//! ## Endpoints
//!
//! - `POST /users` - Create a user (records `user` and `result`)
//! - `GET /users/:id` - Fetch a user (records `params`)
//! - `POST /login` - Log in; a wrong password returns 401 and records an `AuthError`
//! - `GET /health` - Liveness probe
//!
//! ## Example
//!
//! ```no_run
//! use wide_event::api::create_router;
//! use wide_event::logging::WideEventState;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_router(WideEventState::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod health;
mod users;
pub mod types;

pub use auth::DEMO_PASSWORD;
pub use types::*;

use crate::logging::{with_wide_events, WideEventState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer};

/// Maximum request body size (1 MB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Create the demo router with the wide event layer outermost.
pub fn create_router(wide_events: WideEventState) -> Router {
    let routes = Router::new()
        .route("/users", post(users::create))
        .route("/users/:id", get(users::show))
        .route("/login", post(auth::login))
        .route("/health", get(health::handle))
        .layer(CatchPanicLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE));

    with_wide_events(routes, wide_events)
}
