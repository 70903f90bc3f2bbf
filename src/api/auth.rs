//! Login endpoint handler.

use crate::api::{ApiError, LoginRequest, LoginResponse};
use crate::event::WideEventHandle;
use axum::Json;
use serde_json::json;

/// Password accepted by the demo login.
pub const DEMO_PASSWORD: &str = "secret";

/// POST /login - Check credentials.
pub async fn login(
    event: WideEventHandle,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    event.set("auth", &json!({ "email": request.email }));

    if request.password != DEMO_PASSWORD {
        let err = ApiError::unauthorized("Invalid credentials");
        event.error(&json!({ "type": err.error.r#type, "message": err.error.message }));
        return Err(err);
    }

    let token = "jwt-token-here".to_string();
    event.set("result", &json!({ "token": token }));

    Ok(Json(LoginResponse {
        success: true,
        token: Some(token),
    }))
}
