//! User endpoint handlers.

use crate::api::{CreateUserRequest, CreateUserResponse, UserResponse};
use crate::event::WideEventHandle;
use axum::{extract::Path, Json};
use serde_json::json;
use uuid::Uuid;

/// POST /users - Create a user.
pub async fn create(
    event: WideEventHandle,
    Json(request): Json<CreateUserRequest>,
) -> Json<CreateUserResponse> {
    event.set("user", &json!({ "email": request.email }));

    let user_id = Uuid::new_v4().to_string();
    event.set("result", &json!({ "userId": user_id }));

    Json(CreateUserResponse {
        success: true,
        user_id,
    })
}

/// GET /users/:id - Fetch a user.
pub async fn show(event: WideEventHandle, Path(id): Path<String>) -> Json<UserResponse> {
    event.set("params", &json!({ "id": id }));

    Json(UserResponse {
        id,
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
    })
}
