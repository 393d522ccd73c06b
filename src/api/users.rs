//! User registration endpoint

use axum::{extract::State, http::StatusCode};

use crate::{error::AppResult, models::RegisterUser};

use super::ValidJson;

/// Register a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 200, description = "User registered, or already registered with this id"),
        (status = 400, description = "Malformed JSON or invalid parameters", body = crate::error::ErrorResponse),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_user(
    State(state): State<crate::AppState>,
    ValidJson(user): ValidJson<RegisterUser>,
) -> AppResult<StatusCode> {
    state.services.users.register(&user).await?;
    Ok(StatusCode::OK)
}
