use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::User;
use crate::error::{messages, ApiError};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
}

/// POST /register - Register new user account
///
/// Expected Input:
/// ```json
/// { "username": "string", "password": "string (longer than 6 characters)" }
/// ```
///
/// Usernames are unique and, like passwords, stored exactly as given.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<RegisterResponse> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected register body: {}", rejection.body_text());
        ApiError::BadRequest(messages::INVALID_USER_FORMAT)
    })?;

    if request.username.trim().is_empty() {
        return Err(ApiError::BadRequest(messages::INVALID_USER_FORMAT));
    }

    if request.password.chars().count() <= state.config.security.min_password_len {
        return Err(ApiError::BadRequest(messages::INVALID_PASSWORD));
    }

    state
        .users
        .register(User::new(&request.username, request.password))
        .await?;

    Ok(ApiResponse::created(RegisterResponse {
        username: request.username,
    }))
}
