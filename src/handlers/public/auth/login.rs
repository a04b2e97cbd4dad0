use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::error::{messages, ApiError};
use crate::middleware::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// POST /login - Authenticate user and receive JWT token
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "username": "alice",
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "token_type": "Bearer",
///     "expires_in": 3600
///   }
/// }
/// ```
///
/// The same token is also sent as `Authorization: Bearer <token>`.
/// Unknown users and wrong passwords both answer 404.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected login body: {}", rejection.body_text());
        ApiError::BadRequest(messages::INVALID_USER_FORMAT)
    })?;

    let user = state
        .users
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| {
            tracing::warn!(user = %request.username, "Login failed: {}", e);
            ApiError::from(e)
        })?;

    let issued = state.tokens.issue(&user.username)?;
    let header = HeaderValue::from_str(&issued.bearer())
        .map_err(|_| ApiError::InternalServerError(messages::GENERATE_TOKEN))?;

    tracing::info!(user = %user.username, "user logged in");

    let body = ApiResponse::success(LoginResponse {
        username: user.username,
        token: issued.token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    });

    Ok(([(AUTHORIZATION, header)], body).into_response())
}
