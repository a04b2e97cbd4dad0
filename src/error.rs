// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::database::{TodoError, UserError};
use crate::filter::FilterError;

/// Fixed client-facing messages. Underlying causes go to the log, never to the client.
pub mod messages {
    pub const INVALID_TODO_FORMAT: &str = "Invalid todo data format";
    pub const INVALID_DEADLINE: &str = "Invalid deadline";
    pub const READ_TODO_DATA: &str = "Failed to read todo data";
    pub const SAVE_TODO_DATA: &str = "Failed to save todo data";
    pub const TODO_NOT_FOUND: &str = "Todo does not exist";
    pub const TODO_FORBIDDEN: &str = "No permission to access this todo";
    pub const INVALID_QUERY: &str = "Invalid query parameters";
    pub const INVALID_USER_FORMAT: &str = "Invalid user data format";
    pub const INVALID_PASSWORD: &str = "Password is empty or too short";
    pub const USERNAME_TAKEN: &str = "Username is already registered";
    pub const READ_USER_DATA: &str = "Failed to read user data";
    pub const SAVE_USER_DATA: &str = "Failed to save user data";
    pub const LOGIN_FAILED: &str = "User not registered or wrong password";
    pub const NO_TOKEN: &str = "No token provided";
    pub const INVALID_TOKEN: &str = "Invalid token";
    pub const GENERATE_TOKEN: &str = "Failed to generate token";
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(&'static str),

    // 401 Unauthorized
    Unauthorized(&'static str),

    // 403 Forbidden
    Forbidden(&'static str),

    // 404 Not Found
    NotFound(&'static str),

    // 500 Internal Server Error
    InternalServerError(&'static str),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.message(),
            "code": self.error_code()
        })
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(_) => ApiError::NotFound(messages::TODO_NOT_FOUND),
            TodoError::Forbidden(_) => ApiError::Forbidden(messages::TODO_FORBIDDEN),
            TodoError::Storage(e) if e.is_write() => {
                tracing::error!("Todo store write error: {}", e);
                ApiError::InternalServerError(messages::SAVE_TODO_DATA)
            }
            TodoError::Storage(e) => {
                tracing::error!("Todo store read error: {}", e);
                ApiError::InternalServerError(messages::READ_TODO_DATA)
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Duplicate(_) => ApiError::BadRequest(messages::USERNAME_TAKEN),
            UserError::InvalidCredentials => ApiError::NotFound(messages::LOGIN_FAILED),
            UserError::Storage(e) if e.is_write() => {
                tracing::error!("User store write error: {}", e);
                ApiError::InternalServerError(messages::SAVE_USER_DATA)
            }
            UserError::Storage(e) => {
                tracing::error!("User store read error: {}", e);
                ApiError::InternalServerError(messages::READ_USER_DATA)
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Missing => ApiError::Unauthorized(messages::NO_TOKEN),
            JwtError::Malformed | JwtError::Invalid(_) => {
                ApiError::Unauthorized(messages::INVALID_TOKEN)
            }
            JwtError::Encode(msg) => {
                tracing::error!("JWT encode error: {}", msg);
                ApiError::InternalServerError(messages::GENERATE_TOKEN)
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        tracing::debug!("Rejected list query: {}", err);
        ApiError::BadRequest(messages::INVALID_QUERY)
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
