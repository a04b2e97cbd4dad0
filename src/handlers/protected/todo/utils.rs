use axum::extract::rejection::JsonRejection;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::error::{messages, ApiError};

/// Parse the `:index` path segment. Anything that is not a non-negative integer is a missing todo.
pub fn parse_position(raw: &str) -> Result<usize, ApiError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ApiError::NotFound(messages::TODO_NOT_FOUND))
}

/// Unwrap a JSON body, reporting any rejection as a malformed todo
pub fn todo_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        tracing::debug!("Rejected todo body: {}", rejection.body_text());
        ApiError::BadRequest(messages::INVALID_TODO_FORMAT)
    })
}

/// New deadlines must not already have passed
pub fn ensure_future(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>, ApiError> {
    if deadline < now {
        return Err(ApiError::BadRequest(messages::INVALID_DEADLINE));
    }
    Ok(deadline)
}
