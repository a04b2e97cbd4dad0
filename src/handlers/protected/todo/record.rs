use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::TodoView;
use crate::database::TodoChanges;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{parse_position, todo_body};

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub content: String,
    #[serde(default)]
    pub done: bool,
    pub deadline: Option<DateTime<Utc>>,
}

/// GET /todo/:index - show the todo stored at this array position
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(index): Path<String>,
) -> ApiResult<TodoView> {
    let position = parse_position(&index)?;
    let todo = state.todos.get(&user.username, position).await?;

    Ok(ApiResponse::success(todo.view(position)))
}

/// PUT /todo/:index - replace content and done state, and the deadline when given
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(index): Path<String>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<TodoView> {
    let position = parse_position(&index)?;
    let request = todo_body(body)?;

    let changes = TodoChanges {
        content: request.content,
        done: request.done,
        deadline: request.deadline,
    };
    let todo = state.todos.update(&user.username, position, changes).await?;

    Ok(ApiResponse::success(todo.view(position)))
}

/// DELETE /todo/:index - overwrite the todo with the deleted marker
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(index): Path<String>,
) -> ApiResult<TodoView> {
    let position = parse_position(&index)?;
    let todo = state.todos.delete(&user.username, position).await?;

    Ok(ApiResponse::success(todo.view(position)))
}
