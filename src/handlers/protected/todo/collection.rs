use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{todo::default_deadline, TodoView};
use crate::filter::{TodoFilter, TodoQuery};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::utils::{ensure_future, todo_body};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub content: String,
    #[serde(default)]
    pub done: bool,
    pub deadline: Option<DateTime<Utc>>,
}

/// POST /todo - create a todo for the authenticated user
///
/// A missing deadline defaults to one week from now; a deadline in the past is rejected.
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<TodoView> {
    let request = todo_body(body)?;

    let now = Utc::now();
    let deadline = match request.deadline {
        Some(deadline) => ensure_future(deadline, now)?,
        None => default_deadline(now),
    };

    let (position, todo) = state
        .todos
        .create(&user.username, request.content, request.done, deadline)
        .await?;

    Ok(ApiResponse::created(todo.view(position)))
}

/// GET /todo?finished=&deadline=&reverse= - list the authenticated user's todos
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TodoQuery>,
) -> ApiResult<Vec<TodoView>> {
    let filter = TodoFilter::from_query(&query)?;
    let todos = state.todos.list_owned(&user.username).await?;

    Ok(ApiResponse::success(filter.apply(todos)))
}
