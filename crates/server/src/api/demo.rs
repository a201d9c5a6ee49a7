//! Demo Todo API passthrough.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use recruiter_core::todo_api::DEFAULT_TODO_LIMIT;
use recruiter_core::Todo;

use super::handlers::{todo_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LimitQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_TODO_LIMIT)
    }
}

/// GET /api/v1/demo/todos/{id}
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, ApiError> {
    state.todo().get_todo(id).await.map(Json).map_err(todo_error)
}

/// GET /api/v1/demo/todos?limit=N
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    state
        .todo()
        .list_todos(query.limit())
        .await
        .map(Json)
        .map_err(todo_error)
}

/// GET /api/v1/demo/users/{id}/todos?limit=N
pub async fn user_todos(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    state
        .todo()
        .user_todos(user_id, query.limit())
        .await
        .map(Json)
        .map_err(todo_error)
}
