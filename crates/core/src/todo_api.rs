//! Client for the demo Todo API (JSONPlaceholder-compatible).
//!
//! Unauthenticated read-only endpoints used to show a plain REST data
//! integration next to the search pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::DemoConfig;
use crate::http::{ApiClient, HttpError};
use crate::metrics;

/// Todos returned when no limit is given.
pub const DEFAULT_TODO_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo {0} not found")]
    NotFound(u64),

    #[error("Todo API request failed: {0}")]
    Http(#[from] HttpError),
}

/// Read-only Todo API client.
#[derive(Debug, Clone)]
pub struct TodoClient {
    api: ApiClient,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TodoError> {
        Ok(Self {
            api: ApiClient::new(base_url, timeout)?,
        })
    }

    pub fn from_config(config: &DemoConfig) -> Result<Self, TodoError> {
        Self::new(
            &config.todo_base_url,
            Duration::from_secs(config.timeout_secs as u64),
        )
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, HttpError> {
        debug!(operation, path, "Todo API request");
        let result = self.api.get_json(path, query).await;
        let status = if result.is_ok() { "success" } else { "error" };
        metrics::EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["todo_api", operation, status])
            .inc();
        result
    }

    /// `GET /todos/{id}`
    pub async fn get_todo(&self, id: u64) -> Result<Todo, TodoError> {
        self.get("get_todo", &format!("/todos/{}", id), &[])
            .await
            .map_err(|e| match e {
                HttpError::Status { status: 404, .. } => TodoError::NotFound(id),
                other => TodoError::Http(other),
            })
    }

    /// `GET /todos?_limit=N`
    pub async fn list_todos(&self, limit: usize) -> Result<Vec<Todo>, TodoError> {
        let todos: Vec<Todo> = self
            .get("list_todos", "/todos", &[("_limit", limit.to_string())])
            .await?;
        Ok(todos.into_iter().take(limit).collect())
    }

    /// `GET /users/{id}/todos?_limit=N`
    pub async fn user_todos(&self, user_id: u64, limit: usize) -> Result<Vec<Todo>, TodoError> {
        let todos: Vec<Todo> = self
            .get(
                "user_todos",
                &format!("/users/{}/todos", user_id),
                &[("_limit", limit.to_string())],
            )
            .await?;
        Ok(todos.into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn todos(user_id: u64, count: u64) -> Vec<Value> {
        (1..=count)
            .map(|id| json!({"userId": user_id, "id": id, "title": format!("task {}", id), "completed": id % 2 == 0}))
            .collect()
    }

    async fn spawn_fake() -> String {
        let router = Router::new()
            .route(
                "/todos/{id}",
                get(|Path(id): Path<u64>| async move {
                    if id > 200 {
                        Err(StatusCode::NOT_FOUND)
                    } else {
                        Ok(Json(json!({"userId": 1, "id": id, "title": "delectus aut autem", "completed": false})))
                    }
                }),
            )
            .route(
                "/todos",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let limit = q.get("_limit").and_then(|l| l.parse().ok()).unwrap_or(200);
                    Json(todos(1, limit))
                }),
            )
            .route(
                // ignores _limit
                "/users/{id}/todos",
                get(|Path(id): Path<u64>| async move { Json(todos(id, 20)) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_get_todo() {
        let client = TodoClient::new(spawn_fake().await, Duration::from_secs(5)).unwrap();
        let todo = client.get_todo(1).await.unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.user_id, 1);
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn test_missing_todo() {
        let client = TodoClient::new(spawn_fake().await, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            client.get_todo(999).await,
            Err(TodoError::NotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_limits_are_applied() {
        let client = TodoClient::new(spawn_fake().await, Duration::from_secs(5)).unwrap();
        assert_eq!(client.list_todos(5).await.unwrap().len(), 5);

        let user = client.user_todos(3, 3).await.unwrap();
        assert_eq!(user.len(), 3);
        assert!(user.iter().all(|t| t.user_id == 3));
    }

    #[test]
    fn test_wire_field_names() {
        let todo = Todo {
            user_id: 2,
            id: 7,
            title: "t".into(),
            completed: true,
        };
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["userId"], 2);
        assert!(value.get("user_id").is_none());
    }
}
