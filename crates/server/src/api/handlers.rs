use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use recruiter_core::{
    AgentError, LlmError, SanitizedConfig, SearchError, SourcingError, TodoError, ToolError,
};

use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub search_api_configured: bool,
    pub llm_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn search_unavailable() -> ApiError {
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "Search API not configured (set CRUSTDATA_API_KEY)",
    )
}

pub fn search_error_status(err: &SearchError) -> StatusCode {
    match err {
        SearchError::Validation(_) => StatusCode::BAD_REQUEST,
        SearchError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::Transport(_) | SearchError::Api { .. } | SearchError::Decode(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

fn llm_error_status(err: &LlmError) -> StatusCode {
    match err {
        LlmError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        LlmError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub fn tool_error(err: ToolError) -> ApiError {
    let status = match &err {
        ToolError::Search(e) => search_error_status(e),
        _ => StatusCode::BAD_REQUEST,
    };
    api_error(status, err.to_string())
}

pub fn sourcing_error(err: SourcingError) -> ApiError {
    let status = match &err {
        SourcingError::Validation(_) => StatusCode::BAD_REQUEST,
        SourcingError::Search(e) => search_error_status(e),
        SourcingError::Budget(_) => {
            error!(error = %err, "Run aborted by budget bookkeeping");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    api_error(status, err.to_string())
}

pub fn agent_error(err: AgentError) -> ApiError {
    let status = match &err {
        AgentError::EmptyBrief => StatusCode::BAD_REQUEST,
        AgentError::TurnLimit(_) => StatusCode::BAD_GATEWAY,
        AgentError::Llm(e) => llm_error_status(e),
    };
    api_error(status, err.to_string())
}

pub fn todo_error(err: TodoError) -> ApiError {
    let status = match &err {
        TodoError::NotFound(_) => StatusCode::NOT_FOUND,
        TodoError::Http(_) => StatusCode::BAD_GATEWAY,
    };
    api_error(status, err.to_string())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        search_api_configured: state.searcher().is_some(),
        llm_configured: state.llm().is_some(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /api/v1/metrics
pub async fn get_metrics() -> Result<impl IntoResponse, ApiError> {
    let body = encode_metrics().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
