//! Agent endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use recruiter_core::{AgentOutcome, AgentSession, ToolDispatcher};

use super::handlers::{agent_error, api_error, search_unavailable, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BriefRequest {
    pub brief: String,
}

/// POST /api/v1/agent/brief
///
/// Hands a recruitment brief to the model and returns its final answer once
/// it stops calling tools.
pub async fn run_brief(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BriefRequest>,
) -> Result<Json<AgentOutcome>, ApiError> {
    let llm = state.llm().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "LLM not configured (set ANTHROPIC_API_KEY)",
        )
    })?;
    let searcher = state.searcher().ok_or_else(search_unavailable)?;

    let mut session = AgentSession::new(llm, ToolDispatcher::new(searcher));
    if let Some(config) = &state.config().llm {
        session = session
            .with_max_turns(config.max_turns)
            .with_max_tokens(config.max_tokens);
    }

    let outcome = session.run(&body.brief).await.map_err(agent_error)?;

    info!(
        turns = outcome.turns,
        tool_calls = outcome.tool_calls.len(),
        input_tokens = outcome.usage.input_tokens,
        output_tokens = outcome.usage.output_tokens,
        "Agent brief answered"
    );

    Ok(Json(outcome))
}
