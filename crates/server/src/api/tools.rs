//! Tool endpoints.
//!
//! Each endpoint runs one tool with the JSON input the model would send and
//! returns the tool output unchanged.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use tracing::info;

use recruiter_core::agent::{build_filter, rank_candidates};
use recruiter_core::{FilterNode, PeopleSearchOutput, RankingOutcome, ToolDispatcher};

use super::handlers::{search_unavailable, tool_error, ApiError};
use crate::state::AppState;

/// POST /api/v1/tools/filter_builder
pub async fn filter_builder(Json(body): Json<Value>) -> Result<Json<FilterNode>, ApiError> {
    build_filter(&body).map(Json).map_err(tool_error)
}

/// POST /api/v1/tools/people_search
///
/// Fetches exactly one page; pagination is up to the caller.
pub async fn people_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<PeopleSearchOutput>, ApiError> {
    let searcher = state.searcher().ok_or_else(search_unavailable)?;
    let output = ToolDispatcher::new(searcher)
        .people_search(body)
        .await
        .map_err(tool_error)?;

    info!(
        profiles = output.profiles.len(),
        has_cursor = output.next_cursor.is_some(),
        credits = output.api_credits_used,
        "People search served"
    );

    Ok(Json(output))
}

/// POST /api/v1/tools/candidate_ranker
pub async fn candidate_ranker(Json(body): Json<Value>) -> Result<Json<RankingOutcome>, ApiError> {
    rank_candidates(body).map(Json).map_err(tool_error)
}
