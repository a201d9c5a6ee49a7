//! Sourcing run endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use recruiter_core::{RunReport, RunRequest, SourcingRun};

use super::handlers::{search_unavailable, sourcing_error, ApiError};
use crate::state::AppState;

/// POST /api/v1/runs
///
/// Runs the full explore, select and exploit cycle synchronously and returns
/// the report. Per-request `target_count` and `credits_cap` override the
/// configured budget.
pub async fn create_run(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RunRequest>,
) -> Result<(StatusCode, Json<RunReport>), ApiError> {
    let searcher = state.searcher().ok_or_else(search_unavailable)?;
    let run = SourcingRun::new(searcher, state.budget_limits().clone());

    let report = run.run(body).await.map_err(sourcing_error)?;

    info!(
        run_id = %report.run_id,
        stop_reason = report.stop_reason.as_str(),
        unique = report.unique_candidates,
        returned = report.ranking.candidates_returned,
        partial = report.partial,
        "Sourcing run served"
    );

    Ok((StatusCode::CREATED, Json(report)))
}
