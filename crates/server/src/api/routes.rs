use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{agent, demo, handlers, middleware::metrics_middleware, runs, tools};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Tools (one call each, same contract the agent sees)
        .route("/tools/filter_builder", post(tools::filter_builder))
        .route("/tools/people_search", post(tools::people_search))
        .route("/tools/candidate_ranker", post(tools::candidate_ranker))
        // Budgeted multi-variant runs
        .route("/runs", post(runs::create_run))
        // LLM agent
        .route("/agent/brief", post(agent::run_brief))
        // Demo Todo API passthrough
        .route("/demo/todos", get(demo::list_todos))
        .route("/demo/todos/{id}", get(demo::get_todo))
        .route("/demo/users/{id}/todos", get(demo::user_todos))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
