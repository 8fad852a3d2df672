//! sdg-api
//!
//! JSON HTTP surface over the impact tracker.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Largest accepted request body (evidence uploads).
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Goal catalog (public reference data)
        .route("/goals", get(routes::goals::list_goals))
        .route("/goals/{number}", get(routes::goals::get_goal))
        .route("/goals/{number}/summary", get(routes::goals::goal_summary))
        .route(
            "/goals/{number}/activities",
            get(routes::goals::goal_activities),
        )
        // Activities
        .route(
            "/activities",
            get(routes::activities::list_activities).post(routes::activities::create_activity),
        )
        .route(
            "/activities/{id}",
            get(routes::activities::get_activity)
                .put(routes::activities::update_activity)
                .delete(routes::activities::delete_activity),
        )
        .route(
            "/activities/{id}/reclassify",
            post(routes::activities::reclassify_activity),
        )
        .route(
            "/activities/{id}/evidence",
            put(routes::activities::upload_evidence),
        )
        // Aggregates
        .route("/dashboard/stats", get(routes::dashboard::dashboard_stats))
        .route("/analytics/trends", get(routes::analytics::trends))
        .route(
            "/metrics",
            get(routes::metrics::list_metrics).post(routes::metrics::record_metric),
        )
        .route(
            "/benchmarks",
            get(routes::benchmarks::benchmark_comparison)
                .post(routes::benchmarks::record_benchmark),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_mw::from_fn(middleware::request_log::log_request))
        .layer(cors)
        .with_state(state)
}
