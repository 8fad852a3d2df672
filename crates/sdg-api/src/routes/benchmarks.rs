use axum::Json;
use axum::extract::State;

use sdg_core::models::benchmark::{BenchmarkInstitution, NewBenchmark};
use sdg_tracker::stats::BenchmarkRow;

use crate::error::ApiError;
use crate::middleware::actor::Actor;
use crate::middleware::extract::ApiJson;
use crate::state::AppState;

/// Home institution first, then peers by name.
pub async fn benchmark_comparison(
    State(state): State<AppState>,
) -> Result<Json<Vec<BenchmarkRow>>, ApiError> {
    Ok(Json(state.tracker.benchmark_comparison().await?))
}

pub async fn record_benchmark(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(input): ApiJson<NewBenchmark>,
) -> Result<Json<BenchmarkInstitution>, ApiError> {
    Ok(Json(state.tracker.record_benchmark(input).await?))
}
