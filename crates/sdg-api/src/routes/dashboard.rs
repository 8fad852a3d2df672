use axum::Json;
use axum::extract::State;

use sdg_tracker::stats::DashboardStats;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.tracker.dashboard_stats().await?))
}
