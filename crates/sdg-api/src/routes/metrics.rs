use axum::Json;
use axum::extract::State;

use sdg_core::models::metric::{InstitutionMetric, NewMetric};

use crate::error::ApiError;
use crate::middleware::actor::Actor;
use crate::middleware::extract::ApiJson;
use crate::state::AppState;

pub async fn list_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstitutionMetric>>, ApiError> {
    Ok(Json(state.tracker.list_metrics().await?))
}

pub async fn record_metric(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(input): ApiJson<NewMetric>,
) -> Result<Json<InstitutionMetric>, ApiError> {
    Ok(Json(state.tracker.record_metric(input).await?))
}
