use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use sdg_tracker::stats::Trends;

use crate::error::ApiError;
use crate::middleware::extract::ApiQuery;
use crate::routes::goals::parse_goal;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub goal: Option<i64>,
}

/// Yearly score trends; an unknown `goal` is a 404.
pub async fn trends(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrendsQuery>,
) -> Result<Json<Trends>, ApiError> {
    let goal = query.goal.map(parse_goal).transpose()?;
    Ok(Json(state.tracker.trends(goal).await?))
}
