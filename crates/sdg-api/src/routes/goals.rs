use axum::Json;
use axum::extract::State;

use sdg_core::models::activity::Activity;
use sdg_core::models::goal::{self, Goal, GoalNumber};
use sdg_tracker::ActivityFilter;
use sdg_tracker::stats::GoalSummary;

use crate::error::ApiError;
use crate::middleware::extract::ApiPath;
use crate::state::AppState;

pub async fn list_goals() -> Json<Vec<Goal>> {
    Json(goal::catalog())
}

pub async fn get_goal(ApiPath(number): ApiPath<i64>) -> Result<Json<Goal>, ApiError> {
    Ok(Json(goal::goal(parse_goal(number)?)))
}

pub async fn goal_summary(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<i64>,
) -> Result<Json<GoalSummary>, ApiError> {
    let summary = state.tracker.goal_summary(parse_goal(number)?).await?;
    Ok(Json(summary))
}

pub async fn goal_activities(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<i64>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let filter = ActivityFilter {
        goal: Some(parse_goal(number)?),
        ..Default::default()
    };
    Ok(Json(state.tracker.list_activities(&filter).await?))
}

pub(crate) fn parse_goal(number: i64) -> Result<GoalNumber, ApiError> {
    GoalNumber::new(number).map_err(|e| ApiError::NotFound(e.to_string()))
}
