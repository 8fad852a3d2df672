use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use serde::Deserialize;
use uuid::Uuid;

use sdg_core::models::activity::{Activity, ActivityUpdate, NewActivity};
use sdg_core::models::goal::GoalNumber;
use sdg_tracker::{ActivityDetail, ActivityFilter};

use crate::error::ApiError;
use crate::middleware::actor::Actor;
use crate::middleware::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub goal: Option<i64>,
    pub category: Option<String>,
    pub author_id: Option<Uuid>,
}

impl ActivityQuery {
    fn into_filter(self) -> Result<ActivityFilter, ApiError> {
        Ok(ActivityFilter {
            goal: self.goal.map(GoalNumber::new).transpose()?,
            category: self.category.map(|c| c.parse()).transpose()?,
            author_id: self.author_id,
        })
    }
}

pub async fn list_activities(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let filter = query.into_filter()?;
    Ok(Json(state.tracker.list_activities(&filter).await?))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Actor(author): Actor,
    ApiJson(input): ApiJson<NewActivity>,
) -> Result<(StatusCode, Json<ActivityDetail>), ApiError> {
    let detail = state.tracker.create_activity(author, input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ActivityDetail>, ApiError> {
    Ok(Json(state.tracker.get_activity(id).await?))
}

pub async fn update_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Actor(actor): Actor,
    ApiJson(update): ApiJson<ActivityUpdate>,
) -> Result<Json<Activity>, ApiError> {
    Ok(Json(state.tracker.update_activity(id, actor, update).await?))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Actor(actor): Actor,
) -> Result<StatusCode, ApiError> {
    state.tracker.delete_activity(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reclassify_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Actor(actor): Actor,
) -> Result<Json<ActivityDetail>, ApiError> {
    Ok(Json(state.tracker.reclassify(id, Some(actor)).await?))
}

#[derive(Debug, Deserialize)]
pub struct EvidenceQuery {
    pub filename: String,
}

/// Upload an evidence document as the raw request body.
pub async fn upload_evidence(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    Actor(actor): Actor,
    ApiQuery(query): ApiQuery<EvidenceQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Activity>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("evidence body is empty".to_string()));
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let activity = state
        .tracker
        .attach_evidence(id, actor, &query.filename, content_type, body.to_vec())
        .await?;
    Ok(Json(activity))
}
