use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::AppState;
use crate::error::AppResult;
use crate::models::RecommendationItem;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub org_id: Uuid,
    pub age: i32,
}

/// Handler for today's recommendations for one student
pub async fn daily_recommendations(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(params): Query<DailyQuery>,
) -> AppResult<Json<Vec<RecommendationItem>>> {
    let items = state
        .recommendations
        .daily_for_student(student_id, params.org_id, params.age)
        .await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSetRequest {
    pub course_ids: Vec<String>,
}

/// Handler for corrective replacement of a stored set's course list
pub async fn replace_recommendation_set(
    State(state): State<AppState>,
    Path(set_id): Path<Uuid>,
    Json(request): Json<ReplaceSetRequest>,
) -> AppResult<StatusCode> {
    state
        .recommendations
        .replace_set_courses(set_id, request.course_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
