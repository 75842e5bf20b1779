use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{
    CourseListItem, CourseStatus, CourseSummary, CreateCourseRequest, PagedResult,
    UpdateCourseRequest,
};
use crate::services::CourseService;
use crate::state::AppState;

use super::CreatedResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub status: Option<CourseStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = CourseService::new(state.db.clone()).create(req).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PagedResult<CourseListItem>>, AppError> {
    let result = CourseService::new(state.db.clone())
        .search(params.status, params.page, params.page_size)
        .await?;
    Ok(Json(result))
}

pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseSummary>, AppError> {
    let summary = CourseService::new(state.db.clone()).summary(&id).await?;
    Ok(Json(summary))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.db.clone()).update(&id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.db.clone()).soft_delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.db.clone()).publish(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    CourseService::new(state.db.clone()).unpublish(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
