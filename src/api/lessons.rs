use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::AppError;
use crate::models::{CreateLessonRequest, LessonListItem, UpdateLessonRequest};
use crate::services::{LessonService, OrderingService};
use crate::state::AppState;

use super::CreatedResponse;

pub async fn create(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(req): Json<CreateLessonRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let id = LessonService::new(state.db.clone())
        .create(&course_id, req)
        .await?;
    Ok(Json(CreatedResponse { id }))
}

pub async fn get_by_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<LessonListItem>>, AppError> {
    let lessons = LessonService::new(state.db.clone())
        .get_by_course(&course_id)
        .await?;
    Ok(Json(lessons))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateLessonRequest>,
) -> Result<StatusCode, AppError> {
    LessonService::new(state.db.clone()).update(&id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    LessonService::new(state.db.clone()).soft_delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_up(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    OrderingService::new(state.db.clone()).move_up(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_down(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    OrderingService::new(state.db.clone()).move_down(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
