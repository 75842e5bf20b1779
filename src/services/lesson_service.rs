use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{CreateLessonRequest, Lesson, LessonListItem, UpdateLessonRequest};

use super::validate_title;

const DUPLICATE_ORDER: &str = "Order must be unique within the course.";

/// Lesson lifecycle manager. Order uniqueness is pre-checked among active
/// lessons and backstopped by the storage unique index: losing a race to a
/// concurrent writer surfaces as the same Conflict the pre-check produces.
pub struct LessonService {
    db: SqlitePool,
}

impl LessonService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        course_id: &str,
        req: CreateLessonRequest,
    ) -> Result<String, AppError> {
        let title = validate_title(&req.title)?;
        if req.order < 1 {
            return Err(AppError::validation("Order must be greater than 0."));
        }

        if !repository::course_exists(&self.db, course_id).await? {
            return Err(AppError::not_found("Course not found."));
        }

        if repository::active_order_exists(&self.db, course_id, req.order, None).await? {
            return Err(AppError::conflict(DUPLICATE_ORDER));
        }

        let now = Utc::now().to_rfc3339();
        let lesson = Lesson {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title,
            order: req.order,
            is_deleted: false,
            created_at: now.clone(),
            updated_at: now,
        };

        repository::insert_lesson(&self.db, &lesson)
            .await
            .map_err(|e| unique_violation_to_conflict(e, DUPLICATE_ORDER))?;

        Ok(lesson.id)
    }

    pub async fn update(
        &self,
        lesson_id: &str,
        req: UpdateLessonRequest,
    ) -> Result<(), AppError> {
        let title = validate_title(&req.title)?;
        if req.order < 1 {
            return Err(AppError::validation("Order must be greater than 0."));
        }

        let lesson = repository::find_lesson_by_id(&self.db, lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson not found."))?;

        if lesson.order != req.order
            && repository::active_order_exists(
                &self.db,
                &lesson.course_id,
                req.order,
                Some(&lesson.id),
            )
            .await?
        {
            return Err(AppError::conflict(DUPLICATE_ORDER));
        }

        let now = Utc::now().to_rfc3339();
        repository::update_lesson(&self.db, &lesson.id, &title, req.order, &now)
            .await
            .map_err(|e| unique_violation_to_conflict(e, DUPLICATE_ORDER))?;

        Ok(())
    }

    /// Soft delete leaves a gap in the course's order sequence; surviving
    /// lessons are never renumbered.
    pub async fn soft_delete(&self, lesson_id: &str) -> Result<(), AppError> {
        let lesson = repository::find_lesson_by_id(&self.db, lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson not found."))?;

        let now = Utc::now().to_rfc3339();
        repository::soft_delete_lesson(&self.db, &lesson.id, &now).await?;

        Ok(())
    }

    pub async fn get_by_course(&self, course_id: &str) -> Result<Vec<LessonListItem>, AppError> {
        if !repository::course_exists(&self.db, course_id).await? {
            return Err(AppError::not_found("Course not found."));
        }

        let lessons = repository::fetch_lessons_by_course(&self.db, course_id).await?;

        Ok(lessons
            .into_iter()
            .map(|l| LessonListItem {
                id: l.id,
                course_id: l.course_id,
                title: l.title,
                order: l.order,
                created_at: l.created_at,
                updated_at: l.updated_at,
            })
            .collect())
    }
}

pub(crate) fn unique_violation_to_conflict(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
