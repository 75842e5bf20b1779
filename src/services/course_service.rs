use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    Course, CourseListItem, CourseStatus, CourseSummary, CreateCourseRequest, PagedResult,
    UpdateCourseRequest,
};

use super::validate_title;

/// Course lifecycle manager: create/update/soft-delete, the guarded
/// publish/unpublish transition, and the lesson-aggregating read paths.
pub struct CourseService {
    db: SqlitePool,
}

impl CourseService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateCourseRequest) -> Result<String, AppError> {
        let title = validate_title(&req.title)?;

        let now = Utc::now().to_rfc3339();
        let course = Course {
            id: Uuid::new_v4().to_string(),
            title,
            status: CourseStatus::Draft,
            is_deleted: false,
            created_at: now.clone(),
            updated_at: now,
        };

        repository::insert_course(&self.db, &course).await?;

        Ok(course.id)
    }

    pub async fn update(&self, course_id: &str, req: UpdateCourseRequest) -> Result<(), AppError> {
        let title = validate_title(&req.title)?;

        let course = repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))?;

        let now = Utc::now().to_rfc3339();
        repository::update_course_title(&self.db, &course.id, &title, &now).await?;

        Ok(())
    }

    pub async fn soft_delete(&self, course_id: &str) -> Result<(), AppError> {
        let course = repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))?;

        let now = Utc::now().to_rfc3339();
        repository::soft_delete_course(&self.db, &course.id, &now).await?;

        Ok(())
    }

    /// Publish is guarded: the course must hold at least one active lesson.
    /// The guard is not retroactive; deleting every lesson afterwards leaves
    /// the course published.
    pub async fn publish(&self, course_id: &str) -> Result<(), AppError> {
        let course = repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))?;

        let active_lessons = repository::count_active_lessons(&self.db, &course.id).await?;
        if active_lessons == 0 {
            return Err(AppError::conflict(
                "Cannot publish a course without at least one active lesson.",
            ));
        }

        let now = Utc::now().to_rfc3339();
        repository::set_course_status(&self.db, &course.id, CourseStatus::Published, &now).await?;

        Ok(())
    }

    pub async fn unpublish(&self, course_id: &str) -> Result<(), AppError> {
        let course = repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))?;

        let now = Utc::now().to_rfc3339();
        repository::set_course_status(&self.db, &course.id, CourseStatus::Draft, &now).await?;

        Ok(())
    }

    pub async fn search(
        &self,
        status: Option<CourseStatus>,
        page: i64,
        page_size: i64,
    ) -> Result<PagedResult<CourseListItem>, AppError> {
        let page = if page < 1 { 1 } else { page };
        let page_size = if !(1..=100).contains(&page_size) { 10 } else { page_size };

        let total_count = repository::count_courses(&self.db, status).await?;
        let items =
            repository::search_courses(&self.db, status, page_size, (page - 1) * page_size)
                .await?;

        Ok(PagedResult {
            items,
            page,
            page_size,
            total_count,
        })
    }

    pub async fn summary(&self, course_id: &str) -> Result<CourseSummary, AppError> {
        let course = repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))?;

        let total_lessons = repository::count_active_lessons(&self.db, &course.id).await?;
        let latest_lesson = repository::latest_lesson_update(&self.db, &course.id).await?;

        let mut last_modification = course.updated_at.clone();
        if let Some(lesson_ts) = latest_lesson {
            if let (Some(course_at), Some(lesson_at)) =
                (parse_timestamp(&last_modification), parse_timestamp(&lesson_ts))
            {
                if lesson_at > course_at {
                    last_modification = lesson_ts;
                }
            }
        }

        Ok(CourseSummary {
            id: course.id,
            title: course.title,
            status: course.status,
            total_lessons,
            last_modification,
        })
    }
}

/// Parse RFC3339 timestamp to comparable form
fn parse_timestamp(ts: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc))
}
