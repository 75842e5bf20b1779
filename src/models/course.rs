use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Course lifecycle state. Stored as lowercase TEXT; courses are created
/// as drafts and only publish once they hold at least one active lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub status: CourseStatus,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: String,
}

/// Search result row: course fields plus a live count of active lessons.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseListItem {
    pub id: String,
    pub title: String,
    pub status: CourseStatus,
    pub created_at: String,
    pub updated_at: String,
    pub total_lessons: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub status: CourseStatus,
    pub total_lessons: i64,
    pub last_modification: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
}
