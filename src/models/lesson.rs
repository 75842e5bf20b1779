use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub order: i64,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLessonRequest {
    pub title: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LessonListItem {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}
