pub mod course_service;
pub mod lesson_service;
pub mod ordering;

pub use course_service::CourseService;
pub use lesson_service::LessonService;
pub use ordering::OrderingService;

use crate::error::AppError;

/// Shared title validation: required, trimmed, capped at 200 characters
/// (the column constraint).
pub(crate) fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Title is required."));
    }
    if trimmed.chars().count() > 200 {
        return Err(AppError::validation("Title must be 200 characters or fewer."));
    }

    Ok(trimmed.to_string())
}
