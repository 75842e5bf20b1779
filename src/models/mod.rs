pub mod course;
pub mod lesson;
pub mod user;

pub use course::{
    Course, CourseListItem, CourseStatus, CourseSummary, CreateCourseRequest, PagedResult,
    UpdateCourseRequest,
};
pub use lesson::{CreateLessonRequest, Lesson, LessonListItem, UpdateLessonRequest};
pub use user::{LoginRequest, RegisterRequest, TokenResponse, User};
