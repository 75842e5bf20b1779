use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{Course, CourseListItem, CourseStatus, Lesson, User};

const COURSE_COLUMNS: &str = "id, title, status, is_deleted, created_at, updated_at";
const LESSON_COLUMNS: &str = r#"id, course_id, title, "order", is_deleted, created_at, updated_at"#;

pub async fn insert_course(db: &SqlitePool, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO courses (id, title, status, is_deleted, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&course.id)
    .bind(&course.title)
    .bind(course.status)
    .bind(course.is_deleted)
    .bind(&course.created_at)
    .bind(&course.updated_at)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE id = ? AND is_deleted = 0"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn course_exists(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE id = ? AND is_deleted = 0")
            .bind(id)
            .fetch_one(db)
            .await?;

    Ok(count > 0)
}

pub async fn update_course_title(
    db: &SqlitePool,
    id: &str,
    title: &str,
    updated_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET title = ?, updated_at = ? WHERE id = ?")
        .bind(title)
        .bind(updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn set_course_status(
    db: &SqlitePool,
    id: &str,
    status: CourseStatus,
    updated_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn soft_delete_course(
    db: &SqlitePool,
    id: &str,
    updated_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE courses SET is_deleted = 1, updated_at = ? WHERE id = ?")
        .bind(updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn count_courses(
    db: &SqlitePool,
    status: Option<CourseStatus>,
) -> Result<i64, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE is_deleted = 0 AND status = ?")
                .bind(status)
                .fetch_one(db)
                .await
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE is_deleted = 0")
                .fetch_one(db)
                .await
        }
    }
}

pub async fn search_courses(
    db: &SqlitePool,
    status: Option<CourseStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<CourseListItem>, sqlx::Error> {
    let base = "SELECT c.id, c.title, c.status, c.created_at, c.updated_at, \
         (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id AND l.is_deleted = 0) AS total_lessons \
         FROM courses c WHERE c.is_deleted = 0";

    match status {
        Some(status) => {
            sqlx::query_as::<_, CourseListItem>(&format!(
                "{base} AND c.status = ? ORDER BY c.updated_at DESC LIMIT ? OFFSET ?"
            ))
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, CourseListItem>(&format!(
                "{base} ORDER BY c.updated_at DESC LIMIT ? OFFSET ?"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn insert_lesson(db: &SqlitePool, lesson: &Lesson) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO lessons (id, course_id, title, "order", is_deleted, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&lesson.id)
    .bind(&lesson.course_id)
    .bind(&lesson.title)
    .bind(lesson.order)
    .bind(lesson.is_deleted)
    .bind(&lesson.created_at)
    .bind(&lesson.updated_at)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn find_lesson_by_id(db: &SqlitePool, id: &str) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ? AND is_deleted = 0"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Lesson occupying a given order slot in a course. Does not filter out
/// soft-deleted rows: the reorder neighbor lookup can match (and swap with)
/// a logically deleted lesson still holding the slot.
pub async fn find_lesson_at_order(
    db: &SqlitePool,
    course_id: &str,
    order: i64,
) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        r#"SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = ? AND "order" = ?"#
    ))
    .bind(course_id)
    .bind(order)
    .fetch_optional(db)
    .await
}

pub async fn active_order_exists(
    db: &SqlitePool,
    course_id: &str,
    order: i64,
    exclude_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = match exclude_id {
        Some(id) => {
            sqlx::query_scalar(
                r#"SELECT COUNT(*) FROM lessons
                 WHERE course_id = ? AND "order" = ? AND is_deleted = 0 AND id != ?"#,
            )
            .bind(course_id)
            .bind(order)
            .bind(id)
            .fetch_one(db)
            .await?
        }
        None => {
            sqlx::query_scalar(
                r#"SELECT COUNT(*) FROM lessons
                 WHERE course_id = ? AND "order" = ? AND is_deleted = 0"#,
            )
            .bind(course_id)
            .bind(order)
            .fetch_one(db)
            .await?
        }
    };

    Ok(count > 0)
}

pub async fn update_lesson(
    db: &SqlitePool,
    id: &str,
    title: &str,
    order: i64,
    updated_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE lessons SET title = ?, "order" = ?, updated_at = ? WHERE id = ?"#)
        .bind(title)
        .bind(order)
        .bind(updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn soft_delete_lesson(
    db: &SqlitePool,
    id: &str,
    updated_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE lessons SET is_deleted = 1, updated_at = ? WHERE id = ?")
        .bind(updated_at)
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn fetch_lessons_by_course(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(&format!(
        r#"SELECT {LESSON_COLUMNS} FROM lessons
         WHERE course_id = ? AND is_deleted = 0 ORDER BY "order" ASC"#
    ))
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn count_active_lessons(db: &SqlitePool, course_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = ? AND is_deleted = 0")
        .bind(course_id)
        .fetch_one(db)
        .await
}

pub async fn latest_lesson_update(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT MAX(updated_at) FROM lessons WHERE course_id = ? AND is_deleted = 0")
        .bind(course_id)
        .fetch_one(db)
        .await
}

/// Single step of the reorder swap; runs on the transaction's connection so
/// intermediate states (the sentinel) are never visible outside it.
pub async fn set_lesson_order(
    conn: &mut SqliteConnection,
    id: &str,
    order: i64,
    updated_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE lessons SET "order" = ?, updated_at = ? WHERE id = ?"#)
        .bind(order)
        .bind(updated_at)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn insert_user(db: &SqlitePool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, name, lastname, email, password_hash, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.lastname)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.created_at)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn find_user_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, lastname, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;
    use uuid::Uuid;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn sample_course(title: &str) -> Course {
        let now = Utc::now().to_rfc3339();
        Course {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            status: CourseStatus::Draft,
            is_deleted: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    fn sample_lesson(course_id: &str, title: &str, order: i64) -> Lesson {
        let now = Utc::now().to_rfc3339();
        Lesson {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title: title.to_string(),
            order,
            is_deleted: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_course() {
        let pool = setup_test_db().await;

        let course = sample_course("Rust basics");
        insert_course(&pool, &course).await.expect("Failed to insert course");

        let found = find_course_by_id(&pool, &course.id)
            .await
            .expect("Failed to fetch course")
            .expect("Course not found");
        assert_eq!(found.title, "Rust basics");
        assert_eq!(found.status, CourseStatus::Draft);
        assert!(!found.is_deleted);
    }

    #[tokio::test]
    async fn test_find_lesson_by_id_excludes_deleted() {
        let pool = setup_test_db().await;

        let course = sample_course("Course");
        insert_course(&pool, &course).await.expect("Failed to insert course");

        let lesson = sample_lesson(&course.id, "L1", 1);
        insert_lesson(&pool, &lesson).await.expect("Failed to insert lesson");

        let now = Utc::now().to_rfc3339();
        soft_delete_lesson(&pool, &lesson.id, &now)
            .await
            .expect("Failed to soft delete lesson");

        let found = find_lesson_by_id(&pool, &lesson.id)
            .await
            .expect("Failed to fetch lesson");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_lesson_at_order_includes_deleted() {
        let pool = setup_test_db().await;

        let course = sample_course("Course");
        insert_course(&pool, &course).await.expect("Failed to insert course");

        let lesson = sample_lesson(&course.id, "L1", 1);
        insert_lesson(&pool, &lesson).await.expect("Failed to insert lesson");

        let now = Utc::now().to_rfc3339();
        soft_delete_lesson(&pool, &lesson.id, &now)
            .await
            .expect("Failed to soft delete lesson");

        // The slot lookup still sees the deleted row.
        let found = find_lesson_at_order(&pool, &course.id, 1)
            .await
            .expect("Failed to fetch lesson");
        assert_eq!(found.map(|l| l.id), Some(lesson.id));
    }

    #[tokio::test]
    async fn test_unique_index_ignores_deleted_rows() {
        let pool = setup_test_db().await;

        let course = sample_course("Course");
        insert_course(&pool, &course).await.expect("Failed to insert course");

        let first = sample_lesson(&course.id, "L1", 1);
        insert_lesson(&pool, &first).await.expect("Failed to insert lesson");

        let duplicate = sample_lesson(&course.id, "L1 again", 1);
        let err = insert_lesson(&pool, &duplicate)
            .await
            .expect_err("Duplicate active order must be rejected");
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("Expected unique violation, got {other:?}"),
        }

        let now = Utc::now().to_rfc3339();
        soft_delete_lesson(&pool, &first.id, &now)
            .await
            .expect("Failed to soft delete lesson");

        insert_lesson(&pool, &duplicate)
            .await
            .expect("Slot freed by soft delete must be reusable");
    }
}
