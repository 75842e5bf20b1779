use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;

use crate::db::repository;
use crate::error::AppError;
use crate::models::Lesson;

/// Parked order value for the lesson being moved while its neighbor takes
/// over the old slot. Strictly below the minimum legal order of 1, so it can
/// never collide with a real row under the unique index.
const SWAP_SENTINEL_ORDER: i64 = -999_999;

/// Reordering engine: moves a lesson one slot up or down within its course
/// by swapping order values with the neighbor, without ever violating the
/// per-course uniqueness constraint at a durable commit point.
pub struct OrderingService {
    db: SqlitePool,
}

impl OrderingService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Move a lesson one position earlier. Already first (or facing a gap)
    /// is a successful no-op.
    pub async fn move_up(&self, lesson_id: &str) -> Result<(), AppError> {
        self.shift(lesson_id, -1).await
    }

    /// Move a lesson one position later. No neighbor below is a successful
    /// no-op.
    pub async fn move_down(&self, lesson_id: &str) -> Result<(), AppError> {
        self.shift(lesson_id, 1).await
    }

    async fn shift(&self, lesson_id: &str, delta: i64) -> Result<(), AppError> {
        let lesson = repository::find_lesson_by_id(&self.db, lesson_id)
            .await?
            .ok_or_else(|| AppError::not_found("Lesson not found."))?;

        let target = lesson.order + delta;
        if target < 1 {
            return Ok(());
        }

        // The slot lookup does not exclude soft-deleted rows, so a deleted
        // lesson still holding the adjacent order is a valid swap partner.
        let other =
            match repository::find_lesson_at_order(&self.db, &lesson.course_id, target).await? {
                Some(other) => other,
                None => return Ok(()),
            };

        self.swap(&lesson, &other).await
    }

    /// Three-step swap inside one transaction: park the moved lesson on the
    /// sentinel, give the neighbor the vacated slot, then claim the
    /// neighbor's old slot. Each intermediate state satisfies the unique
    /// index; rollback on any failure restores both rows.
    async fn swap(&self, a: &Lesson, b: &Lesson) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        let now = Utc::now().to_rfc3339();

        repository::set_lesson_order(&mut tx, &a.id, SWAP_SENTINEL_ORDER, &now)
            .await
            .map_err(swap_collision)?;
        repository::set_lesson_order(&mut tx, &b.id, a.order, &now)
            .await
            .map_err(swap_collision)?;
        repository::set_lesson_order(&mut tx, &a.id, b.order, &now)
            .await
            .map_err(swap_collision)?;

        tx.commit().await?;

        Ok(())
    }
}

/// A unique violation mid-swap means a concurrent writer took one of the
/// slots between the snapshot reads and the transaction: a lost race, never
/// silently ignored.
fn swap_collision(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            error!("order swap lost a race to a concurrent writer: {}", db);
            AppError::Internal
        }
        _ => AppError::Database(err),
    }
}
