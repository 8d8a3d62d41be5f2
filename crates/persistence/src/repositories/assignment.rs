//! Shift assignment repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use domain::models::assignment::JoinOutcome;
use domain::models::shift::ShiftStatus;

use crate::entities::{AssignmentEntity, UpcomingAssignmentRow};
use crate::metrics::QueryTimer;
use crate::repositories::is_unique_violation;

/// Error type for the join operation.
#[derive(Debug, Error)]
pub enum JoinError {
    /// The shift no longer accepts volunteers (cancelled or completed).
    #[error("This shift does not accept join requests")]
    InvalidState,

    /// All approved slots on the shift are taken.
    #[error("All spots on this shift are taken")]
    CapacityExceeded,

    /// The shift row disappeared between the handler's lookup and the join.
    #[error("Shift not found")]
    ShiftNotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for shift assignment database operations.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Join a shift, enforcing its capacity.
    ///
    /// The capacity check and the insert run as one atomic unit: the shift
    /// row is locked with `FOR UPDATE`, so concurrent joins against the same
    /// shift serialize and two attempts for the last slot cannot both
    /// succeed. An existing assignment for (shift, volunteer) is returned
    /// as-is; the unique constraint backstops that path against races.
    pub async fn join(
        &self,
        shift_id: i64,
        volunteer_id: i64,
    ) -> Result<(AssignmentEntity, JoinOutcome), JoinError> {
        let timer = QueryTimer::new("join_shift");

        let mut tx = self.pool.begin().await?;

        let shift: Option<(i32, ShiftStatus)> = sqlx::query_as(
            "SELECT capacity, status FROM campaign_shifts WHERE id = $1 FOR UPDATE",
        )
        .bind(shift_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((capacity, status)) = shift else {
            timer.record();
            return Err(JoinError::ShiftNotFound);
        };
        if !status.accepts_volunteers() {
            timer.record();
            return Err(JoinError::InvalidState);
        }

        let existing = sqlx::query_as::<_, AssignmentEntity>(
            "SELECT * FROM shift_assignments WHERE shift_id = $1 AND volunteer_id = $2",
        )
        .bind(shift_id)
        .bind(volunteer_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(assignment) = existing {
            tx.commit().await?;
            timer.record();
            return Ok((assignment, JoinOutcome::AlreadyJoined));
        }

        let (approved_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM shift_assignments WHERE shift_id = $1 AND status = 'approved'",
        )
        .bind(shift_id)
        .fetch_one(&mut *tx)
        .await?;

        if approved_count >= capacity as i64 {
            timer.record();
            return Err(JoinError::CapacityExceeded);
        }

        let inserted = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            INSERT INTO shift_assignments (shift_id, volunteer_id, status)
            VALUES ($1, $2, 'approved')
            RETURNING *
            "#,
        )
        .bind(shift_id)
        .bind(volunteer_id)
        .fetch_one(&mut *tx)
        .await;

        let result = match inserted {
            Ok(assignment) => {
                tx.commit().await?;
                Ok((assignment, JoinOutcome::Joined))
            }
            Err(ref e) if is_unique_violation(e) => {
                // Lost a race despite the lock (e.g. a direct insert outside
                // this path); surface the existing row idempotently.
                drop(tx);
                let assignment = self
                    .find_by_shift_and_volunteer(shift_id, volunteer_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok((assignment, JoinOutcome::AlreadyJoined))
            }
            Err(e) => Err(e.into()),
        };

        timer.record();
        result
    }

    /// Find the assignment for (shift, volunteer).
    pub async fn find_by_shift_and_volunteer(
        &self,
        shift_id: i64,
        volunteer_id: i64,
    ) -> Result<Option<AssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_assignment");
        let result = sqlx::query_as::<_, AssignmentEntity>(
            "SELECT * FROM shift_assignments WHERE shift_id = $1 AND volunteer_id = $2",
        )
        .bind(shift_id)
        .bind(volunteer_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete the volunteer's assignment on a shift (the "leave" operation).
    /// Returns the number of rows deleted (0 or 1).
    pub async fn leave(&self, shift_id: i64, volunteer_id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("leave_shift");
        let result = sqlx::query(
            "DELETE FROM shift_assignments WHERE shift_id = $1 AND volunteer_id = $2",
        )
        .bind(shift_id)
        .bind(volunteer_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// List the volunteer's approved assignments whose shift has not ended
    /// and still accepts volunteers, ordered by shift start ascending.
    pub async fn list_upcoming(
        &self,
        volunteer_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<UpcomingAssignmentRow>, sqlx::Error> {
        let timer = QueryTimer::new("list_upcoming_assignments");
        let result = sqlx::query_as::<_, UpcomingAssignmentRow>(
            r#"
            SELECT a.id AS assignment_id,
                   s.id AS shift_id,
                   s.title AS shift_title,
                   s.status AS shift_status,
                   s.start_at,
                   s.end_at,
                   c.id AS campaign_id,
                   c.title AS campaign_title,
                   c.slug AS campaign_slug,
                   s.location_details
            FROM shift_assignments a
            JOIN campaign_shifts s ON s.id = a.shift_id
            JOIN campaigns c ON c.id = s.campaign_id
            WHERE a.volunteer_id = $1
              AND a.status = 'approved'
              AND s.end_at >= $2
              AND s.status IN ('open', 'full')
            ORDER BY s.start_at
            "#,
        )
        .bind(volunteer_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
