//! Volunteer application repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use domain::models::application::{ApplicationStatus, ApplyOutcome};

use crate::entities::ApplicationEntity;
use crate::metrics::QueryTimer;
use crate::repositories::is_unique_violation;

/// Error type for the apply operation.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// An application already exists and is not withdrawn.
    #[error("An application for this campaign already exists")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for volunteer application database operations.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Creates a new ApplicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit or reactivate an application for (campaign, volunteer).
    ///
    /// No existing row creates one in pending. A withdrawn row is
    /// reactivated to pending, overwriting motivation/experience with the
    /// supplied values and falling back to the prior ones when omitted. Any
    /// other existing row is a duplicate. The (campaign_id, volunteer_id)
    /// unique constraint closes the check-then-insert race: a concurrent
    /// insert surfaces as a unique violation and is reported as a duplicate.
    pub async fn apply(
        &self,
        campaign_id: i64,
        volunteer_id: i64,
        motivation: Option<&str>,
        experience: Option<&str>,
    ) -> Result<(ApplicationEntity, ApplyOutcome), ApplyError> {
        let timer = QueryTimer::new("apply_to_campaign");

        let existing = sqlx::query_as::<_, ApplicationEntity>(
            "SELECT * FROM volunteer_applications WHERE campaign_id = $1 AND volunteer_id = $2",
        )
        .bind(campaign_id)
        .bind(volunteer_id)
        .fetch_optional(&self.pool)
        .await?;

        let result = match existing {
            None => {
                let inserted = sqlx::query_as::<_, ApplicationEntity>(
                    r#"
                    INSERT INTO volunteer_applications (campaign_id, volunteer_id, motivation, experience)
                    VALUES ($1, $2, $3, $4)
                    RETURNING *
                    "#,
                )
                .bind(campaign_id)
                .bind(volunteer_id)
                .bind(motivation)
                .bind(experience)
                .fetch_one(&self.pool)
                .await;

                match inserted {
                    Ok(entity) => Ok((entity, ApplyOutcome::Created)),
                    Err(ref e) if is_unique_violation(e) => Err(ApplyError::Duplicate),
                    Err(e) => Err(e.into()),
                }
            }
            Some(app) if app.status == ApplicationStatus::Withdrawn => {
                // Reactivate the same row; the status guard makes the update
                // a no-op if someone else already changed it.
                let reactivated = sqlx::query_as::<_, ApplicationEntity>(
                    r#"
                    UPDATE volunteer_applications SET
                        status = 'pending',
                        motivation = COALESCE($2, motivation),
                        experience = COALESCE($3, experience),
                        updated_at = NOW()
                    WHERE id = $1 AND status = 'withdrawn'
                    RETURNING *
                    "#,
                )
                .bind(app.id)
                .bind(motivation)
                .bind(experience)
                .fetch_optional(&self.pool)
                .await?;

                match reactivated {
                    Some(entity) => Ok((entity, ApplyOutcome::Reactivated)),
                    None => Err(ApplyError::Duplicate),
                }
            }
            Some(_) => Err(ApplyError::Duplicate),
        };

        timer.record();
        result
    }

    /// Find an application by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_by_id");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            "SELECT * FROM volunteer_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find the application for (campaign, volunteer) with the given status.
    pub async fn find_with_status(
        &self,
        campaign_id: i64,
        volunteer_id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_with_status");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            SELECT * FROM volunteer_applications
            WHERE campaign_id = $1 AND volunteer_id = $2 AND status = $3
            "#,
        )
        .bind(campaign_id)
        .bind(volunteer_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Overwrite an application's status.
    ///
    /// Actor constraints are enforced by the access policy in the API layer;
    /// the write itself is unconditional.
    pub async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_application_status");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            UPDATE volunteer_applications
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a campaign's applications, newest first, cursor-paginated.
    pub async fn list_by_campaign(
        &self,
        campaign_id: i64,
        cursor: Option<(DateTime<Utc>, i64)>,
        limit: i64,
    ) -> Result<Vec<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_applications_by_campaign");
        let result = match cursor {
            Some((created_at, id)) => {
                sqlx::query_as::<_, ApplicationEntity>(
                    r#"
                    SELECT * FROM volunteer_applications
                    WHERE campaign_id = $1 AND (created_at, id) < ($2, $3)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $4
                    "#,
                )
                .bind(campaign_id)
                .bind(created_at)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ApplicationEntity>(
                    r#"
                    SELECT * FROM volunteer_applications
                    WHERE campaign_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                    "#,
                )
                .bind(campaign_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }
}
