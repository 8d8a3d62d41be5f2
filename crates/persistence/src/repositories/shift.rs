//! Campaign shift and stage repositories.

use sqlx::PgPool;

use domain::models::shift::{CreateShiftRequest, ShiftStatus};
use domain::models::stage::CreateStageRequest;

use crate::entities::{ShiftEntity, ShiftWithOccupancyRow, StageEntity};
use crate::metrics::QueryTimer;

/// Repository for campaign shift and stage database operations.
#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a shift under a campaign.
    pub async fn create(
        &self,
        campaign_id: i64,
        request: &CreateShiftRequest,
    ) -> Result<ShiftEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_shift");
        let result = sqlx::query_as::<_, ShiftEntity>(
            r#"
            INSERT INTO campaign_shifts (
                campaign_id, title, description, start_at, end_at,
                capacity, location_details, instructions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.start_at)
        .bind(request.end_at)
        .bind(request.capacity)
        .bind(&request.location_details)
        .bind(&request.instructions)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a shift by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_shift_by_id");
        let result =
            sqlx::query_as::<_, ShiftEntity>("SELECT * FROM campaign_shifts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Set a shift's status.
    pub async fn update_status(
        &self,
        id: i64,
        status: ShiftStatus,
    ) -> Result<Option<ShiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_shift_status");
        let result = sqlx::query_as::<_, ShiftEntity>(
            "UPDATE campaign_shifts SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a campaign's shifts with their approved-assignment counts,
    /// ordered by start time.
    pub async fn list_by_campaign(
        &self,
        campaign_id: i64,
    ) -> Result<Vec<ShiftWithOccupancyRow>, sqlx::Error> {
        let timer = QueryTimer::new("list_shifts_by_campaign");
        let result = sqlx::query_as::<_, ShiftWithOccupancyRow>(
            r#"
            SELECT s.*,
                   COUNT(a.id) FILTER (WHERE a.status = 'approved') AS occupied_spots
            FROM campaign_shifts s
            LEFT JOIN shift_assignments a ON a.shift_id = s.id
            WHERE s.campaign_id = $1
            GROUP BY s.id
            ORDER BY s.start_at
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count approved assignments on a shift (derived `occupied_spots`).
    pub async fn count_approved(&self, shift_id: i64) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_approved_assignments");
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM shift_assignments WHERE shift_id = $1 AND status = 'approved'",
        )
        .bind(shift_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Create a stage under a campaign.
    pub async fn create_stage(
        &self,
        campaign_id: i64,
        request: &CreateStageRequest,
    ) -> Result<StageEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_stage");
        let result = sqlx::query_as::<_, StageEntity>(
            r#"
            INSERT INTO campaign_stages (campaign_id, title, description, ord, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.ord)
        .bind(request.due_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a campaign's stages ordered by (ord, id).
    pub async fn list_stages(&self, campaign_id: i64) -> Result<Vec<StageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_stages_by_campaign");
        let result = sqlx::query_as::<_, StageEntity>(
            "SELECT * FROM campaign_stages WHERE campaign_id = $1 ORDER BY ord, id",
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
