//! Campaign repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use domain::models::campaign::{
    ApplicationCounts, CampaignStats, CampaignStatus, CreateCampaignRequest,
    UpdateCampaignRequest,
};

use crate::entities::CampaignEntity;
use crate::metrics::QueryTimer;
use crate::repositories::is_unique_violation;

/// Attempts before giving up on slug collision resolution.
const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Repository for campaign-related database operations.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    /// Creates a new CampaignRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a campaign owned by the given coordinator.
    ///
    /// The slug is derived from the title; on collision a numeric suffix is
    /// appended deterministically (slug, slug-1, slug-2, ...). The insert
    /// itself is the arbiter, so two concurrent creates with the same title
    /// cannot end up sharing a slug.
    pub async fn create(
        &self,
        coordinator_id: i64,
        request: &CreateCampaignRequest,
    ) -> Result<CampaignEntity, sqlx::Error> {
        let mut base_slug = shared::slug::slugify(&request.title);
        if base_slug.is_empty() {
            base_slug = format!("campaign-{}", &shared::crypto::generate_reference()[..8]);
        }

        let status = request.status.unwrap_or(CampaignStatus::Draft);

        let timer = QueryTimer::new("create_campaign");
        let mut counter: u32 = 0;
        let result = loop {
            let slug = if counter == 0 {
                base_slug.clone()
            } else {
                format!("{}-{}", base_slug, counter)
            };

            let inserted = sqlx::query_as::<_, CampaignEntity>(
                r#"
                INSERT INTO campaigns (
                    title, slug, short_description, description, status, category,
                    coordinator_id, location_name, location_address, region,
                    target_amount, required_volunteers, start_date, end_date,
                    contact_email, contact_phone, published_at
                )
                VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    CASE WHEN $5 = 'published'::campaign_status THEN NOW() END
                )
                RETURNING *
                "#,
            )
            .bind(&request.title)
            .bind(&slug)
            .bind(&request.short_description)
            .bind(&request.description)
            .bind(status)
            .bind(&request.category)
            .bind(coordinator_id)
            .bind(&request.location_name)
            .bind(&request.location_address)
            .bind(&request.region)
            .bind(request.target_amount)
            .bind(request.required_volunteers)
            .bind(request.start_date)
            .bind(request.end_date)
            .bind(&request.contact_email)
            .bind(&request.contact_phone)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Err(ref e) if is_unique_violation(e) && counter < MAX_SLUG_ATTEMPTS => {
                    counter += 1;
                }
                other => break other,
            }
        };
        timer.record();
        result
    }

    /// Find a campaign by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_campaign_by_slug");
        let result =
            sqlx::query_as::<_, CampaignEntity>("SELECT * FROM campaigns WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Find a campaign by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_campaign_by_id");
        let result = sqlx::query_as::<_, CampaignEntity>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Update a campaign (partial update).
    ///
    /// `published_at` follows the status: it is set exactly once, on the
    /// first transition to published, and cleared again only when the status
    /// reverts to draft or cancelled. The row is locked for the duration so
    /// a concurrent update cannot observe a half-applied transition.
    pub async fn update(
        &self,
        id: i64,
        request: &UpdateCampaignRequest,
    ) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_campaign");

        let mut tx = self.pool.begin().await?;

        let Some(current) = sqlx::query_as::<_, CampaignEntity>(
            "SELECT * FROM campaigns WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            timer.record();
            return Ok(None);
        };

        let new_status = request.status.unwrap_or(current.status);
        let published_at = if new_status == CampaignStatus::Published {
            current.published_at.or_else(|| Some(chrono::Utc::now()))
        } else if new_status.clears_published_at() {
            None
        } else {
            current.published_at
        };

        let updated = sqlx::query_as::<_, CampaignEntity>(
            r#"
            UPDATE campaigns SET
                short_description = COALESCE($2, short_description),
                description = COALESCE($3, description),
                status = $4,
                region = COALESCE($5, region),
                target_amount = COALESCE($6, target_amount),
                required_volunteers = COALESCE($7, required_volunteers),
                start_date = COALESCE($8, start_date),
                end_date = COALESCE($9, end_date),
                published_at = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.short_description)
        .bind(&request.description)
        .bind(new_status)
        .bind(&request.region)
        .bind(request.target_amount)
        .bind(request.required_volunteers)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(published_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(updated))
    }

    /// Aggregate stats for the coordinator dashboard.
    pub async fn stats(&self, campaign_id: i64) -> Result<Option<CampaignStats>, sqlx::Error> {
        let timer = QueryTimer::new("campaign_stats");

        let Some(campaign) = self.find_by_id(campaign_id).await? else {
            timer.record();
            return Ok(None);
        };

        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'approved'),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'declined'),
                COUNT(*) FILTER (WHERE status = 'withdrawn')
            FROM volunteer_applications
            WHERE campaign_id = $1
            "#,
        )
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await?;

        let (shift_capacity,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(capacity), 0) FROM campaign_shifts WHERE campaign_id = $1",
        )
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await?;

        timer.record();
        Ok(Some(CampaignStats {
            volunteers: ApplicationCounts {
                approved: counts.0,
                pending: counts.1,
                declined: counts.2,
                withdrawn: counts.3,
            },
            shift_capacity,
            target_amount: campaign.target_amount.unwrap_or(Decimal::ZERO),
            current_amount: campaign.current_amount,
        }))
    }
}
