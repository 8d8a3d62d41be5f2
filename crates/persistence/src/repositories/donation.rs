//! Donation repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use domain::models::donation::{DonationProvider, DonationStatus};

use crate::entities::DonationEntity;
use crate::metrics::QueryTimer;
use crate::repositories::is_unique_violation;

/// Attempts before giving up on reference collisions (2^64 space, so more
/// than one retry is already extraordinary).
const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// Role-derived visibility scope for donation listings.
#[derive(Debug, Clone, Copy)]
pub enum DonationScope {
    /// Admins see every donation.
    All,
    /// Coordinators see donations to their own campaigns.
    Coordinator(i64),
    /// Everyone else sees their own donations.
    Donor(i64),
}

/// Provider-reported identity fields recorded alongside confirmation.
#[derive(Debug)]
pub struct ProviderDetails<'a> {
    pub external_id: &'a str,
    pub payer_email: Option<&'a str>,
    pub payer_name: Option<&'a str>,
}

/// Repository for donation database operations.
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Creates a new DonationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending donation with a fresh collision-checked reference.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        campaign_id: i64,
        donor_id: Option<i64>,
        provider: DonationProvider,
        amount: Decimal,
        currency: &str,
        payer_email: Option<&str>,
        payer_name: Option<&str>,
        note: Option<&str>,
    ) -> Result<DonationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_donation");
        let mut attempts = 0;
        let result = loop {
            let reference = shared::crypto::generate_reference();
            let inserted = sqlx::query_as::<_, DonationEntity>(
                r#"
                INSERT INTO donations (
                    reference, campaign_id, donor_id, provider, amount,
                    currency, payer_email, payer_name, note
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(&reference)
            .bind(campaign_id)
            .bind(donor_id)
            .bind(provider)
            .bind(amount)
            .bind(currency)
            .bind(payer_email)
            .bind(payer_name)
            .bind(note)
            .fetch_one(&self.pool)
            .await;

            match inserted {
                Err(ref e) if is_unique_violation(e) && attempts < MAX_REFERENCE_ATTEMPTS => {
                    attempts += 1;
                }
                other => break other,
            }
        };
        timer.record();
        result
    }

    /// Find a donation by its caller-facing reference.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_donation_by_reference");
        let result =
            sqlx::query_as::<_, DonationEntity>("SELECT * FROM donations WHERE reference = $1")
                .bind(reference)
                .fetch_optional(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Resolve a provider invoice id, matching `reference` first and then
    /// `external_id`.
    pub async fn resolve_invoice(
        &self,
        invoice_id: &str,
    ) -> Result<Option<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_donation_invoice");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            SELECT * FROM donations
            WHERE reference = $1 OR external_id = $1
            ORDER BY (reference = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Record provider-side identity details learned from a webhook.
    ///
    /// Existing payer fields are kept when the provider omits them.
    /// Mark a donation succeeded and credit its campaign, idempotently.
    ///
    /// The provider-detail write, the guarded status update and the
    /// campaign-total increment are one transaction: a crash mid-way rolls
    /// all of them back, and re-marking an already-succeeded donation is a
    /// no-op that never double-credits.
    pub async fn mark_succeeded(
        &self,
        id: i64,
        payload: Option<&serde_json::Value>,
        details: Option<&ProviderDetails<'_>>,
    ) -> Result<DonationEntity, sqlx::Error> {
        let timer = QueryTimer::new("mark_donation_succeeded");

        let mut tx = self.pool.begin().await?;

        if let Some(details) = details {
            sqlx::query(
                r#"
                UPDATE donations SET
                    external_id = $2,
                    payer_email = COALESCE($3, payer_email),
                    payer_name = COALESCE($4, payer_name),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(details.external_id)
            .bind(details.payer_email)
            .bind(details.payer_name)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, DonationEntity>(
            r#"
            UPDATE donations SET
                status = 'succeeded',
                confirmed_at = NOW(),
                payload = COALESCE($2, payload),
                updated_at = NOW()
            WHERE id = $1 AND status <> 'succeeded'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload)
        .fetch_optional(&mut *tx)
        .await?;

        let result = match updated {
            Some(entity) => {
                sqlx::query(
                    r#"
                    UPDATE campaigns
                    SET current_amount = current_amount + $2, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(entity.campaign_id)
                .bind(entity.amount)
                .execute(&mut *tx)
                .await?;
                tx.commit().await?;
                tracing::info!(
                    donation_id = entity.id,
                    reference = %entity.reference,
                    campaign_id = entity.campaign_id,
                    amount = %entity.amount,
                    "Donation confirmed"
                );
                Ok(entity)
            }
            None => {
                // Already succeeded; return the row unchanged.
                tx.commit().await?;
                self.find_by_id(id).await?.ok_or(sqlx::Error::RowNotFound)
            }
        };

        timer.record();
        result
    }

    /// Mark a donation failed. Repeatable; never touches campaign totals.
    pub async fn mark_failed(
        &self,
        id: i64,
        payload: Option<&serde_json::Value>,
    ) -> Result<DonationEntity, sqlx::Error> {
        let timer = QueryTimer::new("mark_donation_failed");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            UPDATE donations SET
                status = 'failed',
                payload = COALESCE($2, payload),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move a donation into an intermediate status, storing the payload.
    pub async fn mark_processing(
        &self,
        id: i64,
        payload: &serde_json::Value,
    ) -> Result<DonationEntity, sqlx::Error> {
        let timer = QueryTimer::new("mark_donation_processing");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            UPDATE donations SET
                status = 'processing',
                payload = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Plain status write used by the admin override for statuses other than
    /// succeeded (that one must go through [`Self::mark_succeeded`]).
    pub async fn set_status(
        &self,
        id: i64,
        status: DonationStatus,
    ) -> Result<Option<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_donation_status");
        let result = sqlx::query_as::<_, DonationEntity>(
            r#"
            UPDATE donations SET status = $2, updated_at = NOW()
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

    /// Find a donation by id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_donation_by_id");
        let result = sqlx::query_as::<_, DonationEntity>("SELECT * FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List donations visible in the given scope, newest first,
    /// cursor-paginated.
    pub async fn list(
        &self,
        scope: DonationScope,
        cursor: Option<(DateTime<Utc>, i64)>,
        limit: i64,
    ) -> Result<Vec<DonationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_donations");

        let (cursor_at, cursor_id) = match cursor {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };

        // The cursor predicate collapses to TRUE when no cursor was given.
        let result = match scope {
            DonationScope::All => {
                sqlx::query_as::<_, DonationEntity>(
                    r#"
                    SELECT * FROM donations
                    WHERE ($1::timestamptz IS NULL OR (created_at, id) < ($1, $2))
                    ORDER BY created_at DESC, id DESC
                    LIMIT $3
                    "#,
                )
                .bind(cursor_at)
                .bind(cursor_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            DonationScope::Coordinator(coordinator_id) => {
                sqlx::query_as::<_, DonationEntity>(
                    r#"
                    SELECT d.* FROM donations d
                    JOIN campaigns c ON c.id = d.campaign_id
                    WHERE c.coordinator_id = $4
                      AND ($1::timestamptz IS NULL OR (d.created_at, d.id) < ($1, $2))
                    ORDER BY d.created_at DESC, d.id DESC
                    LIMIT $3
                    "#,
                )
                .bind(cursor_at)
                .bind(cursor_id)
                .bind(limit)
                .bind(coordinator_id)
                .fetch_all(&self.pool)
                .await
            }
            DonationScope::Donor(donor_id) => {
                sqlx::query_as::<_, DonationEntity>(
                    r#"
                    SELECT * FROM donations
                    WHERE donor_id = $4
                      AND ($1::timestamptz IS NULL OR (created_at, id) < ($1, $2))
                    ORDER BY created_at DESC, id DESC
                    LIMIT $3
                    "#,
                )
                .bind(cursor_at)
                .bind(cursor_id)
                .bind(limit)
                .bind(donor_id)
                .fetch_all(&self.pool)
                .await
            }
        };

        timer.record();
        result
    }

    /// Sum of succeeded donation amounts for a campaign. Used by tests to
    /// assert ledger consistency against `campaigns.current_amount`.
    pub async fn succeeded_total(&self, campaign_id: i64) -> Result<Decimal, sqlx::Error> {
        let timer = QueryTimer::new("donation_succeeded_total");
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM donations
            WHERE campaign_id = $1 AND status = 'succeeded'
            "#,
        )
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(total)
    }
}
