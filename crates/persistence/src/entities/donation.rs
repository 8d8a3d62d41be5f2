//! Donation entity (database row mapping).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use domain::models::donation::{Donation, DonationProvider, DonationStatus};

/// Database row mapping for the donations table.
#[derive(Debug, Clone, FromRow)]
pub struct DonationEntity {
    pub id: i64,
    pub reference: String,
    pub campaign_id: i64,
    pub donor_id: Option<i64>,
    pub provider: DonationProvider,
    pub external_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: DonationStatus,
    pub payer_email: Option<String>,
    pub payer_name: Option<String>,
    pub note: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl From<DonationEntity> for Donation {
    fn from(entity: DonationEntity) -> Self {
        Self {
            id: entity.id,
            reference: entity.reference,
            campaign_id: entity.campaign_id,
            donor_id: entity.donor_id,
            provider: entity.provider,
            external_id: entity.external_id,
            amount: entity.amount,
            currency: entity.currency,
            status: entity.status,
            payer_email: entity.payer_email,
            payer_name: entity.payer_name,
            note: entity.note,
            payload: entity.payload,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            confirmed_at: entity.confirmed_at,
        }
    }
}
