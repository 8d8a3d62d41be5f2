//! Campaign entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use domain::models::campaign::{Campaign, CampaignStatus};

/// Database row mapping for the campaigns table.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignEntity {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub status: CampaignStatus,
    pub category: String,
    pub coordinator_id: i64,
    pub location_name: String,
    pub location_address: Option<String>,
    pub region: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Decimal,
    pub required_volunteers: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<CampaignEntity> for Campaign {
    fn from(entity: CampaignEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            slug: entity.slug,
            short_description: entity.short_description,
            description: entity.description,
            status: entity.status,
            category: entity.category,
            coordinator_id: entity.coordinator_id,
            location_name: entity.location_name,
            location_address: entity.location_address,
            region: entity.region,
            target_amount: entity.target_amount,
            current_amount: entity.current_amount,
            required_volunteers: entity.required_volunteers,
            start_date: entity.start_date,
            end_date: entity.end_date,
            contact_email: entity.contact_email,
            contact_phone: entity.contact_phone,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            published_at: entity.published_at,
        }
    }
}
