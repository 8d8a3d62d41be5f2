//! Campaign shift entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::shift::{CampaignShift, ShiftStatus};

/// Database row mapping for the campaign_shifts table.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftEntity {
    pub id: i64,
    pub campaign_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub capacity: i32,
    pub status: ShiftStatus,
    pub location_details: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Shift row joined with its approved-assignment count.
#[derive(Debug, Clone, FromRow)]
pub struct ShiftWithOccupancyRow {
    #[sqlx(flatten)]
    pub shift: ShiftEntity,
    pub occupied_spots: i64,
}

impl From<ShiftEntity> for CampaignShift {
    fn from(entity: ShiftEntity) -> Self {
        Self {
            id: entity.id,
            campaign_id: entity.campaign_id,
            title: entity.title,
            description: entity.description,
            start_at: entity.start_at,
            end_at: entity.end_at,
            capacity: entity.capacity,
            status: entity.status,
            location_details: entity.location_details,
            instructions: entity.instructions,
            created_at: entity.created_at,
        }
    }
}
