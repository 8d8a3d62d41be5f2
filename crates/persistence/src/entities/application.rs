//! Volunteer application entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::application::{ApplicationStatus, VolunteerApplication};

/// Database row mapping for the volunteer_applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: i64,
    pub campaign_id: i64,
    pub volunteer_id: i64,
    pub motivation: Option<String>,
    pub experience: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApplicationEntity> for VolunteerApplication {
    fn from(entity: ApplicationEntity) -> Self {
        Self {
            id: entity.id,
            campaign_id: entity.campaign_id,
            volunteer_id: entity.volunteer_id,
            motivation: entity.motivation,
            experience: entity.experience,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
