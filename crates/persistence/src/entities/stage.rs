//! Campaign stage entity (database row mapping).

use chrono::NaiveDate;
use sqlx::FromRow;

use domain::models::stage::CampaignStage;

/// Database row mapping for the campaign_stages table.
#[derive(Debug, Clone, FromRow)]
pub struct StageEntity {
    pub id: i64,
    pub campaign_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ord: i32,
    pub is_completed: bool,
    pub due_date: Option<NaiveDate>,
}

impl From<StageEntity> for CampaignStage {
    fn from(entity: StageEntity) -> Self {
        Self {
            id: entity.id,
            campaign_id: entity.campaign_id,
            title: entity.title,
            description: entity.description,
            ord: entity.ord,
            is_completed: entity.is_completed,
            due_date: entity.due_date,
        }
    }
}
