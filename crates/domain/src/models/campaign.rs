//! Campaign domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "campaign_status", rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Published,
    InProgress,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    /// Statuses in which `published_at` must be cleared again.
    pub fn clears_published_at(&self) -> bool {
        matches!(self, CampaignStatus::Draft | CampaignStatus::Cancelled)
    }
}

/// Represents a volunteer campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Campaign {
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
    /// Set exactly once, the first time the campaign is published. Cleared
    /// only when the status reverts to draft or cancelled.
    pub published_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a campaign.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 280, message = "Short description must be 1-280 characters"))]
    pub short_description: String,

    pub description: String,

    #[serde(default)]
    pub status: Option<CampaignStatus>,

    #[validate(length(min = 1, max = 120, message = "Category must be 1-120 characters"))]
    pub category: String,

    #[validate(length(min = 1, max = 255, message = "Location name must be 1-255 characters"))]
    pub location_name: String,

    pub location_address: Option<String>,
    pub region: Option<String>,
    pub target_amount: Option<Decimal>,

    #[serde(default)]
    pub required_volunteers: i32,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Request payload for updating a campaign (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 280, message = "Short description must be 1-280 characters"))]
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub status: Option<CampaignStatus>,
    pub region: Option<String>,
    pub target_amount: Option<Decimal>,
    pub required_volunteers: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Response payload for campaign reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CampaignResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub description: String,
    pub status: CampaignStatus,
    pub category: String,
    pub coordinator_id: i64,
    pub location_name: String,
    pub region: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Decimal,
    pub required_volunteers: i32,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<Campaign> for CampaignResponse {
    fn from(c: Campaign) -> Self {
        Self {
            id: c.id,
            title: c.title,
            slug: c.slug,
            short_description: c.short_description,
            description: c.description,
            status: c.status,
            category: c.category,
            coordinator_id: c.coordinator_id,
            location_name: c.location_name,
            region: c.region,
            target_amount: c.target_amount,
            current_amount: c.current_amount,
            required_volunteers: c.required_volunteers,
            published_at: c.published_at,
        }
    }
}

/// Aggregate counts shown to the campaign's coordinator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CampaignStats {
    pub volunteers: ApplicationCounts,
    pub shift_capacity: i64,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
}

/// Application counts broken down by status.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ApplicationCounts {
    pub approved: i64,
    pub pending: i64,
    pub declined: i64,
    pub withdrawn: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clears_published_at() {
        assert!(CampaignStatus::Draft.clears_published_at());
        assert!(CampaignStatus::Cancelled.clears_published_at());
        assert!(!CampaignStatus::Published.clears_published_at());
        assert!(!CampaignStatus::InProgress.clears_published_at());
        assert!(!CampaignStatus::Completed.clears_published_at());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CampaignStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateCampaignRequest {
            title: String::new(),
            short_description: "x".to_string(),
            description: String::new(),
            status: None,
            category: "humanitarian".to_string(),
            location_name: "Kyiv".to_string(),
            location_address: None,
            region: None,
            target_amount: None,
            required_volunteers: 0,
            start_date: None,
            end_date: None,
            contact_email: None,
            contact_phone: None,
        };
        assert!(request.validate().is_err());
    }
}
