//! Volunteer application domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Status of a volunteer's application to a campaign.
///
/// Also reused as the participation status on shift assignments, which are
/// created directly in `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Declined,
    Withdrawn,
}

/// A volunteer's request to participate in a campaign.
///
/// Unique per (campaign, volunteer); re-applying after withdrawal reuses the
/// same row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VolunteerApplication {
    pub id: i64,
    pub campaign_id: i64,
    pub volunteer_id: i64,
    pub motivation: Option<String>,
    pub experience: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for applying to a campaign.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ApplyRequest {
    #[validate(length(max = 2000, message = "Motivation must be at most 2000 characters"))]
    pub motivation: Option<String>,

    #[validate(length(max = 2000, message = "Experience must be at most 2000 characters"))]
    pub experience: Option<String>,
}

/// Request payload for the application status change action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApplicationStatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// Outcome of an apply call, distinguishing fresh rows from reactivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    Reactivated,
}
