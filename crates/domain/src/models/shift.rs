//! Campaign shift domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Recruitment status of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "shift_status", rename_all = "snake_case")]
pub enum ShiftStatus {
    Open,
    Full,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    /// Whether volunteers may still join or appear on upcoming lists.
    pub fn accepts_volunteers(&self) -> bool {
        matches!(self, ShiftStatus::Open | ShiftStatus::Full)
    }
}

/// A bounded time window on a campaign with a volunteer capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CampaignShift {
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

/// Request payload for creating a shift.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateShiftRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,

    #[validate(range(min = 1, message = "Capacity must be a positive integer"))]
    #[serde(default = "default_capacity")]
    pub capacity: i32,

    pub location_details: Option<String>,
    pub instructions: Option<String>,
}

fn default_capacity() -> i32 {
    1
}

impl CreateShiftRequest {
    /// The end of the window must be strictly after its start.
    pub fn validate_window(&self) -> Result<(), String> {
        if self.end_at <= self.start_at {
            return Err("Shift end must be after its start".to_string());
        }
        Ok(())
    }
}

/// Shift projection including the derived occupancy count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShiftResponse {
    pub id: i64,
    pub campaign_id: i64,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub capacity: i32,
    pub status: ShiftStatus,
    /// Count of assignments with status approved.
    pub occupied_spots: i64,
    pub location_details: Option<String>,
    pub instructions: Option<String>,
}

impl ShiftResponse {
    pub fn from_shift(shift: CampaignShift, occupied_spots: i64) -> Self {
        Self {
            id: shift.id,
            campaign_id: shift.campaign_id,
            title: shift.title,
            start_at: shift.start_at,
            end_at: shift.end_at,
            capacity: shift.capacity,
            status: shift.status,
            occupied_spots,
            location_details: shift.location_details,
            instructions: shift.instructions,
        }
    }
}
