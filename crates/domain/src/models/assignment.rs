//! Shift assignment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::application::ApplicationStatus;
use super::shift::ShiftStatus;

/// A volunteer's concrete occupation of one shift slot.
///
/// Unique per (shift, volunteer). Created directly in `Approved`; deleting it
/// is the only "leave" operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ShiftAssignment {
    pub id: i64,
    pub shift_id: i64,
    pub volunteer_id: i64,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Whether a join call created a new assignment or found an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}

/// An upcoming assignment as shown to the volunteer, joined with its shift
/// and campaign context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpcomingAssignment {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub shift_title: String,
    pub shift_status: ShiftStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub campaign_id: i64,
    pub campaign_title: String,
    pub campaign_slug: String,
    pub location_details: Option<String>,
}
