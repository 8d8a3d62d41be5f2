//! Shift assignment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::application::ApplicationStatus;
use domain::models::assignment::{ShiftAssignment, UpcomingAssignment};
use domain::models::shift::ShiftStatus;

/// Database row mapping for the shift_assignments table.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentEntity {
    pub id: i64,
    pub shift_id: i64,
    pub volunteer_id: i64,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AssignmentEntity> for ShiftAssignment {
    fn from(entity: AssignmentEntity) -> Self {
        Self {
            id: entity.id,
            shift_id: entity.shift_id,
            volunteer_id: entity.volunteer_id,
            status: entity.status,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}

/// Joined row for the "my upcoming assignments" listing.
#[derive(Debug, Clone, FromRow)]
pub struct UpcomingAssignmentRow {
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

impl From<UpcomingAssignmentRow> for UpcomingAssignment {
    fn from(row: UpcomingAssignmentRow) -> Self {
        Self {
            assignment_id: row.assignment_id,
            shift_id: row.shift_id,
            shift_title: row.shift_title,
            shift_status: row.shift_status,
            start_at: row.start_at,
            end_at: row.end_at,
            campaign_id: row.campaign_id,
            campaign_title: row.campaign_title,
            campaign_slug: row.campaign_slug,
            location_details: row.location_details,
        }
    }
}
