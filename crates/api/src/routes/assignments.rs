//! Volunteer-facing assignment listings.

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use domain::models::assignment::UpcomingAssignment;
use persistence::repositories::AssignmentRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/v1/my-shift-assignments
///
/// The caller's approved assignments whose shift has not ended and still
/// accepts volunteers, soonest first.
pub async fn my_upcoming(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
) -> Result<Json<Vec<UpcomingAssignment>>, ApiError> {
    let assignments = AssignmentRepository::new(state.pool.clone());
    let items = assignments
        .list_upcoming(actor.id, Utc::now())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(items))
}
