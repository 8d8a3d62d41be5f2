//! Stage and shift handlers, including the capacity-enforced join flow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use domain::models::application::ApplicationStatus;
use domain::models::assignment::JoinOutcome;
use domain::models::campaign::Campaign;
use domain::models::shift::{CreateShiftRequest, ShiftResponse};
use domain::models::stage::{CampaignStage, CreateStageRequest};
use domain::models::ShiftAssignment;
use domain::services::policy::{can, Action, Resource};
use persistence::repositories::{
    ApplicationRepository, AssignmentRepository, CampaignRepository, ShiftRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{metrics, AuthUser};

async fn owned_campaign(
    state: &AppState,
    actor: &domain::models::User,
    slug: &str,
) -> Result<Campaign, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?
        .into();

    if !can(actor, Action::ManageCampaign, Resource::Campaign(&campaign)) {
        return Err(ApiError::Forbidden(
            "Only the owning coordinator may manage this campaign".into(),
        ));
    }
    Ok(campaign)
}

/// POST /api/v1/campaigns/:slug/stages
pub async fn create_stage(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(slug): Path<String>,
    Json(request): Json<CreateStageRequest>,
) -> Result<(StatusCode, Json<CampaignStage>), ApiError> {
    request.validate()?;
    let campaign = owned_campaign(&state, &actor, &slug).await?;

    let shifts = ShiftRepository::new(state.pool.clone());
    let created = shifts.create_stage(campaign.id, &request).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /api/v1/campaigns/:slug/stages
pub async fn list_stages(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CampaignStage>>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    let shifts = ShiftRepository::new(state.pool.clone());
    let stages = shifts
        .list_stages(campaign.id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(stages))
}

/// POST /api/v1/campaigns/:slug/shifts
pub async fn create_shift(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(slug): Path<String>,
    Json(request): Json<CreateShiftRequest>,
) -> Result<(StatusCode, Json<ShiftResponse>), ApiError> {
    request.validate()?;
    request.validate_window().map_err(ApiError::Validation)?;
    let campaign = owned_campaign(&state, &actor, &slug).await?;

    let shifts = ShiftRepository::new(state.pool.clone());
    let created = shifts.create(campaign.id, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ShiftResponse::from_shift(created.into(), 0)),
    ))
}

/// GET /api/v1/campaigns/:slug/shifts
pub async fn list_shifts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    let shifts = ShiftRepository::new(state.pool.clone());
    let rows = shifts.list_by_campaign(campaign.id).await?;
    let items = rows
        .into_iter()
        .map(|row| ShiftResponse::from_shift(row.shift.into(), row.occupied_spots))
        .collect();
    Ok(Json(items))
}

/// POST /api/v1/campaign-shifts/:id/join
///
/// 201 on a fresh assignment, 200 when the caller already holds one.
/// Volunteers need an approved application on the shift's campaign; the
/// owning coordinator and admins join without one.
pub async fn join_shift(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShiftAssignment>), ApiError> {
    let shifts = ShiftRepository::new(state.pool.clone());
    let shift = shifts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shift not found".into()))?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_id(shift.campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?
        .into();

    if !can(&actor, Action::JoinWithoutApproval, Resource::Campaign(&campaign)) {
        let applications = ApplicationRepository::new(state.pool.clone());
        let approved = applications
            .find_with_status(campaign.id, actor.id, ApplicationStatus::Approved)
            .await?;
        if approved.is_none() {
            return Err(ApiError::Forbidden(
                "An approved application is required to join this shift".into(),
            ));
        }
    }

    let assignments = AssignmentRepository::new(state.pool.clone());
    let (entity, outcome) = assignments.join(id, actor.id).await?;

    let status = match outcome {
        JoinOutcome::Joined => {
            metrics::record_shift_joined();
            StatusCode::CREATED
        }
        JoinOutcome::AlreadyJoined => StatusCode::OK,
    };
    Ok((status, Json(entity.into())))
}

/// DELETE /api/v1/campaign-shifts/:id/leave
pub async fn leave_shift(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let assignments = AssignmentRepository::new(state.pool.clone());
    let deleted = assignments.leave(id, actor.id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("No assignment for this shift".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
