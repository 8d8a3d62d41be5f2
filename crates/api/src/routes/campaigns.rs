//! Campaign handlers: CRUD, applications and stats.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use domain::models::application::{
    ApplicationStatusUpdateRequest, ApplyOutcome, ApplyRequest, VolunteerApplication,
};
use domain::models::campaign::{
    Campaign, CampaignResponse, CampaignStats, CreateCampaignRequest, UpdateCampaignRequest,
};
use domain::services::policy::{can, Action, Resource};
use persistence::repositories::{ApplicationRepository, CampaignRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::routes::{Page, PageQuery};

/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<CampaignResponse>), ApiError> {
    if !can(&actor, Action::CreateCampaign, Resource::System) {
        return Err(ApiError::Forbidden(
            "Only coordinators may create campaigns".into(),
        ));
    }
    request.validate()?;

    let repo = CampaignRepository::new(state.pool.clone());
    let created = repo.create(actor.id, &request).await?;

    tracing::info!(campaign_id = created.id, slug = %created.slug, "Campaign created");
    Ok((
        StatusCode::CREATED,
        Json(Campaign::from(created).into()),
    ))
}

/// GET /api/v1/campaigns/:slug
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let repo = CampaignRepository::new(state.pool.clone());
    let campaign = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;
    Ok(Json(Campaign::from(campaign).into()))
}

/// PATCH /api/v1/campaigns/:slug
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<CampaignResponse>, ApiError> {
    request.validate()?;

    let repo = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?
        .into();

    if !can(&actor, Action::ManageCampaign, Resource::Campaign(&campaign)) {
        return Err(ApiError::Forbidden(
            "Only the owning coordinator may edit this campaign".into(),
        ));
    }

    let updated = repo
        .update(campaign.id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;
    Ok(Json(Campaign::from(updated).into()))
}

/// POST /api/v1/campaigns/:slug/apply
///
/// 201 on a fresh application, 200 when a withdrawn one is reactivated.
pub async fn apply(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(slug): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<VolunteerApplication>), ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?
        .into();

    if !can(&actor, Action::ApplyToCampaign, Resource::Campaign(&campaign)) {
        return Err(ApiError::Forbidden(
            "Coordinators cannot apply to their own campaign".into(),
        ));
    }

    let applications = ApplicationRepository::new(state.pool.clone());
    let (entity, outcome) = applications
        .apply(
            campaign.id,
            actor.id,
            request.motivation.as_deref(),
            request.experience.as_deref(),
        )
        .await?;

    let status = match outcome {
        ApplyOutcome::Created => StatusCode::CREATED,
        ApplyOutcome::Reactivated => StatusCode::OK,
    };
    Ok((status, Json(entity.into())))
}

/// PATCH /api/v1/volunteer-applications/:id
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(request): Json<ApplicationStatusUpdateRequest>,
) -> Result<Json<VolunteerApplication>, ApiError> {
    let applications = ApplicationRepository::new(state.pool.clone());
    let application: VolunteerApplication = applications
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".into()))?
        .into();

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_id(application.campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    let allowed = can(
        &actor,
        Action::SetApplicationStatus(request.status),
        Resource::Application {
            application: &application,
            campaign_coordinator_id: campaign.coordinator_id,
        },
    );
    if !allowed {
        return Err(ApiError::Forbidden(
            "Not allowed to change this application's status".into(),
        ));
    }

    let updated = applications
        .update_status(id, request.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".into()))?;
    Ok(Json(updated.into()))
}

/// GET /api/v1/campaigns/:slug/applications
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<VolunteerApplication>>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?
        .into();

    if !can(&actor, Action::ViewApplications, Resource::Campaign(&campaign)) {
        return Err(ApiError::Forbidden(
            "Only the owning coordinator may list applications".into(),
        ));
    }

    let (cursor, limit) = page.resolve()?;
    let applications = ApplicationRepository::new(state.pool.clone());
    let items: Vec<VolunteerApplication> = applications
        .list_by_campaign(campaign.id, cursor, limit)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(Page::new(items, limit, |a| (a.created_at, a.id))))
}

/// GET /api/v1/campaigns/:slug/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<Json<CampaignStats>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign: Campaign = campaigns
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?
        .into();

    if !can(&actor, Action::ViewCampaignStats, Resource::Campaign(&campaign)) {
        return Err(ApiError::Forbidden(
            "Only the owning coordinator may view stats".into(),
        ));
    }

    let stats = campaigns
        .stats(campaign.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;
    Ok(Json(stats))
}
