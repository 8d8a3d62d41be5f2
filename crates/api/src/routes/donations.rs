//! Donation ledger handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use validator::Validate;

use domain::models::donation::{
    CreateDonationRequest, Donation, DonationResponse, DonationStatus,
    DonationStatusUpdateRequest,
};
use domain::models::UserRole;
use domain::services::policy::{can, Action, Resource};
use persistence::repositories::{CampaignRepository, DonationRepository, DonationScope};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{metrics, AuthUser};
use crate::routes::{Page, PageQuery};

/// POST /api/v1/donations
///
/// Authentication is optional: an authenticated caller becomes the donor,
/// an anonymous one must leave a payer email.
pub async fn create_donation(
    State(state): State<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(request): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<DonationResponse>), ApiError> {
    request.validate()?;
    if request.amount <= Decimal::ZERO {
        return Err(ApiError::Validation("Amount must be positive".into()));
    }

    let donor = auth.map(|Extension(AuthUser(user))| user);
    if donor.is_none() && request.payer_email.is_none() {
        return Err(ApiError::Forbidden(
            "Anonymous donations require a payer email".into(),
        ));
    }

    let campaigns = CampaignRepository::new(state.pool.clone());
    if campaigns.find_by_id(request.campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".into()));
    }

    let donations = DonationRepository::new(state.pool.clone());
    let created = donations
        .create(
            request.campaign_id,
            donor.as_ref().map(|u| u.id),
            request.provider,
            request.amount,
            request.currency.as_deref().unwrap_or("UAH"),
            request.payer_email.as_deref(),
            request.payer_name.as_deref(),
            request.note.as_deref(),
        )
        .await?;

    tracing::info!(
        reference = %created.reference,
        campaign_id = created.campaign_id,
        provider = created.provider.as_str(),
        "Donation created"
    );
    Ok((StatusCode::CREATED, Json(Donation::from(created).into())))
}

/// GET /api/v1/donations/:reference
pub async fn get_donation(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(reference): Path<String>,
) -> Result<Json<DonationResponse>, ApiError> {
    let donations = DonationRepository::new(state.pool.clone());
    let donation: Donation = donations
        .find_by_reference(&reference)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".into()))?
        .into();

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .find_by_id(donation.campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".into()))?;

    let allowed = can(
        &actor,
        Action::ViewDonation,
        Resource::Donation {
            donation: &donation,
            campaign_coordinator_id: campaign.coordinator_id,
        },
    );
    if !allowed {
        return Err(ApiError::Forbidden(
            "Not allowed to view this donation".into(),
        ));
    }

    Ok(Json(donation.into()))
}

/// GET /api/v1/donations
///
/// Role-scoped: admins see all, coordinators their campaigns' donations,
/// everyone else their own.
pub async fn list_donations(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<DonationResponse>>, ApiError> {
    let scope = match actor.role {
        UserRole::Admin => DonationScope::All,
        UserRole::Coordinator => DonationScope::Coordinator(actor.id),
        _ => DonationScope::Donor(actor.id),
    };

    let (cursor, limit) = page.resolve()?;
    let donations = DonationRepository::new(state.pool.clone());
    let entities = donations.list(scope, cursor, limit).await?;

    // Cursor keys come from the rows before the entity is consumed.
    let keys: Vec<_> = entities.iter().map(|e| (e.created_at, e.id)).collect();
    let items: Vec<DonationResponse> = entities
        .into_iter()
        .map(|e| Donation::from(e).into())
        .collect();

    let next_cursor = if keys.len() as i64 == limit {
        keys.last()
            .map(|(created_at, id)| shared::pagination::encode_cursor(*created_at, *id))
    } else {
        None
    };
    Ok(Json(Page { items, next_cursor }))
}

/// PATCH /api/v1/donations/:reference/status
///
/// Admin override. A succeeded target routes through the idempotent
/// confirmation path so the campaign total stays consistent; any other
/// target is a plain status write. `refunded` is reachable only here.
pub async fn override_status(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(reference): Path<String>,
    Json(request): Json<DonationStatusUpdateRequest>,
) -> Result<Json<DonationResponse>, ApiError> {
    if !can(&actor, Action::OverrideDonationStatus, Resource::System) {
        return Err(ApiError::Forbidden(
            "Only admins may override donation status".into(),
        ));
    }

    let donations = DonationRepository::new(state.pool.clone());
    let donation = donations
        .find_by_reference(&reference)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".into()))?;

    let updated = match request.status {
        DonationStatus::Succeeded => {
            let updated = donations.mark_succeeded(donation.id, None, None).await?;
            metrics::record_donation_confirmed();
            updated
        }
        status => donations
            .set_status(donation.id, status)
            .await?
            .ok_or_else(|| ApiError::NotFound("Donation not found".into()))?,
    };

    tracing::info!(
        reference = %reference,
        actor_id = actor.id,
        "Donation status overridden"
    );
    Ok(Json(Donation::from(updated).into()))
}
