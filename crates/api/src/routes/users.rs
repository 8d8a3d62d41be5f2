//! User account handlers.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use domain::models::user::{UpdateRoleRequest, UserResponse};
use domain::services::policy::{can, Action, Resource};
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// GET /api/v1/users/me
pub async fn me(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<UserResponse> {
    Json(user.into())
}

/// PATCH /api/v1/users/:id/role
///
/// Admin-only role change for another account.
pub async fn update_role(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if !can(&actor, Action::ChangeUserRole, Resource::System) {
        return Err(ApiError::Forbidden("Only admins may change roles".into()));
    }

    let repo = UserRepository::new(state.pool.clone());
    let updated = repo
        .update_role(id, request.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    tracing::info!(user_id = id, role = updated.role.as_str(), "Role changed");
    Ok(Json(domain::models::User::from(updated).into()))
}
