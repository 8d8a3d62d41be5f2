//! User JWT authentication middleware.
//!
//! Validates the Bearer token, loads the account and stores it in request
//! extensions for downstream handlers. Token issuance happens elsewhere;
//! this service only verifies.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use domain::models::User;
use persistence::repositories::UserRepository;

use crate::app::AppState;

/// Authenticated user loaded from the JWT subject claim.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Middleware that requires JWT user authentication.
///
/// Rejects requests without a valid Bearer token or whose subject does not
/// resolve to an existing account.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(AuthUser(user));
            next.run(req).await
        }
        Ok(None) => unauthorized_response("Missing or invalid Authorization header"),
        Err(response) => response,
    }
}

/// Middleware that optionally validates JWT user authentication.
///
/// A valid token attaches the account to request extensions; an absent
/// header lets the request proceed anonymously. A present but invalid token
/// is still rejected.
pub async fn optional_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if req.headers().get("Authorization").is_none() {
        return next.run(req).await;
    }
    match authenticate(&state, req.headers()).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(AuthUser(user));
            next.run(req).await
        }
        Ok(None) => unauthorized_response("Invalid Authorization header"),
        Err(response) => response,
    }
}

/// Validates the Bearer token and loads the account it names.
///
/// `Ok(None)` means the header was absent or not a Bearer token; an invalid
/// or unresolvable token is an error response.
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<User>, Response> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Ok(None),
    };

    let user_id = match state.jwt.validate_access_token(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            return Err(unauthorized_response("Invalid or expired token"));
        }
    };

    let repo = UserRepository::new(state.pool.clone());
    match repo.find_by_id(user_id).await {
        Ok(Some(entity)) => Ok(Some(entity.into())),
        Ok(None) => Err(unauthorized_response("Unknown account")),
        Err(e) => {
            tracing::error!("Failed to load authenticated user: {}", e);
            Err(internal_error_response("Authentication service unavailable"))
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message,
        })),
    )
        .into_response()
}
