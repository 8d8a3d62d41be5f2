use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, optional_user_auth, require_user_auth, trace_id,
};
use crate::routes::{assignments, campaigns, donations, health, shifts, users, webhooks};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<shared::jwt::JwtConfig>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let jwt = Arc::new(shared::jwt::JwtConfig::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
    ));

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes (require a valid user JWT)
    let protected_routes = Router::new()
        // Users
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/users/:id/role", patch(users::update_role))
        // Campaigns
        .route("/api/v1/campaigns", post(campaigns::create_campaign))
        .route("/api/v1/campaigns/:slug", patch(campaigns::update_campaign))
        .route("/api/v1/campaigns/:slug/apply", post(campaigns::apply))
        .route(
            "/api/v1/campaigns/:slug/applications",
            get(campaigns::list_applications),
        )
        .route("/api/v1/campaigns/:slug/stats", get(campaigns::stats))
        .route("/api/v1/campaigns/:slug/stages", post(shifts::create_stage))
        .route("/api/v1/campaigns/:slug/shifts", post(shifts::create_shift))
        // Applications
        .route(
            "/api/v1/volunteer-applications/:id",
            patch(campaigns::update_application_status),
        )
        // Shifts
        .route("/api/v1/campaign-shifts/:id/join", post(shifts::join_shift))
        .route(
            "/api/v1/campaign-shifts/:id/leave",
            delete(shifts::leave_shift),
        )
        .route(
            "/api/v1/my-shift-assignments",
            get(assignments::my_upcoming),
        )
        // Donations
        .route("/api/v1/donations", get(donations::list_donations))
        .route(
            "/api/v1/donations/:reference",
            get(donations::get_donation),
        )
        .route(
            "/api/v1/donations/:reference/status",
            patch(donations::override_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Donation creation accepts both authenticated and anonymous callers.
    let optional_auth_routes = Router::new()
        .route("/api/v1/donations", post(donations::create_donation))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/campaigns/:slug", get(campaigns::get_campaign))
        .route("/api/v1/campaigns/:slug/stages", get(shifts::list_stages))
        .route("/api/v1/campaigns/:slug/shifts", get(shifts::list_shifts))
        // Signed by the provider, not by a user token.
        .route(
            "/api/v1/webhooks/monobank",
            post(webhooks::monobank_webhook),
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(optional_auth_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
