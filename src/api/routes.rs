//! Router assembly.

use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::get};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;

use crate::api::doc::openapi_json;
use crate::api::handlers::{fallback::fallback, health};
use crate::api::middleware::{
    cors_layer, global_error_handler, handle_panic, logging_middleware, request_id_middleware,
};
use crate::config::Settings;
use crate::state::AppState;

/// Routers mounted under `/api/auth` and `/api/messages`.
///
/// Both are empty by default; the embedding application supplies them.
#[derive(Default)]
pub struct RouteGroups {
    pub auth: Router<AppState>,
    pub messages: Router<AppState>,
}

impl RouteGroups {
    pub fn with_auth(mut self, router: Router<AppState>) -> Self {
        self.auth = router;
        self
    }

    pub fn with_messages(mut self, router: Router<AppState>) -> Self {
        self.messages = router;
        self
    }
}

/// Creates the application router with all routes and middleware.
///
/// # Routes
/// - `/health`, `/api/health` - liveness
/// - `/health/ready`, `/api/health/ready` - readiness
/// - `/api/openapi.json` - OpenAPI document
/// - `/api/auth/*`, `/api/messages/*` - route groups
/// - anything else - API 404, SPA fallback or plain 404
///
/// # Middleware Order
/// Outermost first: request ID, logging, CORS, panic catcher, error body
/// normalisation, compression, timeout, body limit. Layers are added below
/// in the reverse order because the last `.layer` call wraps everything.
///
/// The panic catcher sits inside CORS so the 500 it produces still carries
/// the allow-origin and allow-credentials headers.
pub fn create_router(settings: &Settings, state: AppState, groups: RouteGroups) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/health/ready", get(health::readiness_check))
        .route("/api/openapi.json", get(openapi_json))
        .nest("/api/auth", groups.auth)
        .nest("/api/messages", groups.messages)
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(settings.server.body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout,
        )))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(global_error_handler))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(settings))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
