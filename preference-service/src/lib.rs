pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, put},
};
use service_core::middleware::{
    metrics::metrics_middleware, rate_limit::ip_rate_limit_middleware,
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::PreferenceConfig;
use crate::services::{CourseDirectory, JwtService, OverrideStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PreferenceConfig,
    pub jwt: JwtService,
    pub overrides: Arc<dyn OverrideStore>,
    pub courses: Arc<dyn CourseDirectory>,
    pub ip_rate_limiter: service_core::middleware::rate_limit::IpRateLimiter,
}

/// Build the HTTP router.
///
/// User and course resolution happen in explicit layers and extractors, so
/// the operation handlers receive both as parameters instead of ambient
/// state: bearer auth is a middleware on the API routes only, the course
/// comes from the request path inside each handler.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/v1/users/self/courses/:course_id/notifications_enabled",
            get(handlers::notifications_enabled),
        )
        .route(
            "/api/v1/users/self/courses/:course_id/enable_notifications",
            put(handlers::enable_notifications),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(api_routes)
        .with_state(state)
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
