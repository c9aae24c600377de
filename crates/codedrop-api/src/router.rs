//! Route definitions for the CodeDrop HTTP API.
//!
//! JSON routes are mounted under `/api`. When the local storage provider
//! is active, stored files are served under `/files`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use codedrop_storage::providers::local::FILES_ROUTE;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload =
        usize::try_from(state.config.storage.max_upload_size_bytes).unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(issue_routes())
        .merge(redeem_routes(&state))
        .merge(health_routes());

    let mut router = Router::new().nest("/api", api_routes);

    if let Some(root) = state.local_files_root() {
        router = router.nest_service(FILES_ROUTE, ServeDir::new(root));
    }

    router
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(middleware::logging::request_span))
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Code issuance: proxied upload / link, and direct upload sessions
fn issue_routes() -> Router<AppState> {
    Router::new()
        .route("/issue", post(handlers::share::issue))
        .route("/issue/session", post(handlers::share::begin_upload))
}

/// Code redemption, throttled per client when a limiter is configured
fn redeem_routes(state: &AppState) -> Router<AppState> {
    let routes = Router::new().route("/redeem", get(handlers::share::redeem));

    match state.redeem_limiter.clone() {
        Some(limiter) => routes.route_layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit,
        )),
        None => routes,
    }
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
