//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ApiResponse, ComponentHealth, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
///
/// Responds `503` when either the record store or the default storage
/// provider is unreachable.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<DetailedHealthResponse>>) {
    let store_ok = matches!(state.record_store.health_check().await, Ok(true));

    let storage = state.storage_manager.default_provider().ok();
    let storage_ok = match &storage {
        Some(provider) => matches!(provider.health_check().await, Ok(true)),
        None => false,
    };

    let healthy = store_ok && storage_ok;
    if !healthy {
        tracing::warn!(
            record_store = store_ok,
            storage = storage_ok,
            "Health check degraded"
        );
    }

    let body = DetailedHealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        record_store: ComponentHealth {
            backend: state.record_store.backend().to_string(),
            status: component_status(store_ok),
        },
        storage: ComponentHealth {
            backend: state.storage_manager.default_name().to_string(),
            status: component_status(storage_ok),
        },
        upload_strategy: state.issuance_service.strategy().to_string(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ApiResponse::ok(body)))
}

fn component_status(ok: bool) -> String {
    if ok { "ok" } else { "unavailable" }.to_string()
}
