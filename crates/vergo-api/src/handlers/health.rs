//! Liveness and readiness probes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /readyz
///
/// 503 when the database does not answer a ping.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let Some(db) = &state.db else {
        return (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                database: "disabled".to_string(),
            }),
        );
    };

    match db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                database: "connected".to_string(),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable".to_string(),
                    database: "unreachable".to_string(),
                }),
            )
        }
    }
}
