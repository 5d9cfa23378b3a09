use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

/// Liveness of the credential store. The recommendation provider is
/// reported but does not fail the check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let recommendations = if state.careers.provider_ready().await {
        "available"
    } else {
        "unavailable"
    };

    match state.users.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": state.config.service_name,
                "version": state.config.service_version,
                "recommendations": recommendations,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": state.config.service_name,
                    "recommendations": recommendations,
                })),
            )
        }
    }
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
