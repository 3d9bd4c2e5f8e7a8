use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when a configured model fell back at startup.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub classifier: &'static str,
    pub explainer: &'static str,
    pub storage: &'static str,
}

/// GET /health -- reports which pipeline variants are active.
async fn health_check(State(state): State<AppState>) -> Json<DataResponse<HealthResponse>> {
    let status = state.service.status();

    Json(DataResponse {
        data: HealthResponse {
            status: if status.degraded { "degraded" } else { "ok" },
            version: env!("CARGO_PKG_VERSION"),
            classifier: status.classifier,
            explainer: status.explainer,
            storage: status.storage,
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
