//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub system: &'static str,
    pub hospital: &'static str,
    pub external_model: bool,
}

/// `GET /api/health`: liveness plus whether the remote model is in use.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
        system: config::SYSTEM_NAME,
        hospital: config::HOSPITAL_NAME,
        external_model: ctx.core.engine().uses_external_model(),
    })
}
