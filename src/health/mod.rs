//! Liveness endpoint.
//!
//! `GET /health` reports that the process is up. It touches neither the
//! filesystem nor any other state.

use axum::Json;
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}
