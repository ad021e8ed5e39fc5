//! Health check endpoints
//!
//! /health, /healthz - liveness probe, always 200 while the process runs
//! /version          - build information for deployment verification
//!
//! In dev mode the service can run without MongoDB; the health body reports
//! `database.connected: false` so callers can tell the difference.

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::{json_response, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    /// 'online' or 'degraded' (running without a database)
    pub status: &'static str,
    pub version: &'static str,
    pub mode: &'static str,
    pub database: DatabaseHealth,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
}

/// Handle liveness probe (/health, /healthz)
pub fn health_check(state: Arc<AppState>) -> Response<BoxBody> {
    let connected = state.mongo.is_some();

    let response = HealthResponse {
        healthy: true,
        status: if connected { "online" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        database: DatabaseHealth { connected },
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    json_response(StatusCode::OK, &response)
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            service: "lectern",
        },
    )
}
