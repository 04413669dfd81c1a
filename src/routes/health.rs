//! Health check endpoints
//!
//! Provides Kubernetes-style health probes:
//! - /health, /healthz - Liveness probe (is the service running?)
//! - /ready, /readyz - Readiness probe (is the service ready for traffic?)
//!
//! Liveness always returns 200 while the process is up. Readiness requires
//! MongoDB, except in dev mode where the service runs storage-less.

use hyper::{Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::helpers::{json_response, BoxBody};
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if service is running)
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// Operating mode
    pub mode: String,
    /// Whether MongoDB is connected
    pub storage_connected: bool,
    /// Current timestamp
    pub timestamp: String,
    /// Error message if storage is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn build_health_response(state: &AppState) -> HealthResponse {
    let storage_connected = state.mongo.is_some();

    let error = if !storage_connected && !state.args.dev_mode {
        Some("MongoDB not connected - submissions cannot be stored".to_string())
    } else {
        None
    };

    HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.args.dev_mode {
            "development".to_string()
        } else {
            "production".to_string()
        },
        storage_connected,
        timestamp: chrono::Utc::now().to_rfc3339(),
        error,
    }
}

/// Handle liveness probe (/health, /healthz)
pub fn health_check(state: Arc<AppState>) -> Response<BoxBody> {
    let response = build_health_response(&state);
    json_response(StatusCode::OK, &response)
}

/// Handle readiness probe (/ready, /readyz)
///
/// Use this endpoint for load balancer health checks.
pub fn readiness_check(state: Arc<AppState>) -> Response<BoxBody> {
    let response = build_health_response(&state);

    let is_ready = response.storage_connected || state.args.dev_mode;
    let status = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    json_response(status, &response)
}

/// Version information for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    /// Cargo package version
    pub version: &'static str,
    /// Git commit hash (short)
    pub commit: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Service name
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<BoxBody> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "intake",
    };

    json_response(StatusCode::OK, &response)
}
