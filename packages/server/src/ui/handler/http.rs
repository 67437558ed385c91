//! HTTP endpoint handlers.

use axum::http::StatusCode;

/// Body returned by the health check.
pub const HEALTH_BODY: &str = "Max MSP Tap Bridge OK\n";

/// Health check endpoint
///
/// Served on every path of the health listener for deployment platforms.
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_BODY)
}
