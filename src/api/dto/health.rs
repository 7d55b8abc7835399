//! Health check DTOs for API responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse service status reported by the health endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// Serving requests
    Ok,
    /// A dependency is down
    Unavailable,
}

/// Health check response structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "status": "OK", "message": "Server is running" }))]
pub struct HealthResponse {
    /// Overall status
    pub status: HealthStatus,
    /// Short human readable detail
    #[schema(example = "Server is running")]
    pub message: String,
}

impl HealthResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Ok,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unavailable,
            message: message.into(),
        }
    }
}
