//! Error response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The single JSON error body: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "message": "API endpoint not found" }))]
pub struct ErrorResponse {
    /// Human readable description of the failure
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
