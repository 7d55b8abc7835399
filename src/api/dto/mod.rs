//! Data transfer objects shared by every endpoint.

mod error;
mod health;

pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
