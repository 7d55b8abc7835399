//! Shared state handed to every handler.

use crate::api::handlers::fallback::SpaAssets;
use crate::config::{Environment, Settings};
use crate::db::{self, AsyncDbPool};

/// Application state used with Axum's `State` extractor.
///
/// Cloning is cheap: `SpaAssets` holds a path-based service and the pool is
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Environment the server was started in
    pub environment: Environment,
    /// Built frontend, when static serving is enabled
    pub spa: Option<SpaAssets>,
    /// Connection pool, when a database is configured
    pub db_pool: Option<AsyncDbPool>,
}

impl AppState {
    pub fn new(
        environment: Environment,
        spa: Option<SpaAssets>,
        db_pool: Option<AsyncDbPool>,
    ) -> Self {
        Self {
            environment,
            spa,
            db_pool,
        }
    }

    /// Resolve static serving and the database pool from settings.
    ///
    /// Does not connect to the database.
    pub fn from_settings(settings: &Settings) -> Self {
        let spa = settings
            .serves_static()
            .then(|| SpaAssets::from_config(&settings.frontend));

        Self::new(settings.environment, spa, db::build_pool(&settings.database))
    }
}
