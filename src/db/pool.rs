//! Async database connection pool implementation.
//!
//! Uses the bb8 pool manager with diesel_async for PostgreSQL connections.

use std::time::{Duration, Instant};

use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tokio::task::JoinHandle;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap.
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Build the pool described by `config` without opening a connection.
///
/// Returns `None` when no database URL is configured. Must be called from
/// within a Tokio runtime.
pub fn build_pool(config: &DatabaseConfig) -> Option<AsyncDbPool> {
    if !config.is_configured() {
        return None;
    }

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.clone());
    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build_unchecked(manager);

    Some(pool)
}

/// Check out a connection and run `SELECT 1`.
///
/// Returns the round-trip time. Both checkout and query failures are reported
/// as `ServiceUnavailable` with a "Database unavailable: ..." message.
pub async fn check_connection(pool: &AsyncDbPool) -> AppResult<Duration> {
    let start = Instant::now();

    let mut conn = pool.get().await.map_err(|e| AppError::ServiceUnavailable {
        message: format!("Database unavailable: {}", e),
    })?;

    diesel::sql_query("SELECT 1")
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::ServiceUnavailable {
            message: format!("Database unavailable: {}", e),
        })?;

    Ok(start.elapsed())
}

/// Verify connectivity once the server is listening.
///
/// Failures are logged and never stop the server; requests that need the
/// database will fail on their own until it becomes reachable.
pub fn connect_in_background(pool: AsyncDbPool) -> JoinHandle<()> {
    tokio::spawn(async move {
        match check_connection(&pool).await {
            Ok(elapsed) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                "Database connected"
            ),
            Err(e) => tracing::error!(error = %e, "Database connection failed"),
        }
    })
}
