//! HTTP server lifecycle: startup, serving and graceful shutdown.

use std::future::Future;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::{RouteGroups, create_router};
use crate::config::Settings;
use crate::db::connect_in_background;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
    routes: RouteGroups,
}

impl Server {
    /// Create a new server with the given settings and empty route groups
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            routes: RouteGroups::default(),
        }
    }

    /// Mount these routers under `/api/auth` and `/api/messages`
    pub fn with_routes(mut self, routes: RouteGroups) -> Self {
        self.routes = routes;
        self
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    ///
    /// The database is contacted only after the listener is accepting
    /// connections, and a failure there is logged without stopping the server.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self { settings, routes } = self;
        log_configuration(&settings);

        let state = AppState::from_settings(&settings);
        if let Some(spa) = &state.spa
            && !spa.index_path().is_file()
        {
            tracing::warn!(
                index = %spa.index_path().display(),
                "Frontend entry point is missing; client routes will fail until it is built"
            );
        }

        let router = create_router(&settings, state.clone(), routes);

        let port = listener.local_addr()?.port();
        tracing::info!("Server is running on PORT: {}", port);
        tracing::info!("Environment: {}", settings.environment);

        if let Some(pool) = state.db_pool {
            connect_in_background(pool);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

fn log_configuration(settings: &Settings) {
    tracing::info!(
        app_name = %settings.application.name,
        app_version = %settings.application.version,
        environment = %settings.environment,
        "Application starting"
    );

    tracing::info!(
        host = %settings.server.host,
        port = %settings.server.port,
        request_timeout = %settings.server.request_timeout,
        body_limit = %settings.server.body_limit,
        "Server configuration loaded"
    );

    tracing::info!(
        origins = ?settings.cors_origins(),
        allow_credentials = %settings.cors.allow_credentials,
        "CORS configuration loaded"
    );

    if settings.serves_static() {
        tracing::info!(
            dist_dir = %settings.frontend.dist_path().display(),
            "Serving frontend from dist directory"
        );
    }

    // URL omitted, it may carry credentials
    tracing::info!(
        configured = %settings.database.is_configured(),
        max_connections = %settings.database.max_connections,
        "Database configuration loaded"
    );
}

/// Completes on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
