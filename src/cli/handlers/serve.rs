//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::api::RouteGroups;
use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
    routes: RouteGroups,
}

impl ServeCommandHandler {
    /// Create a new serve command handler with empty route groups
    pub fn new(config: Settings) -> Self {
        Self {
            config,
            routes: RouteGroups::default(),
        }
    }

    /// Mount these routers under `/api/auth` and `/api/messages`
    pub fn with_routes(mut self, routes: RouteGroups) -> Self {
        self.routes = routes;
        self
    }

    /// Execute the serve command
    ///
    /// With `dry_run` the configuration is validated and summarised;
    /// otherwise the server runs until a shutdown signal arrives.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Bind or server runtime errors
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config)
            .with_routes(self.routes)
            .run()
            .await?;
        Ok(())
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        for line in self.dry_run_report() {
            println!("✓ {}", line);
        }
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// What the server would do with the current configuration
    pub fn dry_run_report(&self) -> Vec<String> {
        let config = &self.config;
        let origins = config.cors_origins();

        let cors = if origins.is_empty() {
            "CORS origins: none".to_string()
        } else {
            format!("CORS origins: {}", origins.join(", "))
        };

        let frontend = if config.serves_static() {
            format!(
                "Static frontend: {} (fallback {})",
                config.frontend.dist_path().display(),
                config.frontend.index_path().display()
            )
        } else {
            "Static frontend: disabled".to_string()
        };

        let database = if config.database.is_configured() {
            "Database: configured"
        } else {
            "Database: not configured"
        };

        vec![
            "Configuration is valid".to_string(),
            format!("Environment: {}", config.environment),
            format!("Server would bind to: {}", config.server.address()),
            cors,
            frontend,
            database.to_string(),
        ]
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorsConfig, Environment};

    #[test]
    fn test_serve_handler_new() {
        let config = Settings::default();
        let handler = ServeCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let result = ServeCommandHandler::new(Settings::default())
            .execute(true)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = Settings::default();
        config.server.port = 0;

        let result = ServeCommandHandler::new(config).execute(true).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_dry_run_report_development() {
        let report = ServeCommandHandler::new(Settings::default()).dry_run_report();

        assert!(report.contains(&"Environment: development".to_string()));
        assert!(report.contains(&"Server would bind to: 0.0.0.0:5001".to_string()));
        assert!(report.contains(&"CORS origins: http://localhost:5173".to_string()));
        assert!(report.contains(&"Static frontend: disabled".to_string()));
        assert!(report.contains(&"Database: not configured".to_string()));
    }

    #[test]
    fn test_dry_run_report_production() {
        let config = Settings {
            environment: Environment::Production,
            cors: CorsConfig {
                client_url: "https://chat.example.com/".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = ServeCommandHandler::new(config).dry_run_report();

        assert!(report.contains(&"CORS origins: https://chat.example.com".to_string()));
        assert!(report.iter().any(|line| line.starts_with("Static frontend: ")
            && line.contains("index.html")));
    }
}
