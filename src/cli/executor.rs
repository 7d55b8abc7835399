//! Command executor for dispatching CLI commands

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::api::RouteGroups;
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// No subcommand behaves like `serve`. `routes` are mounted when the
/// server actually starts.
///
/// # Errors
/// Returns argument validation errors and errors from command handlers
pub async fn execute_command(cli: &Cli, settings: Settings, routes: RouteGroups) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings)
                .with_routes(routes)
                .execute(*dry_run)
                .await
        }
        None => {
            ServeCommandHandler::new(settings)
                .with_routes(routes)
                .execute(false)
                .await
        }
    }
}

fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    if let Some(Commands::Serve {
        host: Some(host),
        port: Some(port),
        ..
    }) = &cli.command
        && *port < 1024
        && host == "0.0.0.0"
    {
        tracing::warn!(port = %port, "Binding to 0.0.0.0 on a privileged port requires root privileges");
    }

    Ok(())
}
