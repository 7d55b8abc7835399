use anyhow::Context;
use chat_server::api::RouteGroups;
use chat_server::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside local development
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        return Err(e).context("Failed to load .env");
    }

    let cli = Cli::parse();
    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    execute_command(&cli, settings, RouteGroups::default()).await?;

    Ok(())
}
