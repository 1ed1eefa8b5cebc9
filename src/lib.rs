pub mod cli;
pub mod core;
pub mod portfolio;
pub mod providers;
pub mod server;

use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Run the HTTP dashboard. `port` overrides every other port setting.
    Serve { port: Option<u16> },
    /// Build one snapshot and print it.
    Snapshot { json: bool },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = crate::core::config::AppConfig::resolve(config_path)?;
    debug!("Loaded config: {config:#?}");

    let state = server::AppState::from_config(&config)?;

    match command {
        AppCommand::Serve { port } => {
            let port = config.listen_port(port, std::env::var("PORT").ok())?;
            info!(port, "Portfolio dashboard starting...");
            server::serve(state, port).await
        }
        AppCommand::Snapshot { json } => cli::snapshot::run(&state, json).await,
    }
}
