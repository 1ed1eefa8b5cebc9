use anyhow::Result;
use clap::{Parser, Subcommand};
use myfolio::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve the dashboard and JSON API (default)
    Serve {
        /// Listening port, overrides PORT and the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch the portfolio once and print it
    Snapshot {
        /// Print the raw JSON snapshot instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Setup => {
            let result = myfolio::cli::setup::setup();
            if let Err(e) = &result {
                tracing::error!(error = %e, "Setup failed");
            }
            return result;
        }
        Commands::Serve { port } => myfolio::AppCommand::Serve { port },
        Commands::Snapshot { json } => myfolio::AppCommand::Snapshot { json },
    };

    let result = myfolio::run_command(command, cli.config_path.as_deref()).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
