//! Switchyard CLI: the main entry point.
//!
//! Commands:
//! - `chat`: Interactive chat or single-message mode
//! - `schemas`: Print the tool schemas the agents advertise
//! - `init`: Write a default config file (`--seed-db` creates the demo database)

use clap::{Parser, Subcommand};
use switchyard::commands;

#[derive(Parser)]
#[command(
    name = "switchyard",
    about = "Switchyard: multi-agent student assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print every tool schema as JSON
    Schemas,

    /// Write a default config file to ~/.switchyard/config.toml
    Init {
        /// Also create the demo university database at the configured path
        #[arg(long)]
        seed_db: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // .env is optional
    let _ = dotenvy::dotenv();

    // Initialize tracing on stderr; stdout carries the conversation
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message, cli.verbose).await?,
        Commands::Schemas => commands::schemas::run().await?,
        Commands::Init { seed_db } => commands::init::run(seed_db).await?,
    }

    Ok(())
}
