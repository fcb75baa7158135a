//! CampusDesk CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config & store directory
//! - `serve`   — Start the HTTP gateway
//! - `ask`     — Resolve a single question from the terminal
//! - `kb`      — Curate knowledge base entries

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "campusdesk",
    about = "CampusDesk — student helpdesk query resolution",
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
    /// Initialize configuration and store directory
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve a single question against the knowledge base
    Ask {
        /// The question to resolve
        question: String,

        /// Requester email recorded on escalation
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Curate knowledge base entries
    Kb {
        #[command(subcommand)]
        command: commands::kb::KbCommands,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { question, email } => commands::ask::run(question, email).await?,
        Commands::Kb { command } => commands::kb::run(command).await?,
    }

    Ok(())
}
