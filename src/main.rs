use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use daylog::commands;
use daylog::config::Config;
use daylog::jira::JiraClient;

#[derive(Parser)]
#[command(name = "daylog")]
#[command(about = "Files your daily Jira activity as a work-log sub-task")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the previous working day's activity and file it
    Log {
        /// Day to report on (YYYY-MM-DD); defaults to the previous working day
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Print the rendered report without filing anything
    Preview {
        /// Day to report on (YYYY-MM-DD); defaults to the previous working day
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the authenticated tracker user
    Whoami,
}

fn main() {
    // A missing .env is fine; plain environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    info!("connecting to tracker at {}", config.server);
    let client = JiraClient::new(&config)?;

    match cli.command {
        Commands::Log { date } => commands::log::run(&client, &config, date.as_deref()),
        Commands::Preview { date } => commands::preview::run(&client, &config, date.as_deref()),
        Commands::Whoami => commands::whoami::run(&client),
    }
}
