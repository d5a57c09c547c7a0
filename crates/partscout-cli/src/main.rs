mod auth;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::auth::AuthCommands;

#[derive(Debug, Parser)]
#[command(name = "partscout")]
#[command(about = "Search auto parts across suppliers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stream a search and print the grouped offers (Ctrl-C aborts)
    Search {
        /// Article number to search for
        term: String,

        /// Add the cheapest in-stock offer of a group to the cart; repeat to
        /// add more than one unit
        #[arg(long = "add", value_name = "GROUP_KEY")]
        add: Vec<String>,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Account management
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` must be loaded before parsing so clap's `env` fallbacks see it.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = partscout_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search { term, add, json } => {
            search::run_search(&config, &term, &add, json).await?;
        }
        Commands::Auth { command } => auth::run_auth(&config, command).await?,
    }

    Ok(())
}
