mod search;

use anyhow::Context;
use clap::{Parser, Subcommand};
use homescan_core::AppConfig;
use homescan_realtor::{EngineConfig, RealtorClient};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "homescan")]
#[command(about = "Search realtor.com listings from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search listings in or around a location.
    Search(SearchArgs),
    /// Check that the location service is reachable.
    Ping,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Search(_) => "search",
            Commands::Ping => "ping",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.name();

    match run(cli.command).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(err) => {
            tracing::error!(command, error = %err, "command failed");
            println!("{}", serde_json::to_string_pretty(&error_payload(command, &err))?);
            std::process::exit(1);
        }
    }
}

/// Loads config, starts logging, then runs the command. Startup failures are
/// returned like command failures so they reach the same JSON payload.
async fn run(command: Commands) -> anyhow::Result<Value> {
    let config = homescan_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    let client = client_from_config(&config)?;
    match command {
        Commands::Search(args) => search::run_search(&client, args).await,
        Commands::Ping => run_ping(&client).await,
    }
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

fn client_from_config(config: &AppConfig) -> anyhow::Result<RealtorClient> {
    RealtorClient::new(EngineConfig::from(config)).context("failed to build realtor client")
}

/// Resolves a well-known location to confirm the autocomplete endpoint answers.
async fn run_ping(client: &RealtorClient) -> anyhow::Result<Value> {
    let resolved = client
        .resolve_location("New York, NY", homescan_core::ListingType::ForSale)
        .await?;
    Ok(json!({ "status": "ok", "resolved": resolved.is_some() }))
}

/// Structured error body printed in place of results.
fn error_payload(command: &str, err: &anyhow::Error) -> Value {
    json!({
        "error": format!("{command} failed"),
        "details": format!("{err:#}"),
    })
}
