use anyhow::Result;
use clap::{Parser, Subcommand};
use beacon::config::Config;
use beacon::storage;
use beacon::tracking::Aggregator;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beacon-admin")]
#[command(about = "Beacon analytics reporting CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the number of distinct visitors
    Uniques {
        /// Client site identifier (e.g. example.com)
        client_id: String,
    },
    /// Print the top referers
    Referers {
        /// Client site identifier (e.g. example.com)
        client_id: String,
    },
    /// Print the top pages
    Pages {
        /// Client site identifier (e.g. example.com)
        client_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = storage::connect(&config.database).await?;
    let aggregator = Aggregator::new(store, config.store_timeout());

    let output = match cli.command {
        Commands::Uniques { client_id } => {
            let uniques = aggregator.uniques(&client_id).await?;
            serde_json::json!({ "uniques": uniques })
        }
        Commands::Referers { client_id } => {
            serde_json::to_value(aggregator.top_referers(&client_id).await?)?
        }
        Commands::Pages { client_id } => {
            serde_json::to_value(aggregator.top_pages(&client_id).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
