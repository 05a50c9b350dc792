mod lookup;

use std::str::FromStr;

use clap::{Parser, Subcommand};
use storefinder_core::StoreType;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder-cli")]
#[command(about = "Find stores near a Brazilian postal code")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Stores near a postal code, classified and priced
    Nearby {
        /// Postal code (CEP), with or without punctuation
        cep: String,
        /// Walk-in radius in km; defaults to `STOREFINDER_PDV_RADIUS_KM`
        #[arg(long)]
        radius: Option<f64>,
        /// Keep only PDV or LOJA results
        #[arg(long = "type", value_parser = StoreType::from_str)]
        store_type: Option<StoreType>,
    },
    /// List the store directory
    Stores {
        /// Two-letter state code (UF)
        #[arg(long)]
        state: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let service = storefinder_providers::build_store_service(&config)?;

    match cli.command {
        Commands::Nearby {
            cep,
            radius,
            store_type,
        } => lookup::run_nearby(&service, &cep, radius, store_type).await,
        Commands::Stores { state } => lookup::run_stores(&service, state.as_deref()).await,
    }
}
