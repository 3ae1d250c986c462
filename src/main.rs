use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use position_sim::config::Settings;
use position_sim::service::SimulationService;
use position_sim::sink::{QuestDbClient, POSITIONS_TABLE_DDL};

/// Synthetic trading-position feed for QuestDB load testing
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Symbols to simulate (comma separated), overriding the config file
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Sink base URL, e.g. http://localhost:9000
    #[arg(long)]
    sink_url: Option<String>,

    /// Buy/sell pairs per round for every symbol
    #[arg(long)]
    positions_per_round: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dotenv_loaded = dotenv::dotenv().is_ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("position_sim=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    if !dotenv_loaded {
        warn!("⚠️  No .env file found, using environment variables");
    }

    info!("🎯 Starting Position Feed Simulation");

    let mut settings = Settings::new()?;
    if !args.symbols.is_empty() {
        settings.symbols = args.symbols;
    }
    if let Some(url) = args.sink_url {
        settings.sink.base_url = url;
    }
    if let Some(n) = args.positions_per_round {
        settings.simulation.positions_per_round = n;
    }
    info!("📋 Configuration loaded successfully");

    info!("📊 Symbols: {:?}", settings.symbols);
    info!(
        "🔁 Positions per round: {} buys + {} sells per symbol",
        settings.simulation.positions_per_round, settings.simulation.positions_per_round
    );

    let client = QuestDbClient::new(&settings.sink);
    info!("📡 Target sink: {}", client.exec_url());
    info!("Make sure the 'positions' table exists before starting ingestion:");
    info!("{}", POSITIONS_TABLE_DDL);

    let service = SimulationService::new(
        Arc::new(client),
        settings.symbols.clone(),
        settings.simulation.clone(),
    );

    // Forward Ctrl+C to the service so producers stop cooperatively
    let shutdown_tx = service.get_shutdown_tx();
    tokio::spawn(async move {
        signal::ctrl_c().await.expect("Failed to listen for ctrl-c");
        info!("Received Ctrl+C signal, forwarding to service");
        let _ = shutdown_tx.send(());
    });

    info!(
        "🎯 Starting position feed for {} symbols",
        settings.symbols.len()
    );

    match service.start().await {
        Ok(()) => {
            info!("✅ Simulation stopped gracefully");
        }
        Err(e) => {
            tracing::error!("❌ Service error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
