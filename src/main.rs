use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use sui_roundtrip_arb::{
    arbitrage::RoundTripEvaluator,
    bot::{ArbitrageBot, BotController, TokenScanner},
    config::{BotMode, Config},
    dex::{HopClient, QuoteProvider},
    signer::{Ed25519Signer, TransactionSigner},
};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting Sui Round Trip Arbitrage Bot");

    // Load configuration
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    match config.bot.mode {
        BotMode::Scan => run_scan(&config).await?,
        BotMode::Monitor => run_monitor(&config).await?,
    }

    info!("Sui Round Trip Arbitrage Bot shutdown complete");
    Ok(())
}

async fn run_scan(config: &Config) -> Result<()> {
    let quoter: Arc<dyn QuoteProvider> = Arc::new(HopClient::new(
        config.quoter.clone(),
        Duration::from_millis(config.network.request_timeout_ms),
    )?);
    let evaluator = RoundTripEvaluator::new(
        quoter.clone(),
        config.arbitrage.ratio_decimal_places,
        config.tokens.token_a_decimals,
    );

    let entries = TokenScanner::new(quoter, evaluator)
        .scan(config.arbitrage.amount_in()?, &config.tokens.token_a)
        .await?;

    let failed = entries.iter().filter(|e| e.result.is_err()).count();
    info!("Scan complete: {} tokens, {} failed", entries.len(), failed);
    Ok(())
}

async fn run_monitor(config: &Config) -> Result<()> {
    let signer = load_signer()?;
    let controller = Arc::new(BotController::new());

    let mut bot = ArbitrageBot::from_config(config, signer, controller.event_sender())
        .await
        .map_err(|e| {
            error!("Failed to initialize bot: {}", e);
            e
        })?;

    // Handle graceful shutdown
    let stopper = controller.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                stopper.stop();
            }
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
    });

    if let Err(e) = bot.run(controller.shutdown_signal()).await {
        error!("Bot error: {}", e);
    }

    info!("\n{}", bot.metrics().generate_report());
    match bot.metrics().export_json() {
        Ok(json) => debug!("Final metrics: {}", json),
        Err(e) => warn!("{}", e),
    }
    Ok(())
}

fn load_signer() -> Result<Option<Arc<dyn TransactionSigner>>> {
    match std::env::var("SUI_PRIVATE_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            let signer = Ed25519Signer::from_encoded(key.trim())
                .context("SUI_PRIVATE_KEY is not a valid ed25519 key")?;
            info!("Loaded signer for {}", signer.address());
            Ok(Some(Arc::new(signer)))
        }
        _ => Ok(None),
    }
}
