//! candela - forex tick-to-candle analyzer service.

use anyhow::{Context, Result};
use candela_lib::prelude::*;
use candela_lib::ClientConfig;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let generator = GeneratorClient::new(ClientConfig::new(&cli.generator_url))
        .context("Failed to create generator client")?;
    let history = HistoryClient::new(ClientConfig::new(&cli.history_url))
        .context("Failed to create history client")?;
    let repo = Arc::new(InMemoryRepo::with_retention(cli.repo_retain));

    let orchestrator = CycleOrchestrator::new(
        cli.pipeline_config(),
        Arc::new(generator),
        Arc::new(history),
        repo,
    )
    .context("Invalid configuration")?;

    info!(
        pairs = ?cli.currency_pairs.iter().map(CurrencyPair::as_str).collect::<Vec<_>>(),
        time_frames = ?cli.time_frames.iter().map(Timeframe::to_string).collect::<Vec<_>>(),
        generator = %cli.generator_url,
        history = %cli.history_url,
        "starting analyzer"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("shutdown requested, draining current cycle");
                    shutdown.cancel();
                }
                Err(e) => error!(error = %e, "failed to listen for Ctrl-C"),
            }
        }
    });

    orchestrator.run(shutdown).await;
    Ok(())
}
