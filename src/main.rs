use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod analysis;
mod api;
mod config;
mod error;
mod events;
mod features;
mod momentum;
mod report;

use analysis::HistoricalStats;
use api::AppState;
use config::Config;
use momentum::{LinearPredictor, ModelArtifacts, MomentumPredictor, RemotePredictor};
use report::ReportEngine;

/// Pick the momentum model: a configured model server wins, otherwise the
/// artifacts' own linear head.
fn build_predictor(
    config: &Config,
    artifacts: &ModelArtifacts,
) -> Result<Box<dyn MomentumPredictor>> {
    if let Some(url) = &config.predictor_url {
        info!("Momentum predictor: model server at {}", url);
        let timeout = Duration::from_secs(config.predictor_timeout_secs);
        return Ok(Box::new(RemotePredictor::new(url, timeout)?));
    }
    let head = artifacts
        .linear_head
        .clone()
        .context("No PREDICTOR_URL configured and the model artifacts carry no linear_head")?;
    let width = config.seq_length * artifacts.ball.width()
        + artifacts.cumulative.width()
        + artifacts.context.width()
        + artifacts.chase.width();
    info!("Momentum predictor: local linear head ({} features)", width);
    Ok(Box::new(LinearPredictor::new(head, width)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Read-only for the rest of the process
    let artifacts = ModelArtifacts::load(&config.model_artifacts)?;
    let historical = HistoricalStats::load(&config.historical_csv)?;
    let predictor = build_predictor(&config, &artifacts)?;
    let engine = Arc::new(ReportEngine::new(
        historical,
        artifacts,
        predictor,
        config.seq_length,
        config.total_balls,
    ));

    if let Some(path) = &config.report_csv {
        let csv_text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read live CSV: {}", path.display()))?;
        let report = engine.generate(&csv_text).await?;
        println!("{}", report);
        return Ok(());
    }

    let app = api::router(AppState { engine });
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Report API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
