//! CDI Dashboard - U.S. Chronic Disease Indicators explorer
//!
//! Fetches the CDI dataset once, pivots it into a wide table and serves an
//! interactive map + bar chart dashboard over HTTP.

mod charts;
mod config;
mod dashboard;
mod data;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, DataSource};
use dashboard::AppState;
use data::{DataLoader, DataProcessor};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();

    match config::load_dotenv(None) {
        Ok(Some(path)) => info!(path = %path.display(), "loaded .env file"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable .env file"),
    }

    let config = Config::parse();
    let source = config.data_source().context("Invalid configuration")?;
    match &source {
        DataSource::Remote(remote) => info!(
            url = %remote.resource_url,
            row_limit = remote.row_limit,
            "using remote dataset"
        ),
        DataSource::File(path) => info!(path = %path.display(), "using local records file"),
    }

    let records = DataLoader::load(&source)
        .await
        .context("Failed to load dataset")?;
    let table = DataProcessor::shape(&records).context("Failed to reshape dataset")?;
    drop(records);

    dashboard::serve(AppState::new(table), config.listen_addr(), config.open).await
}
