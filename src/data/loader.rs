//! Dataset Loader Module
//! Fetches Raw Records from the Socrata resource endpoint, or reads a local
//! JSON dump of the same payload.

use crate::config::{DataSource, RemoteSource};
use crate::data::RawRecord;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

/// Header Socrata reads the application token from.
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads the full dataset once at startup.
pub struct DataLoader;

impl DataLoader {
    /// Load records from whichever source the configuration selected.
    pub async fn load(source: &DataSource) -> Result<Vec<RawRecord>, LoaderError> {
        match source {
            DataSource::Remote(remote) => Self::fetch(remote).await,
            DataSource::File(path) => Self::load_file(path),
        }
    }

    /// One read-only call to `<resource>.json?$limit=N`, bounded by the
    /// configured timeout. No retry: a failure here aborts startup.
    pub async fn fetch(remote: &RemoteSource) -> Result<Vec<RawRecord>, LoaderError> {
        let client = reqwest::Client::builder().timeout(remote.timeout).build()?;

        info!(
            url = %remote.resource_url,
            limit = remote.row_limit,
            timeout_secs = remote.timeout.as_secs(),
            "fetching dataset"
        );
        let started = Instant::now();

        let records = client
            .get(remote.resource_url.clone())
            .query(&[("$limit", remote.row_limit.to_string())])
            .header(APP_TOKEN_HEADER, remote.app_token.as_str())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RawRecord>>()
            .await?;

        info!(
            records = records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset fetched"
        );
        Ok(records)
    }

    /// Read a JSON array of records, the same shape the API returns.
    pub fn load_file(path: &Path) -> Result<Vec<RawRecord>, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<RawRecord> = serde_json::from_slice(&bytes)?;
        info!(path = %path.display(), records = records.len(), "records loaded from file");
        Ok(records)
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
