//! Configuration Module
//! Command-line flags with environment fallbacks, validated once at startup.

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_ROW_LIMIT: usize = 1_500_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set (pass --{1} or set the environment variable)")]
    Missing(&'static str, &'static str),
    #[error("Invalid DATA_URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("DATA_URL '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("Invalid DATA_SET '{0}': expected a Socrata identifier like 'g4ie-h725'")]
    InvalidDataset(String),
}

/// Command-line interface. Every remote setting can also come from the
/// environment, so `DATA_URL=... DATA_SET=... APP_TOKEN=... cdi-dashboard`
/// works without flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "cdi-dashboard", version, about = "U.S. Chronic Disease Indicators dashboard")]
pub struct Config {
    /// Socrata domain or base URL (e.g. data.cdc.gov)
    #[arg(long, env = "DATA_URL")]
    pub data_url: Option<String>,

    /// Dataset identifier (e.g. g4ie-h725)
    #[arg(long, env = "DATA_SET")]
    pub data_set: Option<String>,

    /// Application token sent with the fetch
    #[arg(long, env = "APP_TOKEN", hide_env_values = true)]
    pub app_token: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Maximum number of rows requested from the API
    #[arg(long, default_value_t = DEFAULT_ROW_LIMIT)]
    pub row_limit: usize,

    /// Timeout for the dataset fetch, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Load records from a local JSON dump instead of the API
    #[arg(long, env = "RECORDS_FILE")]
    pub records_file: Option<PathBuf>,

    /// Open the dashboard in the default browser once the server is up
    #[arg(long)]
    pub open: bool,
}

/// Settings for the one remote fetch.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    pub resource_url: Url,
    pub app_token: String,
    pub row_limit: usize,
    pub timeout: Duration,
}

/// Where the Raw Records come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Remote(RemoteSource),
    File(PathBuf),
}

impl Config {
    /// Resolve the data source. A records file wins over the remote settings;
    /// otherwise all three remote values must be present and valid.
    pub fn data_source(&self) -> Result<DataSource, ConfigError> {
        if let Some(path) = &self.records_file {
            return Ok(DataSource::File(path.clone()));
        }

        let data_url = required(&self.data_url, "DATA_URL", "data-url")?;
        let data_set = required(&self.data_set, "DATA_SET", "data-set")?;
        let app_token = required(&self.app_token, "APP_TOKEN", "app-token")?;

        Ok(DataSource::Remote(RemoteSource {
            resource_url: resource_url(data_url, data_set)?,
            app_token: app_token.to_string(),
            row_limit: self.row_limit,
            timeout: Duration::from_secs(self.timeout_secs),
        }))
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Load a `.env` file into the process environment so the `env` fallbacks
/// above see its values. `None` searches the working directory and its
/// parents. Variables already set in the environment win. A missing file is
/// not an error.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    let loaded = match path {
        Some(p) => dotenvy::from_path(p).map(|()| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
    flag: &'static str,
) -> Result<&'a str, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name, flag)),
    }
}

/// Build `<base>/resource/<dataset>.json`. A bare domain gets `https://`.
pub fn resource_url(data_url: &str, data_set: &str) -> Result<Url, ConfigError> {
    if !is_dataset_id(data_set) {
        return Err(ConfigError::InvalidDataset(data_set.to_string()));
    }

    let base = if data_url.contains("://") {
        data_url.to_string()
    } else {
        format!("https://{data_url}")
    };
    let mut url = Url::parse(&base).map_err(|e| ConfigError::InvalidUrl(data_url.to_string(), e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(data_url.to_string()));
    }

    let path = format!("{}/resource/{}.json", url.path().trim_end_matches('/'), data_set);
    url.set_path(&path);
    Ok(url)
}

/// Socrata "four-by-four" identifier: two groups of four alphanumerics.
fn is_dataset_id(id: &str) -> bool {
    let mut parts = id.split('-');
    let valid = |part: Option<&str>| {
        part.is_some_and(|p| p.len() == 4 && p.chars().all(|c| c.is_ascii_alphanumeric()))
    };
    valid(parts.next()) && valid(parts.next()) && parts.next().is_none()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
