//! Price data collaborators.
//!
//! The engine itself never fetches data. This module defines the seam it is fed
//! through: a [`PriceProvider`] trait, the explicit [`ProviderConfig`] a
//! provider is built from, a provider reading JSON snapshots from disk, and a
//! [`PriceCache`] keyed by symbol, date range and provider.

mod cache;
mod file;

pub use cache::{CacheKey, PriceCache};
pub use file::JsonFileProvider;

use crate::types::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Errors raised while retrieving historical prices.
#[derive(Debug, thiserror::Error)]
pub enum DataFetchError {
    #[error("No price data for {0}")]
    NotFound(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("No prices for {ticker} between {start} and {end}")]
    Empty {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid price series for {ticker}: {reason}")]
    InvalidSeries { ticker: String, reason: String },

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Source of historical daily closes.
pub trait PriceProvider {
    /// Provider identifier, part of every cache key.
    fn name(&self) -> &str;

    /// Daily closes for `ticker` with `start <= date <= end`.
    fn historical_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataFetchError>;
}

/// Connection settings handed to a provider at construction.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "fmp")
    pub provider: String,
    /// Provider credential; never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Directory holding `<TICKER>.json` price snapshots
    pub data_dir: PathBuf,
}

impl ProviderConfig {
    /// Default snapshot directory: `~/.quantdash/prices`.
    pub fn default_data_dir() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".quantdash/prices"))
            .unwrap_or_else(|| PathBuf::from("prices"))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "fmp".to_string(),
            api_key: None,
            data_dir: Self::default_data_dir(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("data_dir", &self.data_dir)
            .finish()
    }
}
