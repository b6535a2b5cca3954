//! Quantdash Core - indicator and portfolio metrics engine.
//!
//! This crate provides the computation core behind the quantdash equity dashboard:
//!
//! - **Technical indicators**: SMA, Bollinger Bands, RSI
//! - **Portfolio simulation**: weighted daily returns and cumulative returns
//! - **Risk metrics**: annualized return and volatility, Sharpe ratio, historical VaR
//! - **Data collaborators**: price provider trait, local snapshot provider, keyed cache
//!
//! Every engine function is pure: it takes caller-owned input and returns a new
//! value object. Missing values (not enough history for a window) are `None`,
//! never a fabricated number.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use quantdash_core::{moving_averages, PricePoint, PriceSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let points = [100.0, 102.0, 101.0, 105.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &close)| PricePoint::new(start + chrono::Days::new(i as u64), close))
//!     .collect();
//! let series = PriceSeries::new(points).unwrap();
//!
//! let set = moving_averages(&series, &[3]).unwrap();
//! let ma = set.get("MA_3").unwrap();
//! assert_eq!(ma[1], None);
//! assert_eq!(ma[2], Some(101.0));
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod indicators;
pub mod portfolio;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, IndicatorSet, PortfolioSpec, PricePoint, PriceSeries, ReturnsSeries, RiskMetrics,
    ValueAtRisk,
};

// Re-export main functionality
pub use analysis::{
    market_overview, AnalysisOptions, IndexPerformance, PortfolioAnalysis, TickerAnalysis,
    DEFAULT_VAR_CONFIDENCE,
};
pub use config::DashboardConfig;
pub use data::{CacheKey, DataFetchError, JsonFileProvider, PriceCache, PriceProvider, ProviderConfig};
pub use indicators::{
    bollinger_bands, bollinger_series, moving_averages, rsi, rsi_series, rsi_zones, sma,
    BollingerBands, RsiZone,
};
pub use portfolio::{
    annualized_return, annualized_volatility, calculate_risk_metrics, cumulative_returns,
    pct_change, portfolio_returns, series_returns, sharpe_ratio, value_at_risk, weighted_returns,
    PortfolioReturns, TRADING_DAYS_PER_YEAR,
};

/// Error types for quantdash-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Misaligned series for {ticker}: dates do not match the portfolio index")]
    MisalignedSeries { ticker: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid portfolio: {0}")]
    InvalidPortfolio(String),

    #[error("Invalid confidence level {0}: must be strictly between 0 and 1")]
    InvalidConfidence(f64),

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Column {name} has {actual} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Data fetch error: {0}")]
    DataFetch(#[from] DataFetchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for quantdash-core operations.
pub type Result<T> = std::result::Result<T, Error>;
