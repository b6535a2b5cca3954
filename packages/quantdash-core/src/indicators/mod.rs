//! Technical indicators for the price dashboard.
//!
//! This module provides the indicators charted alongside the closing price:
//!
//! - **SMA**: Simple Moving Average, one `MA_<window>` column per window
//! - **Bollinger Bands**: rolling mean with sample standard deviation bands
//! - **RSI**: Relative Strength Index with exponentially weighted averages
//!
//! Slice-level functions return one `Option<f64>` per input position; the
//! `*_series` and `moving_averages` helpers wrap them into an [`IndicatorSet`].

mod ewm;
mod rsi;
mod sma;

pub use ewm::ewm_mean;
pub use rsi::{
    rsi, rsi_series, rsi_zones, RsiZone, DEFAULT_RSI_PERIOD, RSI_OVERBOUGHT, RSI_OVERSOLD,
};
pub use sma::{rolling_std, sma};

use crate::types::{IndicatorSet, PriceSeries};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Moving average windows offered by the dashboard.
pub const MA_WINDOW_CHOICES: [usize; 6] = [5, 10, 20, 50, 100, 200];

/// Moving average windows selected by default.
pub const DEFAULT_MA_WINDOWS: [usize; 2] = [20, 50];

/// Default Bollinger lookback.
pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;

/// Default Bollinger band width in standard deviations.
pub const DEFAULT_BOLLINGER_NUM_STD: f64 = 2.0;

/// Column name for a moving average window, e.g. `MA_20`.
pub fn ma_column(window: usize) -> String {
    format!("MA_{}", window)
}

/// Calculate one moving average column per requested window.
///
/// Windows longer than the series produce an all-`None` column.
///
/// # Errors
///
/// `Error::InvalidWindow` if any window is zero.
pub fn moving_averages(series: &PriceSeries, windows: &[usize]) -> Result<IndicatorSet> {
    let closes = series.closes();
    let mut set = IndicatorSet::new(series.dates());

    for &window in windows {
        set.insert(ma_column(window), sma(&closes, window)?)?;
    }

    Ok(set)
}

/// Bollinger Bands result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BollingerBands {
    /// Middle band (SMA)
    pub middle: Vec<Option<f64>>,
    /// Rolling sample standard deviation
    pub std: Vec<Option<f64>>,
    /// Upper band (middle + num_std * std)
    pub upper: Vec<Option<f64>>,
    /// Lower band (middle - num_std * std)
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    /// Convert into `MA`, `STD`, `Upper` and `Lower` columns over `series` dates.
    pub fn into_indicator_set(self, series: &PriceSeries) -> Result<IndicatorSet> {
        let mut set = IndicatorSet::new(series.dates());
        set.insert("MA", self.middle)?;
        set.insert("STD", self.std)?;
        set.insert("Upper", self.upper)?;
        set.insert("Lower", self.lower)?;
        Ok(set)
    }
}

/// Calculate Bollinger Bands.
///
/// # Arguments
///
/// * `data` - Price series
/// * `period` - Lookback period (typically 20)
/// * `num_std` - Number of standard deviations (typically 2.0)
///
/// # Returns
///
/// BollingerBands with middle, std, upper, and lower bands. Where the
/// standard deviation is undefined the upper and lower bands are `None` too.
pub fn bollinger_bands(data: &[f64], period: usize, num_std: f64) -> Result<BollingerBands> {
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "band width must be a non-negative number of standard deviations, got {}",
            num_std
        )));
    }

    let middle = sma(data, period)?;
    let std = rolling_std(data, period)?;

    let (upper, lower): (Vec<Option<f64>>, Vec<Option<f64>>) = middle
        .iter()
        .zip(&std)
        .map(|pair| match pair {
            (Some(mean), Some(sd)) => (Some(mean + num_std * sd), Some(mean - num_std * sd)),
            _ => (None, None),
        })
        .unzip();

    Ok(BollingerBands {
        middle,
        std,
        upper,
        lower,
    })
}

/// Bollinger Bands of a price series as indicator columns.
pub fn bollinger_series(series: &PriceSeries, period: usize, num_std: f64) -> Result<IndicatorSet> {
    bollinger_bands(&series.closes(), period, num_std)?.into_indicator_set(series)
}
