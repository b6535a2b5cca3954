//! Relative Strength Index (RSI) indicator.

use super::ewm::ewm_mean;
use super::sma::validate_window;
use crate::types::{IndicatorSet, PriceSeries};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Conventional RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// RSI above this level is read as overbought.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// RSI below this level is read as oversold.
pub const RSI_OVERSOLD: f64 = 30.0;

/// RSI from average gain and average loss.
/// Zero average loss saturates at 100 instead of dividing by zero.
#[inline]
fn calculate_rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss <= 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Calculate Relative Strength Index.
///
/// Formula:
/// 1. delta = price[i] - price[i-1]
/// 2. gain = max(delta, 0), loss = max(-delta, 0)
/// 3. Average gain and loss are exponentially weighted means with
///    center of mass `period - 1` (alpha = 1 / period), defined once
///    `period` deltas have been observed
/// 4. RS = average_gain / average_loss
/// 5. RSI = 100 - (100 / (1 + RS))
///
/// # Arguments
///
/// * `prices` - Price series (typically closing prices)
/// * `period` - Lookback period (typically 14)
///
/// # Returns
///
/// One value per input position on a 0-100 scale. Position 0 has no delta, so
/// the first defined value is at index `period`.
///
/// # Example
///
/// ```rust
/// use quantdash_core::indicators::rsi;
///
/// let prices = vec![44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.5, 44.0, 43.5, 44.0,
///                   44.25, 44.0, 43.5, 44.0, 44.5, 44.25, 44.0];
/// let rsi_values = rsi(&prices, 14).unwrap();
///
/// assert!(rsi_values[13].is_none());
/// for value in rsi_values.iter().flatten() {
///     assert!((0.0..=100.0).contains(value));
/// }
/// ```
pub fn rsi(prices: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    validate_window(period)?;

    let n = prices.len();
    let mut gains = Vec::with_capacity(n);
    let mut losses = Vec::with_capacity(n);

    if n > 0 {
        gains.push(None);
        losses.push(None);
    }

    for pair in prices.windows(2) {
        let delta = pair[1] - pair[0];
        gains.push(Some(delta.max(0.0)));
        losses.push(Some((-delta).max(0.0)));
    }

    let com = (period - 1) as f64;
    let avg_gain = ewm_mean(&gains, com, period);
    let avg_loss = ewm_mean(&losses, com, period);

    Ok(avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|pair| match pair {
            (Some(gain), Some(loss)) => Some(calculate_rsi_value(gain, loss)),
            _ => None,
        })
        .collect())
}

/// RSI of a price series as an `"RSI"` indicator column.
pub fn rsi_series(series: &PriceSeries, period: usize) -> Result<IndicatorSet> {
    let mut set = IndicatorSet::new(series.dates());
    set.insert("RSI", rsi(&series.closes(), period)?)?;
    Ok(set)
}

/// Momentum reading of an RSI value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    /// Classify a value; the thresholds themselves count as neutral.
    pub fn classify(value: f64, oversold: f64, overbought: f64) -> Self {
        if value < oversold {
            RsiZone::Oversold
        } else if value > overbought {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }
}

/// Classify each defined RSI value.
///
/// # Arguments
///
/// * `rsi_values` - Calculated RSI values
/// * `oversold` - Oversold threshold (typically 30)
/// * `overbought` - Overbought threshold (typically 70)
pub fn rsi_zones(rsi_values: &[Option<f64>], oversold: f64, overbought: f64) -> Vec<Option<RsiZone>> {
    rsi_values
        .iter()
        .map(|value| value.map(|v| RsiZone::classify(v, oversold, overbought)))
        .collect()
}
