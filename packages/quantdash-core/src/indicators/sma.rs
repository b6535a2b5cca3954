//! Rolling-window statistics: Simple Moving Average and rolling standard deviation.

use crate::{Error, Result};

pub(crate) fn validate_window(period: usize) -> Result<()> {
    if period == 0 {
        return Err(Error::InvalidWindow("window must be at least 1".to_string()));
    }
    Ok(())
}

/// Calculate Simple Moving Average.
///
/// # Arguments
///
/// * `data` - Price series
/// * `period` - Lookback window
///
/// # Returns
///
/// One value per input position. The first `period-1` positions are `None`;
/// when `period` exceeds the data length every position is `None`.
///
/// # Errors
///
/// `Error::InvalidWindow` when `period` is zero.
///
/// # Example
///
/// ```rust
/// use quantdash_core::indicators::sma;
///
/// let prices = vec![10.0, 11.0, 12.0, 11.0, 10.0];
/// let sma_values = sma(&prices, 3).unwrap();
///
/// assert_eq!(sma_values[1], None);
/// // SMA at index 2 = (10 + 11 + 12) / 3 = 11.0
/// assert!((sma_values[2].unwrap() - 11.0).abs() < 1e-9);
/// ```
pub fn sma(data: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    validate_window(period)?;

    let mut result = vec![None; data.len()];
    for (i, window) in data.windows(period).enumerate() {
        result[i + period - 1] = Some(window.iter().sum::<f64>() / period as f64);
    }

    Ok(result)
}

/// Calculate the rolling sample standard deviation (n - 1 denominator).
///
/// A window of one observation has no sample deviation, so `period == 1`
/// yields all `None`.
pub fn rolling_std(data: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    validate_window(period)?;

    let mut result = vec![None; data.len()];
    if period < 2 {
        return Ok(result);
    }

    for (i, window) in data.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        result[i + period - 1] = Some(variance.sqrt());
    }

    Ok(result)
}
