//! Risk metrics calculation.
//!
//! Provides annualized return and volatility, Sharpe ratio, and historical Value-at-Risk.

use crate::types::{RiskMetrics, ValueAtRisk};
use crate::{Error, Result};

/// Trading days used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Volatility at or below this level is treated as zero.
const ZERO_VOLATILITY: f64 = 1e-12;

fn mean(returns: &[f64]) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    Some(returns.iter().sum::<f64>() / returns.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std(returns: &[f64]) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    let mean = mean(returns)?;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Mean daily return times 252. `None` for an empty series.
pub fn annualized_return(returns: &[f64]) -> Option<f64> {
    mean(returns).map(|m| m * TRADING_DAYS_PER_YEAR)
}

/// Sample standard deviation of daily returns times sqrt(252).
///
/// `None` with fewer than two observations.
pub fn annualized_volatility(returns: &[f64]) -> Option<f64> {
    sample_std(returns).map(|s| s * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Calculate Sharpe ratio from daily returns.
///
/// # Returns
///
/// Annualized return divided by annualized volatility, or `None` when the
/// volatility is zero or undefined.
pub fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    let volatility = annualized_volatility(returns)?;
    if volatility <= ZERO_VOLATILITY {
        return None;
    }
    Some(annualized_return(returns)? / volatility)
}

/// Linear-interpolated empirical quantile of `values` at `q` in [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64))
}

/// Calculate historical Value at Risk.
///
/// # Arguments
///
/// * `returns` - Daily returns
/// * `confidence` - Confidence level strictly between 0 and 1 (e.g., 0.95 for 95%)
///
/// # Returns
///
/// The `(1 - confidence)` quantile of the returns: the daily return that is
/// only undercut on the worst `1 - confidence` share of days. Losses are negative.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Result<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::InvalidConfidence(confidence));
    }

    quantile(returns, 1.0 - confidence).ok_or_else(|| {
        Error::InsufficientData("Value at Risk needs at least one return".to_string())
    })
}

/// Calculate risk metrics for a daily return series.
///
/// # Arguments
///
/// * `returns` - Daily returns (e.g., 0.01 for 1% daily return)
/// * `confidence` - Optional confidence level for VaR (typically 0.95)
///
/// # Returns
///
/// Returns `RiskMetrics`, or an error if there are fewer than two returns or
/// the confidence level is out of range.
pub fn calculate_risk_metrics(returns: &[f64], confidence: Option<f64>) -> Result<RiskMetrics> {
    let (annualized_return, annualized_volatility) =
        match (annualized_return(returns), annualized_volatility(returns)) {
            (Some(ret), Some(vol)) => (ret, vol),
            _ => {
                return Err(Error::InsufficientData(format!(
                    "Need at least 2 returns for risk calculation, got {}",
                    returns.len()
                )))
            }
        };

    let value_at_risk = confidence
        .map(|c| {
            value_at_risk(returns, c).map(|value| ValueAtRisk {
                confidence_level: c,
                value,
            })
        })
        .transpose()?;

    Ok(RiskMetrics {
        observations: returns.len(),
        annualized_return,
        annualized_volatility,
        sharpe_ratio: sharpe_ratio(returns),
        value_at_risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Helper to generate test returns
    fn generate_returns(mean: f64, std: f64, n: usize) -> Vec<f64> {
        // Simple deterministic pseudo-returns for testing
        (0..n)
            .map(|i| mean + std * ((i as f64 / n as f64 - 0.5) * 2.0))
            .collect()
    }

    #[test]
    fn test_annualized_return_and_volatility() {
        let returns = vec![0.01, -0.02, 0.015, 0.005];

        assert_relative_eq!(annualized_return(&returns).unwrap(), 0.0025 * 252.0, epsilon = 1e-12);

        // Squared deviations from 0.0025 sum to 7.25e-4
        let expected = (7.25e-4_f64 / 3.0).sqrt() * 252.0_f64.sqrt();
        assert_relative_eq!(annualized_volatility(&returns).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_short_series() {
        assert_eq!(annualized_return(&[]), None);
        assert_eq!(annualized_volatility(&[0.01]), None);
        assert_eq!(sharpe_ratio(&[0.01]), None);
    }

    #[test]
    fn test_sharpe_ratio() {
        let good = generate_returns(0.001, 0.01, 100);
        let bad = generate_returns(-0.001, 0.01, 100);

        assert!(sharpe_ratio(&good).unwrap() > 0.0);
        assert!(sharpe_ratio(&bad).unwrap() < 0.0);

        let expected = annualized_return(&good).unwrap() / annualized_volatility(&good).unwrap();
        assert_relative_eq!(sharpe_ratio(&good).unwrap(), expected);
    }

    #[test]
    fn test_sharpe_zero_volatility_is_sentinel() {
        // Constant returns have zero volatility; the ratio is reported as missing, never inf/NaN
        let constant: Vec<f64> = (0..100).map(|_| 0.001).collect();
        assert_eq!(sharpe_ratio(&constant), None);

        let metrics = calculate_risk_metrics(&constant, None).unwrap();
        assert_eq!(metrics.sharpe_ratio, None);
        assert!(metrics.annualized_volatility.abs() <= ZERO_VOLATILITY);
    }

    #[test]
    fn test_quantile_interpolation() {
        let values = vec![0.03, -0.05, 0.0, 0.01, -0.02];

        assert_relative_eq!(quantile(&values, 0.0).unwrap(), -0.05);
        assert_relative_eq!(quantile(&values, 1.0).unwrap(), 0.03);
        assert_relative_eq!(quantile(&values, 0.5).unwrap(), 0.0);
        // pos = 0.05 * 4 = 0.2 between -0.05 and -0.02
        assert_relative_eq!(quantile(&values, 0.05).unwrap(), -0.044, epsilon = 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_quantile_nan_does_not_depend_on_order() {
        // total ordering puts NaN after every number
        let a = quantile(&[f64::NAN, 0.02, -0.01], 0.0).unwrap();
        let b = quantile(&[0.02, -0.01, f64::NAN], 0.0).unwrap();

        assert_eq!(a, -0.01);
        assert_eq!(b, -0.01);
    }

    #[test]
    fn test_value_at_risk() {
        let returns = vec![0.03, -0.05, 0.0, 0.01, -0.02];

        assert_relative_eq!(value_at_risk(&returns, 0.95).unwrap(), -0.044, epsilon = 1e-12);
        assert_relative_eq!(value_at_risk(&returns, 0.75).unwrap(), -0.02, epsilon = 1e-12);

        // Higher confidence never reports a milder loss
        assert!(value_at_risk(&returns, 0.99).unwrap() <= value_at_risk(&returns, 0.90).unwrap());
    }

    #[test]
    fn test_value_at_risk_invalid_input() {
        let returns = vec![0.01, -0.01];

        assert!(matches!(value_at_risk(&returns, 1.0), Err(Error::InvalidConfidence(_))));
        assert!(matches!(value_at_risk(&returns, 0.0), Err(Error::InvalidConfidence(_))));
        assert!(matches!(value_at_risk(&returns, f64::NAN), Err(Error::InvalidConfidence(_))));
        assert!(matches!(value_at_risk(&[], 0.95), Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_calculate_risk_metrics() {
        let returns: Vec<f64> = vec![
            0.01, -0.005, 0.008, -0.003, 0.012, -0.007, 0.005, 0.002, -0.004, 0.006, 0.003, -0.002,
            0.007, -0.001, 0.004,
        ];

        let result = calculate_risk_metrics(&returns, Some(0.95)).unwrap();

        assert_eq!(result.observations, 15);
        assert!(result.annualized_volatility > 0.0);
        assert!(result.sharpe_ratio.unwrap() > 0.0);

        let var = result.value_at_risk.unwrap();
        assert_eq!(var.confidence_level, 0.95);
        assert!(var.value < 0.0);
        assert_relative_eq!(var.value, value_at_risk(&returns, 0.95).unwrap());
    }

    #[test]
    fn test_calculate_risk_metrics_insufficient_data() {
        let result = calculate_risk_metrics(&[0.01], Some(0.95));
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_calculate_risk_metrics_bad_confidence() {
        let result = calculate_risk_metrics(&[0.01, 0.02, -0.01], Some(1.5));
        assert!(matches!(result, Err(Error::InvalidConfidence(_))));
    }
}
