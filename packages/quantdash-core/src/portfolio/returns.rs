//! Percentage returns and fixed-weight portfolio aggregation.

use crate::types::{PortfolioSpec, PriceSeries, ReturnsSeries};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Period-over-period percentage change: `price[i] / price[i-1] - 1`.
///
/// The first price has no predecessor, so the output is one element shorter.
pub fn pct_change(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Daily returns of a price series, dated by the later close of each pair.
pub fn series_returns(series: &PriceSeries) -> Result<ReturnsSeries> {
    let dates = series.dates().split_off(1);
    let values = pct_change(&series.closes());
    ReturnsSeries::new(dates, values)
}

/// Weighted sum of per-asset returns for each period.
///
/// # Arguments
///
/// * `returns` - One return vector per asset, all of equal length
/// * `weights` - One weight per asset
///
/// Assets are accumulated in the given order so the result does not depend on
/// how the per-asset vectors were produced.
pub fn weighted_returns(returns: &[Vec<f64>], weights: &[f64]) -> Result<Vec<f64>> {
    if returns.len() != weights.len() {
        return Err(Error::InvalidPortfolio(format!(
            "{} return series for {} weights",
            returns.len(),
            weights.len()
        )));
    }

    let periods = returns.first().map(Vec::len).unwrap_or(0);
    if let Some((idx, asset)) = returns.iter().enumerate().find(|(_, r)| r.len() != periods) {
        return Err(Error::ColumnLength {
            name: format!("returns[{}]", idx),
            expected: periods,
            actual: asset.len(),
        });
    }

    Ok((0..periods)
        .map(|i| {
            returns
                .iter()
                .zip(weights)
                .fold(0.0, |acc, (asset, weight)| acc + asset[i] * weight)
        })
        .collect())
}

/// Growth of one unit invested: `cumulative[i] = prod_{k <= i} (1 + r[k])`.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |growth, r| {
            *growth *= 1.0 + r;
            Some(*growth)
        })
        .collect()
}

/// Returns of a fixed-weight portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioReturns {
    /// Tickers in portfolio order
    pub tickers: Vec<String>,
    /// Daily returns per ticker, parallel to `tickers`
    pub asset_returns: Vec<ReturnsSeries>,
    /// Weighted daily portfolio return
    pub daily: ReturnsSeries,
    /// Cumulative growth of the portfolio
    pub cumulative: ReturnsSeries,
}

/// Aggregate aligned price series into portfolio returns.
///
/// `series[j]` holds the prices of `spec.tickers()[j]`. The weight sum is
/// validated when the `PortfolioSpec` is built and is not re-checked here.
///
/// # Errors
///
/// * `Error::InvalidPortfolio` if the number of series differs from the number of tickers
/// * `Error::MisalignedSeries` if any series has a different date index than the first
pub fn portfolio_returns(spec: &PortfolioSpec, series: &[PriceSeries]) -> Result<PortfolioReturns> {
    if series.len() != spec.len() {
        return Err(Error::InvalidPortfolio(format!(
            "expected {} price series, got {}",
            spec.len(),
            series.len()
        )));
    }

    let index = series
        .first()
        .map(PriceSeries::dates)
        .ok_or_else(|| Error::InvalidPortfolio("at least one price series is required".to_string()))?;
    for (ticker, prices) in spec.tickers().iter().zip(series) {
        if prices.dates() != index {
            return Err(Error::MisalignedSeries {
                ticker: ticker.clone(),
            });
        }
    }

    let asset_returns = series
        .iter()
        .map(series_returns)
        .collect::<Result<Vec<ReturnsSeries>>>()?;
    let matrix: Vec<Vec<f64>> = asset_returns.iter().map(|r| r.values().to_vec()).collect();

    let daily_values = weighted_returns(&matrix, spec.weights())?;
    let cumulative_values = cumulative_returns(&daily_values);

    let dates = index[1..].to_vec();
    Ok(PortfolioReturns {
        tickers: spec.tickers().to_vec(),
        asset_returns,
        daily: ReturnsSeries::new(dates.clone(), daily_values)?,
        cumulative: ReturnsSeries::new(dates, cumulative_values)?,
    })
}
