//! Dashboard-level aggregates.
//!
//! Bundles every series and metric shown for a single ticker or a portfolio
//! into serializable value objects that rendering and export code consume as-is.

use crate::indicators::{
    bollinger_series, moving_averages, rsi_series, RsiZone, DEFAULT_BOLLINGER_NUM_STD,
    DEFAULT_BOLLINGER_WINDOW, DEFAULT_MA_WINDOWS, DEFAULT_RSI_PERIOD, RSI_OVERBOUGHT,
    RSI_OVERSOLD,
};
use crate::portfolio::{
    calculate_risk_metrics, cumulative_returns, portfolio_returns, series_returns,
    PortfolioReturns,
};
use crate::types::{IndicatorSet, PortfolioSpec, PriceSeries, ReturnsSeries, RiskMetrics};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default VaR confidence level.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// Indicator and risk parameters for a ticker analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Moving average windows, one `MA_<window>` column each
    pub ma_windows: Vec<usize>,
    /// Bollinger lookback
    pub bollinger_window: usize,
    /// Bollinger band width in standard deviations
    pub bollinger_num_std: f64,
    /// RSI lookback
    pub rsi_period: usize,
    /// RSI oversold threshold
    pub rsi_oversold: f64,
    /// RSI overbought threshold
    pub rsi_overbought: f64,
    /// VaR confidence level; `None` skips VaR
    pub var_confidence: Option<f64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ma_windows: DEFAULT_MA_WINDOWS.to_vec(),
            bollinger_window: DEFAULT_BOLLINGER_WINDOW,
            bollinger_num_std: DEFAULT_BOLLINGER_NUM_STD,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_oversold: RSI_OVERSOLD,
            rsi_overbought: RSI_OVERBOUGHT,
            var_confidence: Some(DEFAULT_VAR_CONFIDENCE),
        }
    }
}

impl AnalysisOptions {
    /// Check parameters before any series is touched.
    pub fn validate(&self) -> Result<()> {
        if let Some(window) = self.ma_windows.iter().find(|w| **w == 0) {
            return Err(Error::InvalidWindow(format!("moving average window {}", window)));
        }
        if self.bollinger_window == 0 {
            return Err(Error::InvalidWindow("Bollinger window must be at least 1".to_string()));
        }
        if self.rsi_period == 0 {
            return Err(Error::InvalidWindow("RSI period must be at least 1".to_string()));
        }
        if self.rsi_oversold > self.rsi_overbought {
            return Err(Error::InvalidParameter(format!(
                "RSI oversold threshold {} is above overbought threshold {}",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        if let Some(c) = self.var_confidence {
            if !(c > 0.0 && c < 1.0) {
                return Err(Error::InvalidConfidence(c));
            }
        }
        Ok(())
    }
}

/// Everything derived from one ticker's closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerAnalysis {
    pub ticker: String,
    /// Closing prices aligned with `indicators.dates()`
    pub closes: Vec<f64>,
    /// `MA_<window>` columns plus `MA`, `STD`, `Upper`, `Lower` and `RSI`
    pub indicators: IndicatorSet,
    /// Daily percentage returns
    pub returns: ReturnsSeries,
    /// Reading of the most recent RSI value
    pub rsi_zone: Option<RsiZone>,
    /// Risk metrics; `None` with fewer than two returns
    pub risk: Option<RiskMetrics>,
}

impl TickerAnalysis {
    pub fn compute(ticker: &str, series: &PriceSeries, options: &AnalysisOptions) -> Result<Self> {
        options.validate()?;

        let mut indicators = moving_averages(series, &options.ma_windows)?;
        indicators.merge(bollinger_series(
            series,
            options.bollinger_window,
            options.bollinger_num_std,
        )?)?;
        indicators.merge(rsi_series(series, options.rsi_period)?)?;

        let rsi_zone = indicators
            .latest("RSI")
            .map(|v| RsiZone::classify(v, options.rsi_oversold, options.rsi_overbought));

        let returns = series_returns(series)?;
        let risk = if returns.len() >= 2 {
            Some(calculate_risk_metrics(returns.values(), options.var_confidence)?)
        } else {
            None
        };

        Ok(Self {
            ticker: ticker.trim().to_uppercase(),
            closes: series.closes(),
            indicators,
            returns,
            rsi_zone,
            risk,
        })
    }
}

/// Simulated fixed-weight portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioAnalysis {
    pub spec: PortfolioSpec,
    pub returns: PortfolioReturns,
    /// Risk metrics of the daily portfolio return; `None` with fewer than two returns
    pub risk: Option<RiskMetrics>,
}

impl PortfolioAnalysis {
    /// `series[j]` holds the closes of `spec.tickers()[j]`.
    pub fn compute(
        spec: &PortfolioSpec,
        series: &[PriceSeries],
        var_confidence: Option<f64>,
    ) -> Result<Self> {
        if let Some(c) = var_confidence {
            if !(c > 0.0 && c < 1.0) {
                return Err(Error::InvalidConfidence(c));
            }
        }

        let returns = portfolio_returns(spec, series)?;
        let risk = if returns.daily.len() >= 2 {
            Some(calculate_risk_metrics(returns.daily.values(), var_confidence)?)
        } else {
            None
        };

        Ok(Self {
            spec: spec.clone(),
            returns,
            risk,
        })
    }
}

/// Growth of one market index over the requested period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexPerformance {
    pub ticker: String,
    /// Cumulative growth of one unit, dated by close
    pub cumulative: ReturnsSeries,
    /// Total return over the period (0.05 for +5%)
    pub total_return: f64,
}

/// Cumulative performance of each index, in input order.
pub fn market_overview(indices: &[(String, PriceSeries)]) -> Result<Vec<IndexPerformance>> {
    indices
        .iter()
        .map(|(ticker, series)| -> Result<IndexPerformance> {
            let daily = series_returns(series)?;
            let growth = cumulative_returns(daily.values());
            let total_return = growth.last().map(|g| g - 1.0).unwrap_or(0.0);

            Ok(IndexPerformance {
                ticker: ticker.trim().to_uppercase(),
                cumulative: ReturnsSeries::new(daily.dates().to_vec(), growth)?,
                total_return,
            })
        })
        .collect()
}
