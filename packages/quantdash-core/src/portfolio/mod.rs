//! Portfolio simulation module.
//!
//! Provides percentage returns, fixed-weight aggregation, and risk metrics.

mod returns;
mod risk;

pub use returns::{
    cumulative_returns, pct_change, portfolio_returns, series_returns, weighted_returns,
    PortfolioReturns,
};
pub use risk::{
    annualized_return, annualized_volatility, calculate_risk_metrics, quantile, sharpe_ratio,
    value_at_risk, TRADING_DAYS_PER_YEAR,
};
