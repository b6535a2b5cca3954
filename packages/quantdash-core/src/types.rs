//! Core value types for the quantdash engine.

use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single daily close.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// An ordered series of daily closes.
///
/// Guaranteed non-empty, strictly increasing by date, and every close is a
/// finite positive number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a validated price series.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidSeries("series must contain at least one row".to_string()));
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(Error::InvalidSeries(format!(
                    "dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(bad) = points.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
            return Err(Error::InvalidSeries(format!(
                "close on {} must be a positive finite number, got {}",
                bad.date, bad.close
            )));
        }

        Ok(Self { points })
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self> {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + Days::new(i as u64), close))
            .collect();
        Self::new(points)
    }

    /// All rows.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Closing prices in order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest row; a series is never empty.
    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    /// Latest row; a series is never empty.
    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    /// Rows with `start <= date <= end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let points: Vec<PricePoint> = self
            .points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();

        if points.is_empty() {
            return Err(Error::InvalidSeries(format!(
                "no rows between {} and {}",
                start, end
            )));
        }

        Ok(Self { points })
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = Error;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

/// Named indicator columns aligned index-for-index with a price series.
///
/// `None` marks positions without enough history for the indicator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawIndicatorSet")]
pub struct IndicatorSet {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl IndicatorSet {
    /// Create an empty set over the given date index.
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: BTreeMap::new(),
        }
    }

    /// Insert or replace a column. The column must match the date index length.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(Error::ColumnLength {
                name,
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Move every column of `other` into this set.
    pub fn merge(&mut self, other: IndicatorSet) -> Result<()> {
        if other.dates != self.dates {
            return Err(Error::InvalidSeries(
                "cannot merge indicator sets over different dates".to_string(),
            ));
        }
        self.columns.extend(other.columns);
        Ok(())
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Most recent value of a column, if defined.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(|c| c.last().copied().flatten())
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Deserialize)]
struct RawIndicatorSet {
    dates: Vec<NaiveDate>,
    #[serde(default)]
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl TryFrom<RawIndicatorSet> for IndicatorSet {
    type Error = Error;

    fn try_from(raw: RawIndicatorSet) -> Result<Self> {
        let mut set = IndicatorSet::new(raw.dates);
        for (name, values) in raw.columns {
            set.insert(name, values)?;
        }
        Ok(set)
    }
}

/// Portfolio composition: tickers with parallel weights summing to one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawPortfolioSpec")]
pub struct PortfolioSpec {
    tickers: Vec<String>,
    weights: Vec<f64>,
}

impl PortfolioSpec {
    /// Accepted distance between the weight sum and 1.0.
    pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

    /// Create a validated portfolio. Tickers are trimmed and uppercased.
    pub fn new(tickers: Vec<String>, weights: Vec<f64>) -> Result<Self> {
        if tickers.is_empty() {
            return Err(Error::InvalidPortfolio("at least one ticker is required".to_string()));
        }

        if tickers.len() != weights.len() {
            return Err(Error::InvalidPortfolio(format!(
                "number of tickers ({}) and weights ({}) must match",
                tickers.len(),
                weights.len()
            )));
        }

        let tickers: Vec<String> = tickers.iter().map(|t| t.trim().to_uppercase()).collect();
        if let Some(empty) = tickers.iter().position(String::is_empty) {
            return Err(Error::InvalidPortfolio(format!("ticker #{} is empty", empty + 1)));
        }

        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(Error::InvalidPortfolio(format!("weight {} is not finite", bad)));
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > Self::WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidPortfolio(format!(
                "weights must sum up to 1, got {}",
                sum
            )));
        }

        Ok(Self { tickers, weights })
    }

    /// Parse comma-separated tickers and weights, e.g. `"AAPL,MSFT"` and `"0.6,0.4"`.
    pub fn parse(tickers: &str, weights: &str) -> Result<Self> {
        let tickers: Vec<String> = tickers.split(',').map(|t| t.trim().to_string()).collect();
        let weights = weights
            .split(',')
            .map(|w| {
                let w = w.trim();
                w.parse::<f64>()
                    .map_err(|_| Error::InvalidPortfolio(format!("invalid weight: {:?}", w)))
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::new(tickers, weights)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of holdings.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

#[derive(Deserialize)]
struct RawPortfolioSpec {
    tickers: Vec<String>,
    weights: Vec<f64>,
}

impl TryFrom<RawPortfolioSpec> for PortfolioSpec {
    type Error = Error;

    fn try_from(raw: RawPortfolioSpec) -> Result<Self> {
        PortfolioSpec::new(raw.tickers, raw.weights)
    }
}

/// Period-over-period returns; one element shorter than the source prices.
///
/// `dates[i]` is the date of the later close in each pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawReturnsSeries")]
pub struct ReturnsSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnsSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(Error::ColumnLength {
                name: "returns".to_string(),
                expected: dates.len(),
                actual: values.len(),
            });
        }
        Ok(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Deserialize)]
struct RawReturnsSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TryFrom<RawReturnsSeries> for ReturnsSeries {
    type Error = Error;

    fn try_from(raw: RawReturnsSeries) -> Result<Self> {
        ReturnsSeries::new(raw.dates, raw.values)
    }
}

/// Historical Value-at-Risk at a confidence level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValueAtRisk {
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence_level: f64,
    /// Daily return at the (1 - confidence) quantile; negative means a loss
    pub value: f64,
}

/// Risk metrics for a daily return series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMetrics {
    /// Number of daily returns used
    pub observations: usize,
    /// Mean daily return times 252
    pub annualized_return: f64,
    /// Sample standard deviation of daily returns times sqrt(252)
    pub annualized_volatility: f64,
    /// Annualized return over annualized volatility; `None` when volatility is zero
    pub sharpe_ratio: Option<f64>,
    /// Historical VaR, when a confidence level was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_at_risk: Option<ValueAtRisk>,
}

/// API response wrapper for CLI output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
