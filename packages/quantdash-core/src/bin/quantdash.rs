//! Quantdash CLI - indicator, portfolio and risk analysis from the command line.
//!
//! Reads price snapshots through the configured provider and prints a JSON
//! envelope (`{"ok": true, "data": ...}` or `{"ok": false, "error": ...}`).
//! Logs go to stderr so stdout stays machine-readable.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use quantdash_core::{
    market_overview, series_returns, value_at_risk, AnalysisOptions, ApiResponse, DashboardConfig,
    JsonFileProvider, PortfolioAnalysis, PortfolioSpec, PriceCache, PriceSeries, TickerAnalysis,
};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "quantdash")]
#[command(about = "Quantdash CLI - technical indicators, portfolio simulation and risk metrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DateRange {
    /// First date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01")]
    start: NaiveDate,
    /// Last date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl DateRange {
    fn resolve(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end.unwrap_or_else(|| Local::now().date_naive()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Indicators and risk metrics for one ticker
    Analyze {
        /// Stock symbol
        #[arg(short, long, default_value = "AAPL")]
        ticker: String,
        #[command(flatten)]
        range: DateRange,
        /// Moving average windows (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ma: Option<Vec<usize>>,
        /// RSI period
        #[arg(long)]
        rsi_period: Option<usize>,
        /// Bollinger window
        #[arg(long)]
        bb_window: Option<usize>,
        /// Confidence level for VaR (0.95 = 95%)
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Simulate a fixed-weight portfolio
    Portfolio {
        /// Tickers (comma-separated)
        #[arg(short = 'y', long)]
        tickers: Option<String>,
        /// Weights (comma-separated, summing to 1)
        #[arg(short, long)]
        weights: Option<String>,
        #[command(flatten)]
        range: DateRange,
        /// Confidence level for VaR (0.95 = 95%)
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Historical Value at Risk of one ticker
    Var {
        /// Stock symbol
        #[arg(short, long, default_value = "AAPL")]
        ticker: String,
        #[command(flatten)]
        range: DateRange,
        /// Confidence level (0.95 = 95%)
        #[arg(long, default_value = "0.95")]
        confidence: f64,
    },
    /// Cumulative performance of the market indices
    Market {
        #[command(flatten)]
        range: DateRange,
    },
    /// Show the resolved configuration
    Config,
}

struct Session {
    config: DashboardConfig,
    provider: JsonFileProvider,
    cache: PriceCache,
}

impl Session {
    fn new(config: DashboardConfig) -> Self {
        let provider = JsonFileProvider::new(config.provider.clone());
        Self {
            config,
            provider,
            cache: PriceCache::new(),
        }
    }

    fn prices(&mut self, ticker: &str, range: &DateRange) -> quantdash_core::Result<PriceSeries> {
        let (start, end) = range.resolve();
        Ok(self.cache.get_or_fetch(&self.provider, ticker, start, end)?)
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = DashboardConfig::load().and_then(|config| {
        let mut session = Session::new(config);
        match cli.command {
            Commands::Analyze {
                ticker,
                range,
                ma,
                rsi_period,
                bb_window,
                confidence,
            } => handle_analyze(&mut session, &ticker, &range, ma, rsi_period, bb_window, confidence),
            Commands::Portfolio {
                tickers,
                weights,
                range,
                confidence,
            } => handle_portfolio(&mut session, tickers, weights, &range, confidence),
            Commands::Var {
                ticker,
                range,
                confidence,
            } => handle_var(&mut session, &ticker, &range, confidence),
            Commands::Market { range } => handle_market(&mut session, &range),
            Commands::Config => Ok(serde_json::to_value(&session.config)?),
        }
    });

    let response = match result {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => {
            tracing::error!("{}", e);
            ApiResponse::<Value>::err(e.to_string())
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn handle_analyze(
    session: &mut Session,
    ticker: &str,
    range: &DateRange,
    ma: Option<Vec<usize>>,
    rsi_period: Option<usize>,
    bb_window: Option<usize>,
    confidence: Option<f64>,
) -> quantdash_core::Result<Value> {
    let defaults = &session.config.analysis;
    let options = AnalysisOptions {
        ma_windows: ma.unwrap_or_else(|| defaults.ma_windows.clone()),
        rsi_period: rsi_period.unwrap_or(defaults.rsi_period),
        bollinger_window: bb_window.unwrap_or(defaults.bollinger_window),
        var_confidence: confidence.or(defaults.var_confidence),
        ..defaults.clone()
    };

    let series = session.prices(ticker, range)?;
    let analysis = TickerAnalysis::compute(ticker, &series, &options)?;
    tracing::info!(ticker = %analysis.ticker, rows = series.len(), "Computed indicators");

    Ok(serde_json::to_value(&analysis)?)
}

fn handle_portfolio(
    session: &mut Session,
    tickers: Option<String>,
    weights: Option<String>,
    range: &DateRange,
    confidence: Option<f64>,
) -> quantdash_core::Result<Value> {
    let tickers = tickers.unwrap_or_else(|| session.config.portfolio.tickers.clone());
    let weights = weights.unwrap_or_else(|| session.config.portfolio.weights.clone());
    let spec = PortfolioSpec::parse(&tickers, &weights)?;

    let series = spec
        .tickers()
        .iter()
        .map(|ticker| session.prices(ticker, range))
        .collect::<quantdash_core::Result<Vec<_>>>()?;

    let confidence = confidence.or(session.config.analysis.var_confidence);
    let analysis = PortfolioAnalysis::compute(&spec, &series, confidence)?;
    tracing::info!(holdings = spec.len(), days = analysis.returns.daily.len(), "Simulated portfolio");

    Ok(serde_json::to_value(&analysis)?)
}

fn handle_var(
    session: &mut Session,
    ticker: &str,
    range: &DateRange,
    confidence: f64,
) -> quantdash_core::Result<Value> {
    let series = session.prices(ticker, range)?;
    let returns = series_returns(&series)?;
    let var = value_at_risk(returns.values(), confidence)?;

    Ok(json!({
        "ticker": ticker.to_uppercase(),
        "confidence_level": confidence,
        "value_at_risk": var,
        "observations": returns.len(),
    }))
}

fn handle_market(session: &mut Session, range: &DateRange) -> quantdash_core::Result<Value> {
    let indices = session.config.portfolio.market_indices.clone();
    let series = indices
        .into_iter()
        .map(|ticker| -> quantdash_core::Result<(String, PriceSeries)> {
            let prices = session.prices(&ticker, range)?;
            Ok((ticker, prices))
        })
        .collect::<quantdash_core::Result<Vec<_>>>()?;

    let overview = market_overview(&series)?;
    Ok(json!({ "indices": overview }))
}
