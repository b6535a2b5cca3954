//! Price provider backed by JSON snapshots on disk.

use super::{DataFetchError, PriceProvider, ProviderConfig};
use crate::types::{PricePoint, PriceSeries};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

/// Reads `<data_dir>/<TICKER>.json`, an array of `{"date", "close"}` rows.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    config: ProviderConfig,
}

impl JsonFileProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Snapshot path for a ticker.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.json", ticker.trim().to_uppercase()))
    }

    /// Write a snapshot for `ticker`, creating the data directory if needed.
    pub fn save(&self, ticker: &str, series: &PriceSeries) -> Result<PathBuf, DataFetchError> {
        let path = self.path_for(ticker);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DataFetchError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(series).map_err(|source| DataFetchError::Parse {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, content).map_err(|source| DataFetchError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(ticker, path = %path.display(), rows = series.len(), "Saved price snapshot");
        Ok(path)
    }

    fn load_points(&self, ticker: &str) -> Result<Vec<PricePoint>, DataFetchError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataFetchError::NotFound(ticker.to_uppercase()));
        }

        tracing::debug!(ticker, path = %path.display(), "Reading price snapshot");

        let content = fs::read_to_string(&path).map_err(|source| DataFetchError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DataFetchError::Parse { path, source })
    }
}

impl PriceProvider for JsonFileProvider {
    fn name(&self) -> &str {
        &self.config.provider
    }

    fn historical_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataFetchError> {
        if start > end {
            return Err(DataFetchError::InvalidRange { start, end });
        }

        let mut points = self.load_points(ticker)?;
        points.retain(|p| p.date >= start && p.date <= end);
        points.sort_by_key(|p| p.date);

        if points.is_empty() {
            return Err(DataFetchError::Empty {
                ticker: ticker.to_uppercase(),
                start,
                end,
            });
        }

        PriceSeries::new(points).map_err(|e| DataFetchError::InvalidSeries {
            ticker: ticker.to_uppercase(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn provider_in(dir: &std::path::Path) -> JsonFileProvider {
        JsonFileProvider::new(ProviderConfig {
            provider: "snapshot".to_string(),
            api_key: None,
            data_dir: dir.to_path_buf(),
        })
    }

    #[test]
    fn test_save_and_load_range() {
        let dir = tempdir().unwrap();
        let provider = provider_in(dir.path());

        let series = PriceSeries::from_closes(date(1, 1), &[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
        let path = provider.save("aapl", &series).unwrap();
        assert!(path.ends_with("AAPL.json"));

        let loaded = provider.historical_prices("AAPL", date(1, 2), date(1, 4)).unwrap();
        assert_eq!(loaded.closes(), vec![11.0, 12.0, 13.0]);
        assert_eq!(provider.name(), "snapshot");
    }

    #[test]
    fn test_unsorted_snapshot_is_ordered() {
        let dir = tempdir().unwrap();
        let provider = provider_in(dir.path());
        let json = r#"[
            {"date": "2024-01-03", "close": 12.0},
            {"date": "2024-01-01", "close": 10.0},
            {"date": "2024-01-02", "close": 11.0}
        ]"#;
        fs::write(dir.path().join("MSFT.json"), json).unwrap();

        let loaded = provider.historical_prices("msft", date(1, 1), date(1, 31)).unwrap();
        assert_eq!(loaded.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_missing_ticker() {
        let dir = tempdir().unwrap();
        let provider = provider_in(dir.path());

        let err = provider.historical_prices("NOPE", date(1, 1), date(1, 2)).unwrap_err();
        assert!(matches!(err, DataFetchError::NotFound(t) if t == "NOPE"));
    }

    #[test]
    fn test_invalid_range_and_empty_window() {
        let dir = tempdir().unwrap();
        let provider = provider_in(dir.path());
        let series = PriceSeries::from_closes(date(1, 1), &[10.0, 11.0]).unwrap();
        provider.save("AAPL", &series).unwrap();

        assert!(matches!(
            provider.historical_prices("AAPL", date(2, 1), date(1, 1)),
            Err(DataFetchError::InvalidRange { .. })
        ));
        assert!(matches!(
            provider.historical_prices("AAPL", date(6, 1), date(6, 30)),
            Err(DataFetchError::Empty { .. })
        ));
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        let provider = provider_in(dir.path());
        fs::write(dir.path().join("BAD.json"), "not json").unwrap();

        assert!(matches!(
            provider.historical_prices("BAD", date(1, 1), date(1, 2)),
            Err(DataFetchError::Parse { .. })
        ));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let dir = tempdir().unwrap();
        let provider = provider_in(dir.path());
        let json = r#"[{"date": "2024-01-01", "close": 10.0}, {"date": "2024-01-01", "close": 11.0}]"#;
        fs::write(dir.path().join("DUP.json"), json).unwrap();

        assert!(matches!(
            provider.historical_prices("DUP", date(1, 1), date(1, 2)),
            Err(DataFetchError::InvalidSeries { .. })
        ));
    }
}
