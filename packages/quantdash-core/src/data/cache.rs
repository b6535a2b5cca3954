//! Keyed in-memory cache of fetched price series.

use super::{DataFetchError, PriceProvider};
use crate::types::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Identity of one fetch: the same symbol over a different range is a different entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub provider: String,
}

impl CacheKey {
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate, provider: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            start,
            end,
            provider: provider.to_string(),
        }
    }
}

/// Cache of price series owned by the caller and consulted before a provider.
///
/// Failed fetches are never stored.
#[derive(Debug, Default)]
pub struct PriceCache {
    entries: HashMap<CacheKey, PriceSeries>,
    hits: u64,
    misses: u64,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached series for this fetch, asking `provider` on a miss.
    pub fn get_or_fetch(
        &mut self,
        provider: &dyn PriceProvider,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataFetchError> {
        let key = CacheKey::new(ticker, start, end, provider.name());

        if let Some(series) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(symbol = %key.symbol, %start, %end, "Price cache hit");
            return Ok(series.clone());
        }

        self.misses += 1;
        tracing::debug!(symbol = %key.symbol, %start, %end, provider = %key.provider, "Price cache miss");

        let series = provider.historical_prices(&key.symbol, start, end)?;
        self.entries.insert(key, series.clone());
        Ok(series)
    }

    /// Look up an entry without fetching.
    pub fn get(&self, key: &CacheKey) -> Option<&PriceSeries> {
        self.entries.get(key)
    }

    /// Store a series under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: CacheKey, series: PriceSeries) {
        self.entries.insert(key, series);
    }

    /// Drop every entry for `symbol`, across ranges and providers.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, symbol: &str) -> usize {
        let symbol = symbol.trim().to_uppercase();
        let before = self.entries.len();
        self.entries.retain(|key, _| key.symbol != symbol);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingProvider {
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: false,
            }
        }
    }

    impl PriceProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn historical_prices(
            &self,
            ticker: &str,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<PriceSeries, DataFetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(DataFetchError::Provider(format!("{} unavailable", ticker)));
            }
            PriceSeries::from_closes(start, &[1.0, 2.0, 3.0])
                .map_err(|e| DataFetchError::Provider(e.to_string()))
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_hit_after_miss() {
        let provider = CountingProvider::new();
        let mut cache = PriceCache::new();

        let first = cache.get_or_fetch(&provider, "aapl", date(1), date(10)).unwrap();
        let second = cache.get_or_fetch(&provider, "AAPL", date(1), date(10)).unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_range_is_a_miss() {
        let provider = CountingProvider::new();
        let mut cache = PriceCache::new();

        cache.get_or_fetch(&provider, "AAPL", date(1), date(10)).unwrap();
        cache.get_or_fetch(&provider, "AAPL", date(1), date(11)).unwrap();
        cache.get_or_fetch(&provider, "AAPL", date(2), date(10)).unwrap();

        assert_eq!(provider.calls.get(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            fail: true,
        };
        let mut cache = PriceCache::new();

        assert!(cache.get_or_fetch(&provider, "AAPL", date(1), date(2)).is_err());
        assert!(cache.get_or_fetch(&provider, "AAPL", date(1), date(2)).is_err());

        assert_eq!(provider.calls.get(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let provider = CountingProvider::new();
        let mut cache = PriceCache::new();

        cache.get_or_fetch(&provider, "AAPL", date(1), date(10)).unwrap();
        cache.get_or_fetch(&provider, "AAPL", date(2), date(10)).unwrap();
        cache.get_or_fetch(&provider, "MSFT", date(1), date(10)).unwrap();

        assert_eq!(cache.invalidate("aapl"), 2);
        assert_eq!(cache.len(), 1);

        let key = CacheKey::new("msft", date(1), date(10), "counting");
        assert!(cache.get(&key).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }
}
