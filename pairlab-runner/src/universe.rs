//! Universe acquisition: fetch every symbol, admit those with enough history.
//!
//! Fetching runs on a private rayon pool of `concurrency` threads. Results
//! come back in symbol-list order regardless of completion order, so the
//! resulting `PriceStore` (and every pair enumerated from it) is the same
//! from run to run.

use crate::config::DataConfig;
use crate::error::RunError;
use chrono::NaiveDate;
use pairlab_core::data::{DataError, DataProvider, DownloadProgress};
use pairlab_core::domain::{PriceSeries, PriceStore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A symbol that did not make it into the universe, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of acquisition.
#[derive(Debug, Clone)]
pub struct Universe {
    pub store: PriceStore,
    pub requested: usize,
    pub excluded: Vec<ExcludedSymbol>,
}

/// First date of the lookback window ending at `as_of`.
pub fn window_start(as_of: NaiveDate, lookback_days: u32) -> NaiveDate {
    as_of
        .checked_sub_days(chrono::Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN)
}

fn fetch_one(
    provider: &dyn DataProvider,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    min_history: usize,
) -> Result<PriceSeries, DataError> {
    // Once the provider has shut us out, skip instead of queueing more requests.
    if !provider.is_available() {
        return Err(DataError::CircuitBreakerTripped);
    }
    let series = provider.fetch(symbol, start, end)?.series;
    if series.len() < min_history {
        return Err(DataError::InsufficientHistory {
            symbol: symbol.to_string(),
            required: min_history,
            actual: series.len(),
        });
    }
    Ok(series)
}

/// Fetch `symbols` over the lookback window ending at `as_of`.
///
/// Symbols that fail to fetch or have fewer than `min_history` observations
/// are excluded and reported. If nothing is admitted the run cannot proceed
/// and `RunError::EmptyUniverse` is returned.
pub fn acquire_universe(
    symbols: &[String],
    provider: &dyn DataProvider,
    config: &DataConfig,
    as_of: NaiveDate,
    progress: &dyn DownloadProgress,
) -> Result<Universe, RunError> {
    let start = window_start(as_of, config.lookback_days);
    let total = symbols.len();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.concurrency.max(1))
        .build()
        .map_err(|e| RunError::ThreadPool(e.to_string()))?;

    let fetched: Vec<Result<PriceSeries, DataError>> = pool.install(|| {
        symbols
            .par_iter()
            .enumerate()
            .map(|(index, symbol)| {
                progress.on_start(symbol, index, total);
                let result = fetch_one(provider, symbol, start, as_of, config.min_history);
                progress.on_complete(
                    symbol,
                    index,
                    total,
                    result.as_ref().map(PriceSeries::len),
                );
                result
            })
            .collect()
    });

    let mut store = PriceStore::new();
    let mut excluded = Vec::new();
    for (symbol, result) in symbols.iter().zip(fetched) {
        match result {
            Ok(series) => {
                if !store.insert(series) {
                    excluded.push(ExcludedSymbol {
                        symbol: symbol.clone(),
                        reason: "duplicate symbol".into(),
                    });
                }
            }
            Err(e) => excluded.push(ExcludedSymbol {
                symbol: symbol.clone(),
                reason: e.to_string(),
            }),
        }
    }

    progress.on_batch_complete(store.len(), excluded.len(), total);

    if store.is_empty() {
        return Err(RunError::EmptyUniverse { requested: total });
    }

    Ok(Universe {
        store,
        requested: total,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairlab_core::data::{FetchResult, NoProgress, SyntheticProvider};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Serves synthetic data, but only `short_len` points for symbols starting with "SHORT"
    /// and a not-found error for symbols starting with "BAD".
    struct FixtureProvider {
        inner: SyntheticProvider,
        short_len: usize,
    }

    impl DataProvider for FixtureProvider {
        fn name(&self) -> &str {
            "fixture"
        }

        fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            if symbol.starts_with("BAD") {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            let mut result = self.inner.fetch(symbol, start, end)?;
            if symbol.starts_with("SHORT") {
                let points = result.series.points()[..self.short_len].to_vec();
                result.series = PriceSeries::new(symbol, points);
            }
            Ok(result)
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Becomes unavailable after a fixed number of fetches.
    struct TrippingProvider {
        inner: SyntheticProvider,
        calls: AtomicUsize,
        limit: usize,
    }

    impl DataProvider for TrippingProvider {
        fn name(&self) -> &str {
            "tripping"
        }

        fn fetch(
            &self,
            symbol: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<FetchResult, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch(symbol, start, end)
        }

        fn is_available(&self) -> bool {
            self.calls.load(Ordering::SeqCst) < self.limit
        }
    }

    #[test]
    fn window_start_subtracts_lookback() {
        assert_eq!(
            window_start(as_of(), 730),
            NaiveDate::from_ymd_opt(2022, 6, 29).unwrap()
        );
    }

    #[test]
    fn admits_in_symbol_order_and_reports_exclusions() {
        let provider = FixtureProvider {
            inner: SyntheticProvider::default(),
            short_len: 100,
        };
        let list = symbols(&["ZZZ", "SHORT1", "AAA", "BAD1", "MMM"]);
        let config = DataConfig {
            concurrency: 3,
            ..DataConfig::default()
        };

        let universe = acquire_universe(&list, &provider, &config, as_of(), &NoProgress).unwrap();

        assert_eq!(universe.store.symbols(), vec!["ZZZ", "AAA", "MMM"]);
        assert_eq!(universe.requested, 5);
        let excluded: Vec<&str> = universe.excluded.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(excluded, vec!["SHORT1", "BAD1"]);
        assert!(universe.excluded[0].reason.contains("insufficient history"));
    }

    #[test]
    fn admission_threshold_is_inclusive() {
        let provider = FixtureProvider {
            inner: SyntheticProvider::default(),
            short_len: 252,
        };
        let universe = acquire_universe(
            &symbols(&["SHORT_EXACT"]),
            &provider,
            &DataConfig::default(),
            as_of(),
            &NoProgress,
        )
        .unwrap();
        assert_eq!(universe.store.len(), 1);
        assert_eq!(universe.store.iter().next().unwrap().len(), 252);
    }

    #[test]
    fn nothing_admitted_is_fatal() {
        let provider = FixtureProvider {
            inner: SyntheticProvider::default(),
            short_len: 10,
        };
        let err = acquire_universe(
            &symbols(&["BAD1", "SHORT1"]),
            &provider,
            &DataConfig::default(),
            as_of(),
            &NoProgress,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::EmptyUniverse { requested: 2 }));

        let err = acquire_universe(&[], &provider, &DataConfig::default(), as_of(), &NoProgress)
            .unwrap_err();
        assert!(matches!(err, RunError::EmptyUniverse { requested: 0 }));
    }

    #[test]
    fn unavailable_provider_skips_remaining_symbols() {
        let provider = TrippingProvider {
            inner: SyntheticProvider::default(),
            calls: AtomicUsize::new(0),
            limit: 2,
        };
        let config = DataConfig {
            concurrency: 1,
            ..DataConfig::default()
        };
        let list = symbols(&["A1", "A2", "A3", "A4"]);
        let universe = acquire_universe(&list, &provider, &config, as_of(), &NoProgress).unwrap();

        assert_eq!(universe.store.len(), 2);
        assert_eq!(universe.excluded.len(), 2);
        assert!(universe.excluded[0].reason.contains("circuit breaker"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrency_does_not_change_the_store() {
        let provider = SyntheticProvider::default();
        let list = symbols(&["E_1", "E_2", "E_3", "F", "G", "H"]);
        let one = acquire_universe(
            &list,
            &provider,
            &DataConfig {
                concurrency: 1,
                ..DataConfig::default()
            },
            as_of(),
            &NoProgress,
        )
        .unwrap();
        let many = acquire_universe(
            &list,
            &provider,
            &DataConfig {
                concurrency: 6,
                ..DataConfig::default()
            },
            as_of(),
            &NoProgress,
        )
        .unwrap();
        assert_eq!(one.store.fingerprint(), many.store.fingerprint());
        assert_eq!(one.store.symbols(), many.store.symbols());
    }
}
