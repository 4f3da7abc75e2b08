//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over price sources (Yahoo Finance, a CSV
//! directory, synthetic generation) so the runner can swap them and tests
//! can run offline.

use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Per-symbol data failures. Each one excludes only the symbol concerned.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("insufficient history for '{symbol}': need {required} observations, got {actual}")]
    InsufficientHistory {
        symbol: String,
        required: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub series: PriceSeries,
    pub source: DataSource,
}

impl FetchResult {
    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// A source of daily adjusted-close history.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily adjusted closes for `symbol` with dates in `[start, end]`.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// False once the provider has stopped serving requests (e.g. banned).
    fn is_available(&self) -> bool;
}

/// Progress callback for multi-symbol acquisition.
///
/// Called from worker threads, so implementations must be `Sync`.
pub trait DownloadProgress: Send + Sync {
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// `outcome` carries the number of observations admitted, or the reason
    /// the symbol was excluded.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, outcome: Result<usize, &DataError>);

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that emits tracing events.
pub struct LogProgress;

impl DownloadProgress for LogProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        debug!(symbol, progress = format!("{}/{}", index + 1, total), "fetching");
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        outcome: Result<usize, &DataError>,
    ) {
        match outcome {
            Ok(observations) => debug!(symbol, observations, "fetched"),
            Err(e) => warn!(symbol, error = %e, "excluding symbol"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        info!(succeeded, failed, total, "data acquisition complete");
    }
}

/// Progress reporter that discards every event.
pub struct NoProgress;

impl DownloadProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _outcome: Result<usize, &DataError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
