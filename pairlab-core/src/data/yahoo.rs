//! Yahoo Finance data provider.
//!
//! Fetches daily adjusted closes from Yahoo's v8 chart API. Handles rate
//! limiting, retries with exponential backoff, response parsing, and the
//! circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. `CsvProvider` is the fallback when Yahoo is unavailable.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{PricePoint, PriceSeries};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Longest single wait between attempts, including a server `Retry-After`.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Wait before retry number `attempt` (1-based): exponential from `base`,
/// stretched to the server's `Retry-After` when given, capped at `MAX_BACKOFF`.
fn backoff_delay(base: Duration, attempt: u32, retry_after: Option<Duration>) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    let exponential = base.saturating_mul(factor);
    retry_after
        .map_or(exponential, |wait| exponential.max(wait))
        .min(MAX_BACKOFF)
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(
        circuit_breaker: Arc<CircuitBreaker>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // Inclusive end: up to the last second of `end`.
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Parse a chart API body into dated adjusted closes.
    ///
    /// Falls back to the raw close when the adjusted series is missing.
    /// Days without a price (holidays, halts) are dropped.
    fn parse_chart(symbol: &str, body: &str) -> Result<Vec<PricePoint>, DataError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data.timestamp.unwrap_or_default();

        let prices = match data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
        {
            Some(adj) => adj.adjclose,
            None => {
                warn!(symbol, "no adjusted close in response, using raw close");
                data.indicators
                    .quote
                    .into_iter()
                    .next()
                    .map(|q| q.close)
                    .ok_or_else(|| DataError::ResponseFormatChanged("no price data".into()))?
            }
        };

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;
            if let Some(price) = prices.get(i).copied().flatten() {
                points.push(PricePoint::new(date, price));
            }
        }

        if points.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(points)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;
        let mut retry_after = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.base_delay, attempt, retry_after.take());
                debug!(symbol, attempt, delay_ms = delay.as_millis() as u64, "retrying");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after_secs = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                retry_after = Some(Duration::from_secs(retry_after_secs));
                last_error = Some(DataError::RateLimited {
                    retry_after_secs,
                });
                continue;
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let body = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
            let points = Self::parse_chart(symbol, &body)?;
            self.circuit_breaker.record_success();
            return Ok(points);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let points = self.fetch_with_retry(symbol, start, end)?;
        Ok(FetchResult {
            series: PriceSeries::new(symbol, points),
            source: DataSource::YahooFinance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{"close": [185.6, 184.2, 181.9]}],
                    "adjclose": [{"adjclose": [184.9, null, 181.2]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_adjusted_closes_and_skips_gaps() {
        let points = YahooProvider::parse_chart("AAPL", BODY).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[0].price, 184.9);
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn falls_back_to_raw_close() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1704205800],
            "indicators": {"quote": [{"close": [185.6]}]}
        }], "error": null}}"#;
        let points = YahooProvider::parse_chart("AAPL", body).unwrap();
        assert_eq!(points[0].price, 185.6);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let body = r#"{"chart": {"result": null,
            "error": {"code": "Not Found", "description": "No data found"}}}"#;
        assert!(matches!(
            YahooProvider::parse_chart("NOPE", body),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn garbage_is_a_format_change() {
        assert!(matches!(
            YahooProvider::parse_chart("AAPL", "<html>"),
            Err(DataError::ResponseFormatChanged(_))
        ));
    }

    #[test]
    fn url_covers_whole_end_day() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let url = YahooProvider::chart_url("MSFT", d, d);
        assert!(url.contains("/chart/MSFT?"));
        assert!(url.contains("period1=1704153600"));
        assert!(url.contains("period2=1704239999"));
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1, None), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 3, None), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 40, None), MAX_BACKOFF);
        assert_eq!(backoff_delay(base, u32::MAX, None), MAX_BACKOFF);
    }

    #[test]
    fn backoff_honours_retry_after() {
        let base = Duration::from_millis(500);
        let wait = Some(Duration::from_secs(7));
        assert_eq!(backoff_delay(base, 1, wait), Duration::from_secs(7));
        assert_eq!(backoff_delay(base, 1, Some(Duration::from_secs(3600))), MAX_BACKOFF);
    }

    #[test]
    fn tripped_breaker_short_circuits_fetch() {
        let breaker = Arc::new(CircuitBreaker::default_provider());
        breaker.trip();
        let provider = YahooProvider::new(breaker, Duration::from_secs(1), 0).unwrap();
        assert!(!provider.is_available());
        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(matches!(
            provider.fetch("MSFT", d, d),
            Err(DataError::CircuitBreakerTripped)
        ));
    }
}
