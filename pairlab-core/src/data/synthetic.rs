//! Deterministic synthetic prices for offline runs and demos.
//!
//! Every symbol's path is seeded from a BLAKE3 hash of its name, so the same
//! symbol always produces the same prices. Symbols of the form
//! `<GROUP>_<NAME>` share a common random-walk factor seeded from the group
//! name: each member is `beta * factor + offset + AR(1) noise`, which makes
//! any two members of a group cointegrated. Other symbols are independent
//! geometric random walks.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// AR(1) coefficient of the member-specific noise (half-life about 3 days).
const NOISE_PERSISTENCE: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    group_separator: char,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            group_separator: '_',
        }
    }
}

fn seeded_rng(key: &str) -> StdRng {
    StdRng::from_seed(*blake3::hash(key.as_bytes()).as_bytes())
}

fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Weekdays in `[start, end]`.
fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

impl SyntheticProvider {
    pub fn new(group_separator: char) -> Self {
        Self { group_separator }
    }

    fn group_of<'a>(&self, symbol: &'a str) -> Option<&'a str> {
        symbol
            .split_once(self.group_separator)
            .map(|(group, _)| group)
            .filter(|group| !group.is_empty())
    }

    /// Generate `n` prices for `symbol`.
    pub fn generate(&self, symbol: &str, n: usize) -> Vec<f64> {
        match self.group_of(symbol) {
            Some(group) => {
                let mut factor_rng = seeded_rng(&format!("group:{group}"));
                let mut member_rng = seeded_rng(symbol);
                let beta = member_rng.gen_range(0.5..2.0);
                let offset = member_rng.gen_range(5.0..25.0);

                let mut factor = 100.0;
                let mut noise = 0.0;
                (0..n)
                    .map(|_| {
                        factor += standard_normal(&mut factor_rng);
                        noise = NOISE_PERSISTENCE * noise + standard_normal(&mut member_rng);
                        beta * factor + offset + noise
                    })
                    .collect()
            }
            None => {
                let mut rng = seeded_rng(symbol);
                let mut price = 100.0_f64;
                (0..n)
                    .map(|_| {
                        price *= 1.0 + rng.gen_range(-0.02..0.02);
                        price
                    })
                    .collect()
            }
        }
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if symbol.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let dates = business_days(start, end);
        let prices = self.generate(symbol, dates.len());
        let points = dates
            .into_iter()
            .zip(prices)
            .map(|(date, price)| PricePoint::new(date, price))
            .collect();

        Ok(FetchResult {
            series: PriceSeries::new(symbol, points),
            source: DataSource::Synthetic,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::engle_granger;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_symbol_same_prices() {
        let p = SyntheticProvider::default();
        assert_eq!(p.generate("SPY", 50), p.generate("SPY", 50));
        assert_ne!(p.generate("SPY", 50), p.generate("QQQ", 50));
    }

    #[test]
    fn skips_weekends() {
        // 2024-01-01 is a Monday; two full weeks give ten trading days.
        let result = SyntheticProvider::default()
            .fetch("SPY", date(2024, 1, 1), date(2024, 1, 14))
            .unwrap();
        assert_eq!(result.series.len(), 10);
        assert_eq!(result.source, DataSource::Synthetic);
        assert!(result
            .series
            .points()
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn group_members_are_cointegrated() {
        let p = SyntheticProvider::default();
        let a = p.generate("OIL_XOM", 504);
        let b = p.generate("OIL_CVX", 504);
        assert!(engle_granger(&a, &b).unwrap().p_value < 0.01);
    }

    #[test]
    fn empty_group_name_is_ungrouped() {
        let p = SyntheticProvider::default();
        assert_eq!(p.group_of("_X"), None);
        assert_eq!(p.group_of("OIL_XOM"), Some("OIL"));
        assert_eq!(p.group_of("SPY"), None);
    }
}
