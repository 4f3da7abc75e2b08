//! Spread and ScreenResult: the unit of data flowing between screens.

use super::pair::Pair;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `price_b[t] - hedge_ratio * price_a[t]` over the aligned dates of a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    hedge_ratio: f64,
}

impl Spread {
    /// Construct the spread from aligned prices and a hedge ratio.
    ///
    /// Panics if the three slices differ in length; callers always pass the
    /// columns of one `AlignedSeriesPair`.
    pub fn from_prices(dates: &[NaiveDate], a: &[f64], b: &[f64], hedge_ratio: f64) -> Self {
        assert_eq!(a.len(), b.len(), "aligned columns must have equal length");
        assert_eq!(dates.len(), a.len(), "date index must match aligned columns");
        let values = a
            .iter()
            .zip(b)
            .map(|(pa, pb)| pb - hedge_ratio * pa)
            .collect();
        Self {
            dates: dates.to_vec(),
            values,
            hedge_ratio,
        }
    }

    /// Wrap an already computed spread (no date index needed by the screens).
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            dates: Vec::new(),
            values,
            hedge_ratio: f64::NAN,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn hedge_ratio(&self) -> f64 {
        self.hedge_ratio
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Statistics gathered for a pair as it passes through the screens.
///
/// Each screen fills in its own field; later fields stay `None` for pairs
/// rejected earlier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub observations: usize,
    /// ADF statistic of the residuals; `None` when the levels fit is exact.
    pub coint_statistic: Option<f64>,
    pub p_value: f64,
    pub hedge_ratio: f64,
    pub hurst: Option<f64>,
    pub half_life: Option<f64>,
    pub crossings: Option<usize>,
}

/// A pair plus its spread. The spread is never modified after construction.
#[derive(Debug, Clone)]
pub struct ScreenResult {
    pub pair: Pair,
    pub spread: Spread,
    pub stats: PairStats,
}

impl ScreenResult {
    pub fn new(pair: Pair, spread: Spread, stats: PairStats) -> Self {
        Self {
            pair,
            spread,
            stats,
        }
    }
}
