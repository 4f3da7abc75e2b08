//! PriceSeries: one symbol's daily adjusted-close history, and pairwise alignment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation: the adjusted close on a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Chronologically sorted daily price series with unique dates.
///
/// Construction normalizes provider output: points are sorted by date, later
/// duplicates of a date replace earlier ones, and non-finite prices (holiday
/// rows, missing quotes) are dropped. After construction the series is
/// immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.price.is_finite());
        // Stable sort keeps provider order among equal dates, so the last
        // occurrence wins after the reverse dedup below.
        points.sort_by_key(|p| p.date);
        points.reverse();
        points.dedup_by_key(|p| p.date);
        points.reverse();

        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Build a series from prices on consecutive calendar days starting at `start`.
    ///
    /// Mostly useful for fixtures and synthetic data.
    pub fn from_prices(symbol: impl Into<String>, start: NaiveDate, prices: &[f64]) -> Self {
        let points = prices
            .iter()
            .scan(start, |date, &price| {
                let point = PricePoint::new(*date, price);
                *date = date.succ_opt().unwrap_or(*date);
                Some(point)
            })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Inner join of two series on their shared dates.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeriesPair {
    pub dates: Vec<NaiveDate>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl AlignedSeriesPair {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Align two series on the dates they have in common.
///
/// Both inputs are sorted with unique dates, so a single merge pass suffices.
/// The result has length at most `min(a.len(), b.len())`.
pub fn align(a: &PriceSeries, b: &PriceSeries) -> AlignedSeriesPair {
    let capacity = a.len().min(b.len());
    let mut aligned = AlignedSeriesPair {
        dates: Vec::with_capacity(capacity),
        a: Vec::with_capacity(capacity),
        b: Vec::with_capacity(capacity),
    };

    let (pa, pb) = (a.points(), b.points());
    let (mut i, mut j) = (0, 0);
    while i < pa.len() && j < pb.len() {
        match pa[i].date.cmp(&pb[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                aligned.dates.push(pa[i].date);
                aligned.a.push(pa[i].price);
                aligned.b.push(pb[j].price);
                i += 1;
                j += 1;
            }
        }
    }

    aligned
}
