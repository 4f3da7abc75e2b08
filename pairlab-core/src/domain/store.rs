//! PriceStore: the admitted universe, in admission order.

use super::series::PriceSeries;
use std::collections::HashMap;

/// Ordered collection of admitted price series, one per symbol.
///
/// Iteration order is insertion order, which fixes the pair enumeration
/// order and therefore the order of the final output.
#[derive(Debug, Clone, Default)]
pub struct PriceStore {
    series: Vec<PriceSeries>,
    index: HashMap<String, usize>,
}

impl PriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series. Returns false (and keeps the existing one) if the
    /// symbol is already present.
    pub fn insert(&mut self, series: PriceSeries) -> bool {
        if self.index.contains_key(series.symbol()) {
            return false;
        }
        self.index
            .insert(series.symbol().to_string(), self.series.len());
        self.series.push(series);
        true
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSeries> {
        self.index.get(symbol).map(|&i| &self.series[i])
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.symbol()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Deterministic BLAKE3 fingerprint over every admitted observation.
    ///
    /// Covers symbols in store order, then each date and price, so two
    /// stores with identical content hash identically.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for series in &self.series {
            hasher.update(series.symbol().as_bytes());
            hasher.update(&(series.len() as u64).to_le_bytes());
            for point in series.points() {
                hasher.update(point.date.to_string().as_bytes());
                hasher.update(&point.price.to_le_bytes());
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl FromIterator<PriceSeries> for PriceStore {
    fn from_iter<I: IntoIterator<Item = PriceSeries>>(iter: I) -> Self {
        let mut store = Self::new();
        for series in iter {
            store.insert(series);
        }
        store
    }
}
