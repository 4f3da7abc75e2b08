//! Pair: an unordered pair of distinct symbols, and combinatorial enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two distinct symbols, in the order they were admitted to the universe.
///
/// `symbol_a` is the earlier symbol. It is the dependent variable of the
/// cointegration regression; `symbol_b` carries the hedge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub symbol_a: String,
    pub symbol_b: String,
}

impl Pair {
    pub fn new(symbol_a: impl Into<String>, symbol_b: impl Into<String>) -> Self {
        Self {
            symbol_a: symbol_a.into(),
            symbol_b: symbol_b.into(),
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.symbol_a, self.symbol_b)
    }
}

/// All C(N, 2) unordered pairs of `symbols`, in lexicographic index order.
///
/// Fewer than two symbols yield an empty list. Callers are expected to pass
/// a list without duplicates (the universe guarantees this).
pub fn enumerate_pairs<S: AsRef<str>>(symbols: &[S]) -> Vec<Pair> {
    let n = symbols.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(Pair::new(symbols[i].as_ref(), symbols[j].as_ref()));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn three_symbols_yield_three_pairs_in_order() {
        let pairs = enumerate_pairs(&["AAA", "BBB", "CCC"]);
        assert_eq!(
            pairs,
            vec![
                Pair::new("AAA", "BBB"),
                Pair::new("AAA", "CCC"),
                Pair::new("BBB", "CCC"),
            ]
        );
    }

    #[test]
    fn fewer_than_two_symbols_yield_nothing() {
        assert!(enumerate_pairs::<&str>(&[]).is_empty());
        assert!(enumerate_pairs(&["AAA"]).is_empty());
    }

    #[test]
    fn no_pair_appears_in_both_orders() {
        let symbols: Vec<String> = (0..12).map(|i| format!("S{i}")).collect();
        let pairs = enumerate_pairs(&symbols);
        let mut seen = HashSet::new();
        for p in &pairs {
            assert_ne!(p.symbol_a, p.symbol_b);
            assert!(!seen.contains(&(p.symbol_b.clone(), p.symbol_a.clone())));
            assert!(seen.insert((p.symbol_a.clone(), p.symbol_b.clone())));
        }
        assert_eq!(pairs.len(), 66);
    }

    #[test]
    fn display_is_comma_separated() {
        assert_eq!(Pair::new("KO", "PEP").to_string(), "KO,PEP");
    }
}
