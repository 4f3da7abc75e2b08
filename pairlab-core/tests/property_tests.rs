//! Property tests for core invariants.
//!
//! Uses proptest to verify:
//! 1. Pair enumeration yields exactly C(N, 2) distinct unordered pairs
//! 2. Spread identity: spread[t] = b[t] - beta * a[t] for every t
//! 3. Alignment keeps only shared dates, in order
//! 4. Crossing counts never exceed the number of steps

use chrono::NaiveDate;
use pairlab_core::domain::{align, enumerate_pairs, PricePoint, PriceSeries, Spread};
use pairlab_core::screen::count_mean_crossings;
use proptest::prelude::*;
use std::collections::HashSet;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), len)
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

// ── 1. Pair enumeration ──────────────────────────────────────────────

proptest! {
    #[test]
    fn enumeration_count_and_uniqueness(n in 0usize..40) {
        let symbols: Vec<String> = (0..n).map(|i| format!("SYM{i:02}")).collect();
        let pairs = enumerate_pairs(&symbols);

        prop_assert_eq!(pairs.len(), n * n.saturating_sub(1) / 2);

        let mut unordered = HashSet::new();
        for p in &pairs {
            prop_assert_ne!(&p.symbol_a, &p.symbol_b);
            let key = if p.symbol_a < p.symbol_b {
                (p.symbol_a.clone(), p.symbol_b.clone())
            } else {
                (p.symbol_b.clone(), p.symbol_a.clone())
            };
            prop_assert!(unordered.insert(key));
        }
    }
}

// ── 2. Spread identity ───────────────────────────────────────────────

proptest! {
    #[test]
    fn spread_matches_definition(
        (a, b) in (2usize..80).prop_flat_map(|n| (arb_prices(n), arb_prices(n))),
        beta in -5.0..5.0_f64,
    ) {
        let dates: Vec<NaiveDate> = (0..a.len())
            .map(|i| base_date() + chrono::Duration::days(i as i64))
            .collect();
        let spread = Spread::from_prices(&dates, &a, &b, beta);

        prop_assert_eq!(spread.len(), a.len());
        for t in 0..a.len() {
            prop_assert!((spread.values()[t] - (b[t] - beta * a[t])).abs() < 1e-9);
        }
    }
}

// ── 3. Alignment ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn alignment_keeps_only_shared_dates(
        days_a in prop::collection::btree_set(0i64..200, 0..120),
        days_b in prop::collection::btree_set(0i64..200, 0..120),
    ) {
        let series = |name: &str, days: &std::collections::BTreeSet<i64>| {
            let points = days
                .iter()
                .map(|d| PricePoint::new(base_date() + chrono::Duration::days(*d), *d as f64 + 1.0))
                .collect();
            PriceSeries::new(name, points)
        };
        let a = series("AAA", &days_a);
        let b = series("BBB", &days_b);
        let aligned = align(&a, &b);

        let shared: Vec<i64> = days_a.intersection(&days_b).copied().collect();
        prop_assert_eq!(aligned.len(), shared.len());
        for (i, d) in shared.iter().enumerate() {
            prop_assert_eq!(aligned.dates[i], base_date() + chrono::Duration::days(*d));
            prop_assert_eq!(aligned.a[i], *d as f64 + 1.0);
            prop_assert_eq!(aligned.b[i], *d as f64 + 1.0);
        }
    }
}

// ── 4. Crossing bound ────────────────────────────────────────────────

proptest! {
    #[test]
    fn crossings_bounded_by_steps(values in prop::collection::vec(-50.0..50.0_f64, 0..300)) {
        let crossings = count_mean_crossings(&values);
        prop_assert!(crossings <= values.len().saturating_sub(1));
    }
}
