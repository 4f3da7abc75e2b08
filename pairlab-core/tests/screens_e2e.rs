//! End-to-end screening of synthetic pairs through all four screens.
//!
//! Tests:
//! 1. b = 2a + mean-reverting noise passes cointegration, Hurst, half-life, crossings
//! 2. Independent random walks are rejected at the cointegration stage
//! 3. Screening is deterministic: same inputs, same statistics
//! 4. Synthetic provider groups yield a surviving pair

use chrono::NaiveDate;
use pairlab_core::data::{DataProvider, SyntheticProvider};
use pairlab_core::domain::{Pair, PriceSeries, ScreenResult};
use pairlab_core::screen::{
    CointegrationScreen, CrossingScreen, HalfLifeScreen, HurstScreen, ScreenError, SpreadScreen,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

const N: usize = 504;

fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn random_walk(rng: &mut StdRng, start: f64) -> Vec<f64> {
    let mut level = start;
    (0..N)
        .map(|_| {
            level += gaussian(rng);
            level
        })
        .collect()
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

/// series_a is a random walk; series_b = 2 * series_a + AR(0.8) noise.
fn linked_pair(seed: u64) -> (PriceSeries, PriceSeries) {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = random_walk(&mut rng, 100.0);
    let mut noise = 0.0;
    let b: Vec<f64> = a
        .iter()
        .map(|x| {
            noise = 0.8 * noise + gaussian(&mut rng);
            2.0 * x + noise
        })
        .collect();
    (
        PriceSeries::from_prices("AAA", start(), &a),
        PriceSeries::from_prices("BBB", start(), &b),
    )
}

/// Run all four screens; `Ok(None)` means rejected somewhere along the way.
fn screen_pair(
    a: &PriceSeries,
    b: &PriceSeries,
) -> Result<Option<ScreenResult>, ScreenError> {
    let pair = Pair::new(a.symbol(), b.symbol());
    let Some(mut result) = CointegrationScreen::default().screen(&pair, a, b)? else {
        return Ok(None);
    };
    let screens: [&dyn SpreadScreen; 3] = [
        &HurstScreen::default(),
        &HalfLifeScreen::default(),
        &CrossingScreen::default(),
    ];
    for screen in screens {
        if !screen.evaluate(&mut result)? {
            return Ok(None);
        }
    }
    Ok(Some(result))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[test]
fn linked_pair_survives_every_screen() {
    let (a, b) = linked_pair(42);
    let result = screen_pair(&a, &b)
        .unwrap()
        .expect("linked pair should survive");

    let stats = &result.stats;
    assert_eq!(stats.observations, N);
    assert!(stats.p_value < 0.05);
    assert!((stats.hedge_ratio - 2.0).abs() < 0.05, "beta = {}", stats.hedge_ratio);
    assert!(stats.hurst.unwrap() < 0.5);
    let hl = stats.half_life.unwrap();
    assert!(hl > 1.0 && hl < 252.0, "half-life = {hl}");
    assert!(stats.crossings.unwrap() > 12);
    assert_eq!(result.pair.to_string(), "AAA,BBB");
}

#[test]
fn independent_walks_fail_cointegration() {
    let screen = CointegrationScreen::default();
    let mut rejected = 0;
    for seed in 0..10u64 {
        let mut rng = StdRng::seed_from_u64(1000 + seed);
        let a = PriceSeries::from_prices("AAA", start(), &random_walk(&mut rng, 100.0));
        let b = PriceSeries::from_prices("BBB", start(), &random_walk(&mut rng, 100.0));
        if screen.screen(&Pair::new("AAA", "BBB"), &a, &b).unwrap().is_none() {
            rejected += 1;
        }
    }
    assert!(rejected >= 6, "only {rejected}/10 independent pairs rejected");
}

#[test]
fn screening_is_deterministic() {
    let (a, b) = linked_pair(7);
    let first = screen_pair(&a, &b).unwrap().map(|r| r.stats);
    let second = screen_pair(&a, &b).unwrap().map(|r| r.stats);
    assert_eq!(first, second);
}

#[test]
fn synthetic_group_members_pair_up() {
    let provider = SyntheticProvider::default();
    let from = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let to = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
    let a = provider.fetch("BANK_ONE", from, to).unwrap().series;
    let b = provider.fetch("BANK_TWO", from, to).unwrap().series;
    assert!(a.len() >= 500);

    let result = screen_pair(&a, &b).unwrap();
    assert!(result.is_some());
}
