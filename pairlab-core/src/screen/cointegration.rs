//! Cointegration screen: align, test, fit the hedge ratio, build the spread.

use super::ScreenError;
use crate::domain::{align, Pair, PairStats, PriceSeries, ScreenResult, Spread};
use crate::stats::{engle_granger, fit_line};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Engle-Granger screen with an OLS hedge ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CointegrationScreen {
    /// Pairs with p-value at or above this are rejected.
    pub significance: f64,
    /// Minimum number of shared dates.
    pub min_overlap: usize,
}

impl Default for CointegrationScreen {
    fn default() -> Self {
        Self {
            significance: 0.05,
            min_overlap: 30,
        }
    }
}

impl CointegrationScreen {
    pub fn new(significance: f64, min_overlap: usize) -> Self {
        Self {
            significance,
            min_overlap,
        }
    }

    /// Screen one pair.
    ///
    /// Returns `Ok(None)` when the test is not significant, `Ok(Some(..))`
    /// with the spread `b - beta * a` when it is, and an error for samples
    /// that cannot be tested meaningfully.
    pub fn screen(
        &self,
        pair: &Pair,
        series_a: &PriceSeries,
        series_b: &PriceSeries,
    ) -> Result<Option<ScreenResult>, ScreenError> {
        let aligned = align(series_a, series_b);
        if aligned.len() < self.min_overlap {
            return Err(ScreenError::InsufficientOverlap {
                required: self.min_overlap,
                actual: aligned.len(),
            });
        }

        let test = engle_granger(&aligned.a, &aligned.b)?;
        if test.p_value.is_nan() {
            return Err(ScreenError::NonFinite("cointegration p-value"));
        }
        if test.p_value >= self.significance {
            debug!(
                pair = %pair,
                p_value = format!("{:.4}", test.p_value),
                "not cointegrated"
            );
            return Ok(None);
        }

        let beta = hedge_ratio(&aligned.a, &aligned.b)?;
        let spread = Spread::from_prices(&aligned.dates, &aligned.a, &aligned.b, beta);
        if !spread.all_finite() {
            return Err(ScreenError::NonFinite("spread"));
        }

        let stats = PairStats {
            observations: aligned.len(),
            coint_statistic: test.statistic.is_finite().then_some(test.statistic),
            p_value: test.p_value,
            hedge_ratio: beta,
            ..PairStats::default()
        };

        Ok(Some(ScreenResult::new(pair.clone(), spread, stats)))
    }
}

/// Slope of the OLS regression of `b` on `a` with intercept.
pub fn hedge_ratio(a: &[f64], b: &[f64]) -> Result<f64, ScreenError> {
    let fit = fit_line(a, b).map_err(|e| ScreenError::DegenerateRegression(e.to_string()))?;
    if !fit.slope.is_finite() {
        return Err(ScreenError::DegenerateRegression(
            "hedge ratio is not finite".into(),
        ));
    }
    Ok(fit.slope)
}
