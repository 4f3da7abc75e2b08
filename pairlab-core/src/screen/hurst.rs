//! Hurst exponent of a spread from the scaling of lagged differences.
//!
//! For each lag L the dispersion of `x[t+L] - x[t]` is measured; its growth
//! with L on a log-log scale gives the exponent. Anti-persistent spreads
//! grow slower than a random walk and score below 0.5.

use super::{ScreenError, SpreadScreen, Stage};
use crate::domain::ScreenResult;
use crate::stats::{fit_line, population_std};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Estimate the Hurst exponent over lags `min_lag..max_lag`.
///
/// For each lag `tau = sqrt(std(x[L..] - x[..n-L]))` with the population
/// standard deviation, and the estimate is twice the slope of `ln tau` on
/// `ln L`. Lags leaving fewer than two differences are skipped, as are lags
/// whose `tau` is zero or not finite. Fewer than `min_valid_lags` usable lags
/// is an error.
pub fn hurst_exponent(
    values: &[f64],
    min_lag: usize,
    max_lag: usize,
    min_valid_lags: usize,
) -> Result<f64, ScreenError> {
    let n = values.len();
    let mut log_lags = Vec::with_capacity(max_lag.saturating_sub(min_lag));
    let mut log_tau = Vec::with_capacity(max_lag.saturating_sub(min_lag));

    for lag in min_lag.max(1)..max_lag {
        if n < lag + 2 {
            break;
        }
        let diffs: Vec<f64> = values[lag..]
            .iter()
            .zip(&values[..n - lag])
            .map(|(later, earlier)| later - earlier)
            .collect();
        let tau = population_std(&diffs).sqrt();
        if !tau.is_finite() || tau <= 0.0 {
            continue;
        }
        log_lags.push((lag as f64).ln());
        log_tau.push(tau.ln());
    }

    if log_lags.len() < min_valid_lags.max(2) {
        trace!(
            len = n,
            valid_lags = log_lags.len(),
            "Hurst: too few usable lags"
        );
        return Err(ScreenError::HurstEstimation {
            valid_lags: log_lags.len(),
            required: min_valid_lags.max(2),
        });
    }

    let fit = fit_line(&log_lags, &log_tau)?;
    let hurst = 2.0 * fit.slope;
    if !hurst.is_finite() {
        return Err(ScreenError::NonFinite("Hurst exponent"));
    }
    Ok(hurst)
}

/// Keeps spreads with `H < max_hurst`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HurstScreen {
    pub min_lag: usize,
    pub max_lag: usize,
    pub max_hurst: f64,
    pub min_valid_lags: usize,
}

impl Default for HurstScreen {
    fn default() -> Self {
        Self {
            min_lag: 2,
            max_lag: 100,
            max_hurst: 0.5,
            min_valid_lags: 5,
        }
    }
}

impl SpreadScreen for HurstScreen {
    fn stage(&self) -> Stage {
        Stage::Hurst
    }

    fn evaluate(&self, result: &mut ScreenResult) -> Result<bool, ScreenError> {
        let hurst = hurst_exponent(
            result.spread.values(),
            self.min_lag,
            self.max_lag,
            self.min_valid_lags,
        )?;
        result.stats.hurst = Some(hurst);
        Ok(hurst < self.max_hurst)
    }
}
