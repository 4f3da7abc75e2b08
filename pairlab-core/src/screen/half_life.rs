//! Mean-reversion half-life from a discrete Ornstein-Uhlenbeck fit.

use super::{ScreenError, SpreadScreen, Stage};
use crate::domain::ScreenResult;
use crate::stats::fit_line;
use serde::{Deserialize, Serialize};

/// Half-life of mean reversion in observations.
///
/// Regresses `s[t] - s[t-1]` on `s[t-1]` with an intercept. For a reversion
/// coefficient `theta < 0` the half-life is `-ln 2 / theta`. Returns
/// `Ok(None)` when `theta >= 0` (no reversion) or the result is not finite.
pub fn half_life(values: &[f64]) -> Result<Option<f64>, ScreenError> {
    if values.len() < 3 {
        return Err(ScreenError::InsufficientOverlap {
            required: 3,
            actual: values.len(),
        });
    }

    let lagged = &values[..values.len() - 1];
    let delta: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let theta = fit_line(lagged, &delta)?.slope;
    if !theta.is_finite() {
        return Err(ScreenError::NonFinite("reversion coefficient"));
    }
    if theta >= 0.0 {
        return Ok(None);
    }

    let hl = -std::f64::consts::LN_2 / theta;
    Ok(hl.is_finite().then_some(hl))
}

/// Keeps spreads with `min_days < half_life < max_days`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HalfLifeScreen {
    pub min_days: f64,
    pub max_days: f64,
}

impl Default for HalfLifeScreen {
    fn default() -> Self {
        Self {
            min_days: 1.0,
            max_days: 252.0,
        }
    }
}

impl HalfLifeScreen {
    /// Strict on both ends.
    pub fn accepts(&self, half_life: f64) -> bool {
        half_life > self.min_days && half_life < self.max_days
    }
}

impl SpreadScreen for HalfLifeScreen {
    fn stage(&self) -> Stage {
        Stage::HalfLife
    }

    fn evaluate(&self, result: &mut ScreenResult) -> Result<bool, ScreenError> {
        match half_life(result.spread.values())? {
            Some(hl) => {
                result.stats.half_life = Some(hl);
                Ok(self.accepts(hl))
            }
            None => Ok(false),
        }
    }
}
