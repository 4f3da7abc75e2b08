//! Mean-crossing frequency.

use super::{ScreenError, SpreadScreen, Stage};
use crate::domain::ScreenResult;
use crate::stats::mean;
use serde::{Deserialize, Serialize};

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Number of sign changes between consecutive values of the de-meaned series.
///
/// Zero is its own sign, so `[1, 0, -1]` around a zero mean counts twice.
pub fn count_mean_crossings(values: &[f64]) -> usize {
    let centre = mean(values);
    values
        .windows(2)
        .filter(|w| sign(w[0] - centre) != sign(w[1] - centre))
        .count()
}

/// Keeps spreads crossing their mean more than `min_crossings` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrossingScreen {
    pub min_crossings: usize,
}

impl Default for CrossingScreen {
    fn default() -> Self {
        Self { min_crossings: 12 }
    }
}

impl SpreadScreen for CrossingScreen {
    fn stage(&self) -> Stage {
        Stage::Crossing
    }

    fn evaluate(&self, result: &mut ScreenResult) -> Result<bool, ScreenError> {
        if !result.spread.all_finite() {
            return Err(ScreenError::NonFinite("spread"));
        }
        let crossings = count_mean_crossings(result.spread.values());
        result.stats.crossings = Some(crossings);
        Ok(crossings > self.min_crossings)
    }
}
