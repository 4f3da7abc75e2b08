//! The four statistical screens a pair must pass.
//!
//! - `CointegrationScreen`: Engle-Granger test, hedge ratio, spread construction
//! - `HurstScreen`: anti-persistence of the spread
//! - `HalfLifeScreen`: mean-reversion speed within a tradeable range
//! - `CrossingScreen`: frequency of mean crossings
//!
//! The cointegration screen turns a `Pair` into a `ScreenResult`; the other
//! three implement `SpreadScreen` and act on an existing result. Every error
//! here is local to one pair: the caller drops the pair and moves on.

pub mod cointegration;
pub mod crossing;
pub mod half_life;
pub mod hurst;

pub use cointegration::CointegrationScreen;
pub use crossing::{count_mean_crossings, CrossingScreen};
pub use half_life::{half_life, HalfLifeScreen};
pub use hurst::{hurst_exponent, HurstScreen};

use crate::domain::ScreenResult;
use crate::stats::StatsError;
use thiserror::Error;

/// Per-pair screening failures. None of these abort a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    #[error("aligned sample too small: need {required} shared dates, got {actual}")]
    InsufficientOverlap { required: usize, actual: usize },

    #[error("degenerate regression: {0}")]
    DegenerateRegression(String),

    #[error("Hurst estimation failed: {valid_lags} valid lags, need {required}")]
    HurstEstimation { valid_lags: usize, required: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

impl From<StatsError> for ScreenError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::NonFinite(what) => ScreenError::NonFinite(what),
            StatsError::InsufficientData { required, actual } => {
                ScreenError::InsufficientOverlap { required, actual }
            }
            other => ScreenError::DegenerateRegression(other.to_string()),
        }
    }
}

/// Identifies a pipeline stage in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cointegration,
    Hurst,
    HalfLife,
    Crossing,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Cointegration => "cointegration",
            Stage::Hurst => "hurst",
            Stage::HalfLife => "half_life",
            Stage::Crossing => "crossing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A screen over an already constructed spread.
///
/// `evaluate` records its statistic into `result.stats` and returns whether
/// the pair survives. Implementations never modify the spread itself.
pub trait SpreadScreen: Send + Sync {
    fn stage(&self) -> Stage;

    fn evaluate(&self, result: &mut ScreenResult) -> Result<bool, ScreenError>;
}
