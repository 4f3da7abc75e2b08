//! Stateless numerics for the screens.
//!
//! Every routine here is a pure function of its inputs: regressions are fit
//! fresh on each call and hold no state between pairs, so the screens can
//! run on any number of threads without coordination.

pub mod adf;
pub mod distribution;
pub mod regression;

pub use adf::{adf_test, engle_granger, mackinnon_p, AdfResult, CointTest};
pub use distribution::normal_cdf;
pub use regression::{fit_line, least_squares, LeastSquaresFit, LineFit};

use thiserror::Error;

/// Failures of the numeric routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("singular design matrix: {0}")]
    Singular(String),

    #[error("input lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor `n`). Zero for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
