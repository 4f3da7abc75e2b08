//! Augmented Dickey-Fuller and Engle-Granger cointegration tests.
//!
//! Implements from first principles:
//! - ADF regression without deterministic terms, lag order by minimum AIC
//! - MacKinnon (1994) response-surface p-values for the two-variable,
//!   constant-only cointegration case
//! - Engle-Granger two-step test: levels regression with constant, then ADF
//!   on the residuals

use super::distribution::normal_cdf;
use super::regression::{fit_line, least_squares};
use super::StatsError;

// ─── MacKinnon p-values ──────────────────────────────────────────────

/// Statistics above this bound have p-value 1.
const TAU_MAX: f64 = 0.92;
/// Statistics below this bound have p-value 0.
const TAU_MIN: f64 = -18.86;
/// Boundary between the small-p and large-p polynomial fits.
const TAU_STAR: f64 = -2.62;
/// Small-p polynomial coefficients (constant first), already rescaled.
const TAU_SMALL_P: [f64; 3] = [2.92, 1.5012, 3.9796e-2];
/// Large-p polynomial coefficients (constant first), already rescaled.
const TAU_LARGE_P: [f64; 4] = [2.1945, 6.4695e-1, -2.9198e-1, -4.2377e-2];

/// Approximate asymptotic p-value of an Engle-Granger statistic for two
/// series with a constant in the cointegrating regression.
pub fn mackinnon_p(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    // Horner, highest power first.
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * statistic + c);
    normal_cdf(z)
}

// ─── ADF ─────────────────────────────────────────────────────────────

/// Outcome of an ADF regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-value of the lagged-level coefficient.
    pub statistic: f64,
    /// Number of lagged differences in the final regression.
    pub used_lag: usize,
    /// Observations in the final regression.
    pub nobs: usize,
}

/// Default maximum lag: `ceil(12 * (n / 100)^(1/4))`, capped at `n / 2 - 1`.
fn default_max_lag(n: usize) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    schwert.min((n / 2).saturating_sub(1))
}

/// Build the ADF design for `lags` lagged differences.
///
/// Rows run over `t = lags ..= n - 2`. The target is `x[t+1] - x[t]`; the
/// first column is the level `x[t]`, then `diff[t-1] .. diff[t-lags]`.
fn adf_design(x: &[f64], diff: &[f64], lags: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let rows = lags..diff.len();
    let target: Vec<f64> = rows.clone().map(|t| diff[t]).collect();

    let mut columns = Vec::with_capacity(lags + 1);
    columns.push(rows.clone().map(|t| x[t]).collect());
    for j in 1..=lags {
        columns.push(rows.clone().map(|t| diff[t - j]).collect());
    }
    (columns, target)
}

/// ADF test with no constant or trend, lag order chosen by minimum AIC.
///
/// Candidate lag orders `0..=max_lag` are compared on the common sample that
/// the largest order allows; the winning order is then re-estimated on the
/// longest sample available to it. `max_lag` defaults to the Schwert rule.
pub fn adf_test(x: &[f64], max_lag: Option<usize>) -> Result<AdfResult, StatsError> {
    const MIN_OBSERVATIONS: usize = 6;
    if x.len() < MIN_OBSERVATIONS {
        return Err(StatsError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: x.len(),
        });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite("ADF input"));
    }

    let n = x.len();
    let max_lag = max_lag
        .unwrap_or_else(|| default_max_lag(n))
        .min((n / 2).saturating_sub(1));
    let diff: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Lag search on the common sample.
    let (full_columns, common_target) = adf_design(x, &diff, max_lag);
    let mut best: Option<(f64, usize)> = None;
    for lags in 0..=max_lag {
        let fit = match least_squares(&full_columns[..=lags], &common_target) {
            Ok(fit) => fit,
            Err(StatsError::Singular(_)) => continue,
            Err(e) => return Err(e),
        };
        // Strict comparison keeps the smaller order on ties.
        if best.map_or(true, |(aic, _)| fit.aic < aic) {
            best = Some((fit.aic, lags));
        }
    }

    let used_lag = best
        .map(|(_, lags)| lags)
        .ok_or_else(|| StatsError::Singular("no lag order produced a valid ADF fit".into()))?;

    let (columns, target) = adf_design(x, &diff, used_lag);
    let fit = least_squares(&columns, &target)?;
    let statistic = fit.t_value(0);

    if statistic.is_nan() {
        return Err(StatsError::NonFinite("ADF statistic"));
    }

    Ok(AdfResult {
        statistic,
        used_lag,
        nobs: fit.nobs,
    })
}

// ─── Engle-Granger ───────────────────────────────────────────────────

/// Outcome of an Engle-Granger cointegration test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CointTest {
    pub statistic: f64,
    pub p_value: f64,
    pub used_lag: usize,
}

/// Two-step Engle-Granger test of `y0` against `y1`.
///
/// Step one regresses `y0` on `y1` with a constant. If the fit is perfect to
/// within `100 * sqrt(eps)` the residuals carry no information, and the pair
/// is reported as cointegrated with statistic `-inf` and p-value 0. Otherwise
/// step two runs the ADF test on the residuals.
pub fn engle_granger(y0: &[f64], y1: &[f64]) -> Result<CointTest, StatsError> {
    let fit = fit_line(y1, y0)?;

    let collinear_threshold = 1.0 - 100.0 * f64::EPSILON.sqrt();
    if fit.r_squared >= collinear_threshold {
        return Ok(CointTest {
            statistic: f64::NEG_INFINITY,
            p_value: 0.0,
            used_lag: 0,
        });
    }

    let residuals: Vec<f64> = y0
        .iter()
        .zip(y1)
        .map(|(a, b)| a - fit.predict(*b))
        .collect();

    let adf = adf_test(&residuals, None)?;
    Ok(CointTest {
        statistic: adf.statistic,
        p_value: mackinnon_p(adf.statistic),
        used_lag: adf.used_lag,
    })
}
