//! Ordinary least squares.
//!
//! Two entry points:
//! - `fit_line`: simple regression `y = slope * x + intercept`
//! - `least_squares`: multi-regressor fit without an implicit constant,
//!   returning coefficient standard errors and the Gaussian AIC used for
//!   ADF lag selection

use super::{mean, StatsError};

/// Relative pivot tolerance for the normal-equation solve.
const PIVOT_TOLERANCE: f64 = 1e-12;

// ─── Simple regression ───────────────────────────────────────────────

/// Result of fitting `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 1.0 when `y` has no variance.
    pub r_squared: f64,
}

impl LineFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line with intercept by least squares.
///
/// Fails with `Singular` when `x` has (numerically) no variance and with
/// `NonFinite` when the inputs contain NaN or infinity.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: x.len(),
        });
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite("regression input"));
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    let mut sum_sq_x = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
        sum_sq_x += xi * xi;
    }

    if sxx <= PIVOT_TOLERANCE * sum_sq_x.max(f64::MIN_POSITIVE) {
        return Err(StatsError::Singular(format!(
            "regressor has no variance (sxx = {sxx:e})"
        )));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy > 0.0 {
        (sxy * sxy) / (sxx * syy)
    } else {
        1.0
    };

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(StatsError::NonFinite("regression coefficients"));
    }

    Ok(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

// ─── Multiple regression ─────────────────────────────────────────────

/// Result of a multi-regressor least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    pub nobs: usize,
    /// Gaussian AIC: `-2 * loglik + 2 * k`.
    pub aic: f64,
}

impl LeastSquaresFit {
    /// t-statistic of coefficient `i`.
    pub fn t_value(&self, i: usize) -> f64 {
        self.coefficients[i] / self.std_errors[i]
    }
}

/// Regress `y` on the given columns (no implicit intercept).
///
/// Each column must have the same length as `y`, and there must be more
/// observations than columns. The normal equations are inverted with
/// Gauss-Jordan elimination and partial pivoting; a pivot that vanishes
/// relative to the largest diagonal entry reports `Singular`.
pub fn least_squares(columns: &[Vec<f64>], y: &[f64]) -> Result<LeastSquaresFit, StatsError> {
    let k = columns.len();
    let n = y.len();

    if k == 0 {
        return Err(StatsError::Singular("no regressors".into()));
    }
    for col in columns {
        if col.len() != n {
            return Err(StatsError::LengthMismatch {
                left: col.len(),
                right: n,
            });
        }
    }
    if n <= k {
        return Err(StatsError::InsufficientData {
            required: k + 1,
            actual: n,
        });
    }

    // X'X and X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for i in 0..k {
        for j in i..k {
            let dot: f64 = columns[i].iter().zip(&columns[j]).map(|(a, b)| a * b).sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
        xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
    }

    let inverse = invert(xtx)?;

    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| inverse[i][j] * xty[j]).sum())
        .collect();

    let ssr: f64 = (0..n)
        .map(|t| {
            let fitted: f64 = (0..k).map(|i| coefficients[i] * columns[i][t]).sum();
            (y[t] - fitted).powi(2)
        })
        .sum();

    let n_f = n as f64;
    let sigma2 = ssr / (n_f - k as f64);
    let std_errors = (0..k).map(|i| (sigma2 * inverse[i][i]).sqrt()).collect();

    let log_likelihood =
        -n_f / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / n_f).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * k as f64;

    Ok(LeastSquaresFit {
        coefficients,
        std_errors,
        ssr,
        nobs: n,
        aic,
    })
}

/// Invert a small symmetric positive semi-definite matrix.
fn invert(mut a: Vec<Vec<f64>>) -> Result<Vec<Vec<f64>>, StatsError> {
    let k = a.len();
    let scale = (0..k).map(|i| a[i][i].abs()).fold(0.0_f64, f64::max);
    if !scale.is_finite() {
        return Err(StatsError::NonFinite("design matrix"));
    }
    if scale == 0.0 {
        return Err(StatsError::Singular("all regressors are zero".into()));
    }

    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| {
                a[r1][col]
                    .abs()
                    .partial_cmp(&a[r2][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        if a[pivot_row][col].abs() <= PIVOT_TOLERANCE * scale {
            return Err(StatsError::Singular(format!(
                "column {col} is linearly dependent on the others"
            )));
        }

        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = a[col][col];
        for j in 0..k {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..k {
            if row == col {
                continue;
            }
            let factor = a[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..k {
                a[row][j] -= factor * a[col][j];
                inv[row][j] -= factor * inv[col][j];
            }
        }
    }

    Ok(inv)
}
