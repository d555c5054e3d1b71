//! Least squares for autoregressive fits.
//!
//! An AR(p) model with intercept is linear in its coefficients:
//!
//! ```text
//! y_t = c + φ_1 y_{t-1} + ... + φ_p y_{t-p} + e_t
//! ```
//!
//! so fitting reduces to an ordinary least-squares problem on a lagged design
//! matrix. The system is tall (many days, few coefficients), which is why we
//! solve it through SVD rather than a square QR solve.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Constant stretches in the series make lag columns nearly collinear, so
    // fall back to looser tolerances before giving up.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Build the lagged design matrix and response vector for an AR(`order`) fit.
///
/// Row `r` describes day `t = order + r`: `[1, y_{t-1}, ..., y_{t-order}]`.
/// Returns `None` when the series has no day with a full set of lags.
pub fn lagged_design(series: &[f64], order: usize) -> Option<(DMatrix<f64>, DVector<f64>)> {
    if order == 0 || series.len() <= order {
        return None;
    }

    let rows = series.len() - order;
    let cols = order + 1;
    let x = DMatrix::from_fn(rows, cols, |r, c| {
        if c == 0 { 1.0 } else { series[order + r - c] }
    });
    let y = DVector::from_iterator(rows, series[order..].iter().copied());

    Some((x, y))
}
