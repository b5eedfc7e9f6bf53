//! Ordinary least squares solver.
//!
//! We solve small, tall linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - Factor `X = QR` (Householder) and back-substitute `R β = Qᵀ y`.
//!   This never forms `XᵀX`, so the condition number is not squared. That matters
//!   here because day offsets are orders of magnitude larger than the other
//!   predictors.
//! - Nalgebra's `QR::solve` is intended for square systems, so we use the thin
//!   factors (`q()` is `n×p`, `r()` is `p×p`) and solve the triangular system
//!   ourselves.
//! - Collinear designs still get a least squares solution. Columns are kept left
//!   to right while they add a new direction; a column that lies in the span of the
//!   kept ones gets a zero coefficient. With the intercept in column 0, a constant
//!   predictor is absorbed by the intercept.

use nalgebra::{DMatrix, DVector};

/// A column whose residual against the kept columns is below this fraction of its
/// own norm counts as dependent.
const RANK_TOL: f64 = 1e-10;

/// Indices of the leading linearly independent columns of `x`, in column order.
pub fn independent_columns(x: &DMatrix<f64>) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(x.ncols());

    for j in 0..x.ncols() {
        let norm = x.column(j).norm();
        if norm == 0.0 || !norm.is_finite() || kept.len() >= x.nrows() {
            continue;
        }

        let mut candidate = kept.clone();
        candidate.push(j);
        let r = x.select_columns(candidate.iter()).qr().r();
        let k = candidate.len() - 1;
        // |r_kk| is the distance from column j to the span of the kept columns.
        if r[(k, k)].abs() > RANK_TOL * norm {
            kept = candidate;
        }
    }

    kept
}

/// Solve a least squares problem using a QR decomposition.
///
/// Dependent columns get a zero coefficient (see module docs). Returns `None` if the
/// system is underdetermined (`rows < cols`), the shapes disagree, or the solution
/// is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let (n, p) = x.shape();
    if n < p || p == 0 || y.len() != n {
        return None;
    }

    let kept = independent_columns(x);
    let mut beta = DVector::<f64>::zeros(p);

    if !kept.is_empty() {
        let qr = x.select_columns(kept.iter()).qr();
        let qty = qr.q().transpose() * y;
        let coef = qr.r().solve_upper_triangular(&qty)?;
        for (k, &j) in kept.iter().enumerate() {
            beta[j] = coef[k];
        }
    }

    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}
