//! Banded linear solves for the per-axis moment systems.
//!
//! Every spline axis produces one tridiagonal system whose unknowns are the
//! second derivatives (moments) of the interpolant at the knots. Aperiodic
//! boundary conditions give a plain tridiagonal matrix, solved by the Thomas
//! algorithm; the periodic condition adds wraparound corner entries, handled
//! by the Sherman-Morrison correction over two plain solves. Both are O(n).
use num_traits::Float;

use crate::error::SplineError;

/// Solve a tridiagonal system by the Thomas algorithm.
///
/// `sub` and `sup` hold the sub- and super-diagonal and must be one entry
/// shorter than `diag` and `rhs`. The forward sweep is not pivoted; the
/// diagonally dominant systems assembled by the spline builders do not
/// need it.
///
/// # Errors
/// * `ShapeMismatch` if the band lengths are inconsistent
/// * `SingularSystem` if a pivot underflows to (near) zero
pub fn solve<T: Float>(
    sub: &[T],
    diag: &[T],
    sup: &[T],
    rhs: &[T],
) -> Result<Vec<T>, SplineError> {
    let n = diag.len();
    if n < 2 || sub.len() != n - 1 || sup.len() != n - 1 || rhs.len() != n {
        return Err(SplineError::ShapeMismatch {
            expected: n,
            found: rhs.len(),
        });
    }

    // Forward sweep, storing the modified super-diagonal and right-hand side
    let mut csweep = vec![T::zero(); n - 1];
    let mut dsweep = vec![T::zero(); n];

    let mut denom = diag[0];
    if denom.abs() < T::epsilon() {
        return Err(SplineError::SingularSystem);
    }
    csweep[0] = sup[0] / denom;
    dsweep[0] = rhs[0] / denom;

    for i in 1..n {
        denom = diag[i] - sub[i - 1] * csweep[i - 1];
        if denom.abs() < T::epsilon() {
            return Err(SplineError::SingularSystem);
        }
        if i < n - 1 {
            csweep[i] = sup[i] / denom;
        }
        dsweep[i] = (rhs[i] - sub[i - 1] * dsweep[i - 1]) / denom;
    }

    // Back substitution
    let mut x = dsweep;
    for i in (0..n - 1).rev() {
        let correction = csweep[i] * x[i + 1];
        x[i] = x[i] - correction;
    }

    Ok(x)
}

/// Solve a cyclic tridiagonal system with corner entries
/// `corner_low` at `A[n-1][0]` and `corner_high` at `A[0][n-1]`.
///
/// The cyclic matrix is written as a plain tridiagonal matrix plus a
/// rank-one update, so two Thomas solves and a Sherman-Morrison
/// combination recover the solution in O(n).
///
/// # Errors
/// * `ShapeMismatch` if the band lengths are inconsistent
/// * `SingularSystem` if either inner solve hits a degenerate pivot,
///   or the rank-one correction denominator vanishes
pub fn solve_cyclic<T: Float>(
    sub: &[T],
    diag: &[T],
    sup: &[T],
    rhs: &[T],
    corner_low: T,
    corner_high: T,
) -> Result<Vec<T>, SplineError> {
    let n = diag.len();
    if n < 3 || sub.len() != n - 1 || sup.len() != n - 1 || rhs.len() != n {
        return Err(SplineError::ShapeMismatch {
            expected: n,
            found: rhs.len(),
        });
    }

    // Condensed matrix A' = A - u v^T with u = (gamma, 0, ..., corner_low)
    // and v = (1, 0, ..., corner_high / gamma)
    let gamma = -diag[0];
    let mut diag_mod = diag.to_vec();
    diag_mod[0] = diag[0] - gamma;
    diag_mod[n - 1] = diag[n - 1] - corner_low * corner_high / gamma;

    let y = solve(sub, &diag_mod, sup, rhs)?;

    let mut u = vec![T::zero(); n];
    u[0] = gamma;
    u[n - 1] = corner_low;
    let z = solve(sub, &diag_mod, sup, &u)?;

    let vy = y[0] + corner_high * y[n - 1] / gamma;
    let vz = T::one() + z[0] + corner_high * z[n - 1] / gamma;
    if vz.abs() < T::epsilon() {
        return Err(SplineError::SingularSystem);
    }
    let fact = vy / vz;

    Ok((0..n).map(|i| y[i] - fact * z[i]).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    /// Multiply a cyclic tridiagonal matrix by a vector
    fn matvec(
        sub: &[f64],
        diag: &[f64],
        sup: &[f64],
        corner_low: f64,
        corner_high: f64,
        x: &[f64],
    ) -> Vec<f64> {
        let n = diag.len();
        let mut out = vec![0.0; n];
        for i in 0..n {
            out[i] = diag[i] * x[i];
            if i > 0 {
                out[i] += sub[i - 1] * x[i - 1];
            }
            if i < n - 1 {
                out[i] += sup[i] * x[i + 1];
            }
        }
        out[0] += corner_high * x[n - 1];
        out[n - 1] += corner_low * x[0];
        out
    }

    #[test]
    fn test_solve_residual() {
        let sub = vec![1.0, 2.0, -1.0, 0.5];
        let diag = vec![4.0, 5.0, 4.5, 4.0, 3.0];
        let sup = vec![-1.0, 1.0, 2.0, 1.0];
        let rhs = vec![1.0, -2.0, 3.0, 0.0, 1.5];

        let x = solve(&sub, &diag, &sup, &rhs).unwrap();
        let ax = matvec(&sub, &diag, &sup, 0.0, 0.0, &x);
        (0..5).for_each(|i| assert!((ax[i] - rhs[i]).abs() < 1e-12));
    }

    #[test]
    fn test_solve_cyclic_residual() {
        // The uniform spline moment system with periodic wrap
        let n = 7;
        let sub = vec![1.0; n - 1];
        let diag = vec![4.0; n];
        let sup = vec![1.0; n - 1];
        let rhs: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();

        let x = solve_cyclic(&sub, &diag, &sup, &rhs, 1.0, 1.0).unwrap();
        let ax = matvec(&sub, &diag, &sup, 1.0, 1.0, &x);
        (0..n).for_each(|i| assert!((ax[i] - rhs[i]).abs() < 1e-12));
    }

    #[test]
    fn test_singular_pivot_detected() {
        // Second pivot cancels exactly: 1 - 1 * (1 / 1) = 0
        let sub = vec![1.0, 1.0];
        let diag = vec![1.0, 1.0, 4.0];
        let sup = vec![1.0, 1.0];
        let rhs = vec![1.0, 1.0, 1.0];

        assert_eq!(
            solve(&sub, &diag, &sup, &rhs),
            Err(SplineError::SingularSystem)
        );
    }

    #[test]
    fn test_band_length_mismatch() {
        let res = solve(&[1.0], &[4.0, 4.0, 4.0], &[1.0, 1.0], &[1.0, 1.0, 1.0]);
        assert!(matches!(res, Err(SplineError::ShapeMismatch { .. })));
    }
}
