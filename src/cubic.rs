//! One-dimensional cubic spline interpolation on a uniformly spaced grid.
//!
//! Construction solves the tridiagonal (or, for the periodic condition,
//! cyclic) system for the knot moments, then collapses each interval to the
//! four coefficients of a cubic in the local coordinate
//! `t = (x - x_i) / dx`, stored as one row per interval. Evaluation finds
//! the containing interval by index arithmetic in O(1) and applies a Horner
//! sweep; queries outside the grid extrapolate with the polynomial of the
//! nearest boundary interval rather than erroring.
//!
//! ```rust
//! use multispline::{BoundaryCondition, CubicSplineUniform};
//!
//! let f = [0.0_f64, 1.0, 0.5, -1.0, -0.5, 0.0];
//! let spline = CubicSplineUniform::new(0.0, 1.0, &f, BoundaryCondition::Natural).unwrap();
//!
//! // The spline passes through the samples
//! assert!((spline.eval(2.0) - 0.5).abs() < 1e-12);
//! ```
use num_traits::{Float, NumCast};

use crate::boundary::{available_boundary_conditions, BoundaryCondition};
use crate::error::SplineError;
use crate::tridiagonal;

/// Fewest knots per axis that give a determined cubic fit under every
/// registered boundary condition.
pub(crate) const MIN_KNOTS: usize = 4;

/// Build the per-interval cubic coefficients for samples `f` on a
/// unit-spaced axis. `dx` only rescales clamped end slopes from grid
/// units into the normalized coordinate.
///
/// This is the kernel shared by every dimensionality: the tensor-product
/// builders call it once per axis line, feeding it intermediate
/// coefficient fields in place of raw samples.
pub(crate) fn spline_segments<T: Float>(
    f: &[T],
    bc: &BoundaryCondition<T>,
    dx: T,
) -> Result<Vec<[T; 4]>, SplineError> {
    let nk = f.len();
    if nk < MIN_KNOTS {
        return Err(SplineError::GridTooSmall {
            len: nk,
            min: MIN_KNOTS,
        });
    }
    let n = nk - 1; // interval count

    let one = T::one();
    let two = one + one;
    let four = two + two;
    let six = four + two;

    // Continuity condition rhs at an interior knot
    let r = |i: usize| six * (f[i + 1] - two * f[i] + f[i - 1]);

    let moments: Vec<T> = match bc {
        BoundaryCondition::Natural | BoundaryCondition::Clamped { .. } => {
            let mut sub = vec![one; n];
            let mut diag = vec![four; n + 1];
            let mut sup = vec![one; n];
            let mut rhs = vec![T::zero(); n + 1];
            for i in 1..n {
                rhs[i] = r(i);
            }
            if let BoundaryCondition::Clamped { left, right } = bc {
                // End rows pin the first derivative; slopes arrive in grid
                // units and the local cubic works in t, hence the dx factor
                diag[0] = two;
                rhs[0] = six * ((f[1] - f[0]) - *left * dx);
                diag[n] = two;
                rhs[n] = six * (*right * dx - (f[n] - f[n - 1]));
            } else {
                // End moments fixed at zero
                diag[0] = one;
                sup[0] = T::zero();
                diag[n] = one;
                sub[n - 1] = T::zero();
            }
            tridiagonal::solve(&sub, &diag, &sup, &rhs)?
        }
        BoundaryCondition::NotAKnot => {
            // Third-derivative continuity at the first and last interior
            // knot gives M[0] = 2 M[1] - M[2] and M[n] = 2 M[n-1] - M[n-2].
            // Substituting into the adjacent interior rows decouples them
            // to 6 M[1] = r(1) and 6 M[n-1] = r(n-1), leaving a reduced
            // tridiagonal system in M[1]..=M[n-1].
            let m = n - 1;
            let mut sub = vec![one; m - 1];
            let mut diag = vec![four; m];
            let mut sup = vec![one; m - 1];
            let mut rhs = vec![T::zero(); m];
            for i in 1..n {
                rhs[i - 1] = r(i);
            }
            diag[0] = six;
            sup[0] = T::zero();
            diag[m - 1] = six;
            sub[m - 2] = T::zero();
            let inner = tridiagonal::solve(&sub, &diag, &sup, &rhs)?;

            let mut mts = Vec::with_capacity(n + 1);
            mts.push(two * inner[0] - inner[1]);
            mts.extend_from_slice(&inner);
            mts.push(two * inner[m - 1] - inner[m - 2]);
            mts
        }
        BoundaryCondition::Periodic => {
            // Knot n aliases knot 0, so the unknowns are M[0]..=M[n-1] and
            // the first and last rows wrap through the matrix corners
            let sub = vec![one; n - 1];
            let diag = vec![four; n];
            let sup = vec![one; n - 1];
            let mut rhs = vec![T::zero(); n];
            rhs[0] = six * (f[1] - two * f[0] + f[n - 1]);
            for i in 1..n {
                rhs[i] = r(i);
            }
            let mut mts = tridiagonal::solve_cyclic(&sub, &diag, &sup, &rhs, one, one)?;
            mts.push(mts[0]);
            mts
        }
    };

    // Collapse endpoint values and moments to the local cubic
    let mut coeffs = Vec::with_capacity(n);
    for i in 0..n {
        let m0 = moments[i];
        let m1 = moments[i + 1];
        coeffs.push([
            f[i],
            (f[i + 1] - f[i]) - (two * m0 + m1) / six,
            m0 / two,
            (m1 - m0) / six,
        ]);
    }

    Ok(coeffs)
}

/// Extract the constant step of a strictly increasing axis.
///
/// Spacing must match the first interval within a sqrt(machine epsilon)
/// relative tolerance; axes that fail are rejected here, at construction
/// time, rather than surfacing as evaluation artifacts later.
pub(crate) fn uniform_step<T: Float>(axis: &[T]) -> Result<T, SplineError> {
    if axis.len() < 2 {
        return Err(SplineError::GridTooSmall {
            len: axis.len(),
            min: MIN_KNOTS,
        });
    }
    let dx = axis[1] - axis[0];
    if dx <= T::zero() {
        return Err(SplineError::NonUniformGrid);
    }
    let tol = T::epsilon().sqrt() * dx;
    for i in 1..axis.len() - 1 {
        if ((axis[i + 1] - axis[i]) - dx).abs() > tol {
            return Err(SplineError::NonUniformGrid);
        }
    }
    Ok(dx)
}

/// Containing interval index and local coordinate for a query point,
/// clipping the index to the grid so that exterior points fall to the
/// boundary interval's polynomial.
#[inline]
pub(crate) fn locate<T: Float>(x: T, x0: T, dx: T, n: usize) -> (usize, T) {
    let s = (x - x0) / dx;
    let i = match <isize as NumCast>::from(s.floor()) {
        Some(i) => (i.max(0) as usize).min(n - 1),
        // Non-finite coordinates land in the first interval and propagate
        // through the local coordinate arithmetic
        None => 0,
    };
    let t = s - T::from(i).unwrap_or_else(T::zero);
    (i, t)
}

/// Evaluate the local cubic at t.
#[inline]
pub(crate) fn horner<T: Float>(c: &[T; 4], t: T) -> T {
    ((c[3] * t + c[2]) * t + c[1]) * t + c[0]
}

/// Evaluate the `order`-th t-derivative of the local cubic, analytically
/// differentiated; orders past the cubic degree are identically zero.
#[inline]
pub(crate) fn horner_deriv<T: Float>(c: &[T; 4], t: T, order: usize) -> T {
    let one = T::one();
    let two = one + one;
    let three = two + one;
    let six = three + three;
    match order {
        0 => horner(c, t),
        1 => (three * c[3] * t + two * c[2]) * t + c[1],
        2 => six * c[3] * t + two * c[2],
        3 => six * c[3],
        _ => T::zero(),
    }
}

/// A cubic spline on a uniform grid described by an origin and step.
///
/// Immutable once built; evaluation takes `&self` and the type is
/// `Send + Sync` for any `T` that is, so a single spline may be queried
/// from many threads concurrently.
#[derive(Debug, Clone)]
pub struct CubicSplineUniform<T> {
    x0: T,
    dx: T,
    bc: BoundaryCondition<T>,
    coeffs: Vec<[T; 4]>,
}

impl<T: Float> CubicSplineUniform<T> {
    /// Build a spline through `f` sampled at `x0 + i * dx`.
    ///
    /// # Errors
    /// * `NonUniformGrid` if `dx` is zero or negative
    /// * `GridTooSmall` if fewer than four samples are given
    /// * `SingularSystem` if the moment solve degenerates
    pub fn new(x0: T, dx: T, f: &[T], bc: BoundaryCondition<T>) -> Result<Self, SplineError> {
        if dx <= T::zero() {
            return Err(SplineError::NonUniformGrid);
        }
        let coeffs = spline_segments(f, &bc, dx)?;
        Ok(Self { x0, dx, bc, coeffs })
    }

    /// Grid origin.
    pub fn x0(&self) -> T {
        self.x0
    }

    /// Grid step.
    pub fn dx(&self) -> T {
        self.dx
    }

    /// Number of grid intervals (one less than the sample count).
    pub fn nx(&self) -> usize {
        self.coeffs.len()
    }

    /// The boundary condition the spline was built with.
    pub fn boundary(&self) -> &BoundaryCondition<T> {
        &self.bc
    }

    /// Names accepted by [`BoundaryCondition::from_name`].
    pub fn available_boundary_conditions(&self) -> &'static [&'static str] {
        available_boundary_conditions()
    }

    /// Interpolant value at `x`.
    pub fn eval(&self, x: T) -> T {
        self.partial(x, 0)
    }

    /// First derivative at `x`.
    pub fn deriv(&self, x: T) -> T {
        self.partial(x, 1)
    }

    /// Second derivative at `x`.
    pub fn deriv2(&self, x: T) -> T {
        self.partial(x, 2)
    }

    /// Derivative of arbitrary order at `x`; zero for orders past 3.
    pub fn partial(&self, x: T, order: usize) -> T {
        if order > 3 {
            return T::zero();
        }
        let (i, t) = locate(x, self.x0, self.dx, self.coeffs.len());
        horner_deriv(&self.coeffs[i], t, order) / self.dx.powi(order as i32)
    }

    /// Evaluate at a set of points, writing into preallocated output.
    ///
    /// # Errors
    /// * `ShapeMismatch` if input and output lengths differ
    pub fn eval_multi(&self, xs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.partial_multi(xs, 0, out)
    }

    /// First derivative at a set of points.
    pub fn deriv_multi(&self, xs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.partial_multi(xs, 1, out)
    }

    /// Second derivative at a set of points.
    pub fn deriv2_multi(&self, xs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.partial_multi(xs, 2, out)
    }

    /// Arbitrary-order derivative at a set of points.
    ///
    /// # Errors
    /// * `ShapeMismatch` if input and output lengths differ
    pub fn partial_multi(&self, xs: &[T], order: usize, out: &mut [T]) -> Result<(), SplineError> {
        if xs.len() != out.len() {
            return Err(SplineError::ShapeMismatch {
                expected: xs.len(),
                found: out.len(),
            });
        }
        for i in 0..xs.len() {
            out[i] = self.partial(xs[i], order);
        }
        Ok(())
    }

    /// Evaluate at a set of points, allocating for the output.
    pub fn eval_alloc(&self, xs: &[T]) -> Vec<T> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// First derivative at a set of points, allocating for the output.
    pub fn deriv_alloc(&self, xs: &[T]) -> Vec<T> {
        xs.iter().map(|&x| self.deriv(x)).collect()
    }

    /// Second derivative at a set of points, allocating for the output.
    pub fn deriv2_alloc(&self, xs: &[T]) -> Vec<T> {
        xs.iter().map(|&x| self.deriv2(x)).collect()
    }

    /// One coefficient of the cubic on `interval`, by polynomial degree.
    /// Panics if either index is out of range.
    pub fn coeff(&self, interval: usize, degree: usize) -> T {
        self.coeffs[interval][degree]
    }

    /// Full coefficient table, one `[c0, c1, c2, c3]` row per interval.
    pub fn coefficients(&self) -> &[[T; 4]] {
        &self.coeffs
    }
}

/// A cubic spline built from explicit axis values.
///
/// The axis must still be uniformly spaced: this constructor exists to
/// accept knot positions rather than an origin/step pair, and rejects
/// axes whose spacing drifts beyond tolerance instead of degrading to a
/// slower lookup. Evaluation is identical to [`CubicSplineUniform`].
#[derive(Debug, Clone)]
pub struct CubicSpline<T> {
    inner: CubicSplineUniform<T>,
}

impl<T: Float> CubicSpline<T> {
    /// Build a spline through `f` sampled at the knots `xs`.
    ///
    /// # Errors
    /// * `ShapeMismatch` if `xs` and `f` lengths differ
    /// * `GridTooSmall` if fewer than four knots are given
    /// * `NonUniformGrid` if knot spacing is not constant within tolerance
    /// * `SingularSystem` if the moment solve degenerates
    pub fn new(xs: &[T], f: &[T], bc: BoundaryCondition<T>) -> Result<Self, SplineError> {
        if xs.len() != f.len() {
            return Err(SplineError::ShapeMismatch {
                expected: xs.len(),
                found: f.len(),
            });
        }
        if xs.len() < MIN_KNOTS {
            return Err(SplineError::GridTooSmall {
                len: xs.len(),
                min: MIN_KNOTS,
            });
        }
        let dx = uniform_step(xs)?;
        let inner = CubicSplineUniform::new(xs[0], dx, f, bc)?;
        Ok(Self { inner })
    }

    pub fn x0(&self) -> T {
        self.inner.x0()
    }

    pub fn dx(&self) -> T {
        self.inner.dx()
    }

    pub fn nx(&self) -> usize {
        self.inner.nx()
    }

    pub fn boundary(&self) -> &BoundaryCondition<T> {
        self.inner.boundary()
    }

    pub fn available_boundary_conditions(&self) -> &'static [&'static str] {
        available_boundary_conditions()
    }

    pub fn eval(&self, x: T) -> T {
        self.inner.eval(x)
    }

    pub fn deriv(&self, x: T) -> T {
        self.inner.deriv(x)
    }

    pub fn deriv2(&self, x: T) -> T {
        self.inner.deriv2(x)
    }

    pub fn partial(&self, x: T, order: usize) -> T {
        self.inner.partial(x, order)
    }

    pub fn eval_multi(&self, xs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.inner.eval_multi(xs, out)
    }

    pub fn deriv_multi(&self, xs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.inner.deriv_multi(xs, out)
    }

    pub fn deriv2_multi(&self, xs: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.inner.deriv2_multi(xs, out)
    }

    pub fn eval_alloc(&self, xs: &[T]) -> Vec<T> {
        self.inner.eval_alloc(xs)
    }

    pub fn coeff(&self, interval: usize, degree: usize) -> T {
        self.inner.coeff(interval, degree)
    }

    pub fn coefficients(&self) -> &[[T; 4]] {
        self.inner.coefficients()
    }
}
