//! Bicubic spline interpolation on a regular 2-D grid.
//!
//! The surface is built separably: every x-row of samples is splined along
//! y, then each field of resulting y-cell coefficients is splined along x.
//! Each grid cell ends up with a 4x4 block `c[mx][my]` so that
//!
//! ```text
//! S(x, y) = sum over mx, my of c[mx][my] * tx^mx * ty^my
//! ```
//!
//! in the local cell coordinates `tx`, `ty`. Evaluation is a nested Horner
//! sweep, innermost axis first, and partial derivatives differentiate the
//! per-axis bases analytically.
//!
//! ```rust
//! use multispline::{BoundaryCondition, BicubicSpline};
//! use multispline::utils::linspace;
//!
//! let xs: Vec<f64> = linspace(0.0, 1.0, 5);
//! let ys: Vec<f64> = linspace(0.0, 1.0, 5);
//! let f: Vec<f64> = xs
//!     .iter()
//!     .flat_map(|&x| ys.iter().map(move |&y| x.sin() * y.cos()))
//!     .collect();
//!
//! let spline = BicubicSpline::new(&xs, &ys, &f, BoundaryCondition::NotAKnot).unwrap();
//! assert!((spline.eval(0.5, 0.5) - 0.5_f64.sin() * 0.5_f64.cos()).abs() < 1e-3);
//! ```
use num_traits::Float;

use crate::boundary::{available_boundary_conditions, BoundaryCondition};
use crate::cubic::{horner_deriv, locate, spline_segments, uniform_step, MIN_KNOTS};
use crate::error::SplineError;

/// A bicubic tensor-product spline on a uniformly spaced 2-D grid.
///
/// Immutable once built; safe to evaluate from multiple threads.
#[derive(Debug, Clone)]
pub struct BicubicSpline<T> {
    x0: T,
    dx: T,
    y0: T,
    dy: T,
    nx: usize,
    ny: usize,
    bc_x: BoundaryCondition<T>,
    bc_y: BoundaryCondition<T>,
    /// Cell blocks in row-major order: `((i * ny + j) * 4 + mx) * 4 + my`
    coeffs: Vec<T>,
}

impl<T: Float> BicubicSpline<T> {
    /// Build a spline through `f` sampled on the grid `xs` x `ys`, with
    /// one boundary condition shared by both axes.
    ///
    /// `f` is row-major with x slowest: `f[i * ys.len() + j]` is the
    /// sample at `(xs[i], ys[j])`.
    ///
    /// # Errors
    /// * `ShapeMismatch` if `f.len() != xs.len() * ys.len()`
    /// * `GridTooSmall` if either axis has fewer than four knots
    /// * `NonUniformGrid` if either axis is not uniformly spaced
    /// * `SingularSystem` if a moment solve degenerates
    pub fn new(xs: &[T], ys: &[T], f: &[T], bc: BoundaryCondition<T>) -> Result<Self, SplineError> {
        Self::with_axis_conditions(xs, ys, f, bc, bc)
    }

    /// Build with independent boundary conditions per axis.
    pub fn with_axis_conditions(
        xs: &[T],
        ys: &[T],
        f: &[T],
        bc_x: BoundaryCondition<T>,
        bc_y: BoundaryCondition<T>,
    ) -> Result<Self, SplineError> {
        let nxk = xs.len();
        let nyk = ys.len();
        if f.len() != nxk * nyk {
            return Err(SplineError::ShapeMismatch {
                expected: nxk * nyk,
                found: f.len(),
            });
        }
        for axis_len in [nxk, nyk] {
            if axis_len < MIN_KNOTS {
                return Err(SplineError::GridTooSmall {
                    len: axis_len,
                    min: MIN_KNOTS,
                });
            }
        }
        let dx = uniform_step(xs)?;
        let dy = uniform_step(ys)?;
        let nx = nxk - 1;
        let ny = nyk - 1;

        // Pass 1: spline each x-row along y, keeping per-(x-knot, y-cell)
        // quartets at [i][j][my]
        let mut ystage = vec![T::zero(); nxk * ny * 4];
        for i in 0..nxk {
            let row = spline_segments(&f[i * nyk..(i + 1) * nyk], &bc_y, dy)?;
            for j in 0..ny {
                for my in 0..4 {
                    ystage[(i * ny + j) * 4 + my] = row[j][my];
                }
            }
        }

        // Pass 2: spline each (y-cell, my) coefficient field along x
        let mut coeffs = vec![T::zero(); nx * ny * 16];
        let mut line = vec![T::zero(); nxk];
        for j in 0..ny {
            for my in 0..4 {
                for i in 0..nxk {
                    line[i] = ystage[(i * ny + j) * 4 + my];
                }
                let col = spline_segments(&line, &bc_x, dx)?;
                for i in 0..nx {
                    for mx in 0..4 {
                        coeffs[((i * ny + j) * 4 + mx) * 4 + my] = col[i][mx];
                    }
                }
            }
        }

        Ok(Self {
            x0: xs[0],
            dx,
            y0: ys[0],
            dy,
            nx,
            ny,
            bc_x,
            bc_y,
            coeffs,
        })
    }

    pub fn x0(&self) -> T {
        self.x0
    }

    pub fn dx(&self) -> T {
        self.dx
    }

    pub fn y0(&self) -> T {
        self.y0
    }

    pub fn dy(&self) -> T {
        self.dy
    }

    /// Interval counts per axis.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Per-axis boundary conditions, x first.
    pub fn boundaries(&self) -> (&BoundaryCondition<T>, &BoundaryCondition<T>) {
        (&self.bc_x, &self.bc_y)
    }

    /// Names accepted by [`BoundaryCondition::from_name`].
    pub fn available_boundary_conditions(&self) -> &'static [&'static str] {
        available_boundary_conditions()
    }

    /// Surface value at `(x, y)`.
    pub fn eval(&self, x: T, y: T) -> T {
        self.partial(x, y, [0, 0])
    }

    /// First partial in x.
    pub fn deriv_x(&self, x: T, y: T) -> T {
        self.partial(x, y, [1, 0])
    }

    /// First partial in y.
    pub fn deriv_y(&self, x: T, y: T) -> T {
        self.partial(x, y, [0, 1])
    }

    /// Second partial in x.
    pub fn deriv_xx(&self, x: T, y: T) -> T {
        self.partial(x, y, [2, 0])
    }

    /// Second partial in y.
    pub fn deriv_yy(&self, x: T, y: T) -> T {
        self.partial(x, y, [0, 2])
    }

    /// Mixed second partial.
    pub fn deriv_xy(&self, x: T, y: T) -> T {
        self.partial(x, y, [1, 1])
    }

    /// Mixed partial of order `[dx, dy]`; zero if either order exceeds 3.
    pub fn partial(&self, x: T, y: T, orders: [usize; 2]) -> T {
        if orders[0] > 3 || orders[1] > 3 {
            return T::zero();
        }
        let (i, tx) = locate(x, self.x0, self.dx, self.nx);
        let (j, ty) = locate(y, self.y0, self.dy, self.ny);

        // Horner sweep over the cell's 4x4 block, y innermost
        let mut vx = [T::zero(); 4];
        for mx in 0..4 {
            let base = ((i * self.ny + j) * 4 + mx) * 4;
            let row = [
                self.coeffs[base],
                self.coeffs[base + 1],
                self.coeffs[base + 2],
                self.coeffs[base + 3],
            ];
            vx[mx] = horner_deriv(&row, ty, orders[1]);
        }
        horner_deriv(&vx, tx, orders[0])
            / (self.dx.powi(orders[0] as i32) * self.dy.powi(orders[1] as i32))
    }

    /// Evaluate element-wise over matching coordinate slices.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the coordinate or output lengths differ
    pub fn eval_multi(&self, xs: &[T], ys: &[T], out: &mut [T]) -> Result<(), SplineError> {
        self.partial_multi(xs, ys, [0, 0], out)
    }

    /// Mixed partial element-wise over matching coordinate slices.
    pub fn partial_multi(
        &self,
        xs: &[T],
        ys: &[T],
        orders: [usize; 2],
        out: &mut [T],
    ) -> Result<(), SplineError> {
        if xs.len() != ys.len() || xs.len() != out.len() {
            return Err(SplineError::ShapeMismatch {
                expected: xs.len(),
                found: out.len(),
            });
        }
        for i in 0..xs.len() {
            out[i] = self.partial(xs[i], ys[i], orders);
        }
        Ok(())
    }

    /// Evaluate element-wise, allocating for the output.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the coordinate lengths differ
    pub fn eval_alloc(&self, xs: &[T], ys: &[T]) -> Result<Vec<T>, SplineError> {
        let mut out = vec![T::zero(); xs.len()];
        self.eval_multi(xs, ys, &mut out)?;
        Ok(out)
    }

    /// One coefficient of cell `(i, j)` by per-axis polynomial degree.
    /// Panics if any index is out of range.
    pub fn coeff(&self, i: usize, j: usize, mx: usize, my: usize) -> T {
        assert!(i < self.nx && j < self.ny && mx < 4 && my < 4);
        self.coeffs[((i * self.ny + j) * 4 + mx) * 4 + my]
    }

    /// Full coefficient tensor, flattened from logical shape
    /// `(nx, ny, 4, 4)` with the last axis fastest.
    pub fn coefficients(&self) -> &[T] {
        &self.coeffs
    }
}
