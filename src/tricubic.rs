//! Tricubic spline interpolation on a regular 3-D grid.
//!
//! Construction is separable, one axis at a time: sample lines are splined
//! along z, the resulting coefficient fields along y, and those along x,
//! leaving every cell with a 4x4x4 block `c[mx][my][mz]` so that
//!
//! ```text
//! S(x, y, z) = sum over mx, my, mz of c[mx][my][mz] * tx^mx * ty^my * tz^mz
//! ```
//!
//! in the local cell coordinates. The blocks live in one contiguous buffer
//! behind [`TricubicCoefficients`], which packs the z-cell index together
//! with the 64 per-cell entries on the trailing axis so that evaluation
//! sweeps touch memory sequentially.
use num_traits::Float;

use crate::boundary::{available_boundary_conditions, BoundaryCondition};
use crate::cubic::{horner_deriv, locate, spline_segments, uniform_step, MIN_KNOTS};
use crate::error::SplineError;

/// Dense per-cell coefficient storage for a tricubic spline.
///
/// Logical shape is `(nx, ny, 64 * nz)`: the first two axes index x- and
/// y-cells, and the trailing axis merges the z-cell index with the 4x4x4
/// per-cell degree block, `mz` fastest. [`TricubicCoefficients::offset`]
/// is the single source of truth for the flattening.
#[derive(Debug, Clone)]
pub struct TricubicCoefficients<T> {
    data: Vec<T>,
    nx: usize,
    ny: usize,
    nz: usize,
}

impl<T: Float> TricubicCoefficients<T> {
    fn zeroed(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            data: vec![T::zero(); nx * ny * nz * 64],
            nx,
            ny,
            nz,
        }
    }

    /// Flat offset of the coefficient for cell `(i, j, k)` and per-axis
    /// polynomial degrees `(mx, my, mz)`.
    #[inline]
    pub fn offset(&self, i: usize, j: usize, k: usize, mx: usize, my: usize, mz: usize) -> usize {
        ((i * self.ny + j) * self.nz + k) * 64 + 16 * mx + 4 * my + mz
    }

    /// Coefficient lookup through [`TricubicCoefficients::offset`].
    /// Panics if any index is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize, mx: usize, my: usize, mz: usize) -> T {
        assert!(i < self.nx && j < self.ny && k < self.nz && mx < 4 && my < 4 && mz < 4);
        self.data[self.offset(i, j, k, mx, my, mz)]
    }

    /// Logical shape `(nx, ny, 64 * nz)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, 64 * self.nz)
    }

    /// The contiguous backing buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// A tricubic tensor-product spline on a uniformly spaced 3-D grid.
///
/// Immutable once built; safe to evaluate from multiple threads.
#[derive(Debug, Clone)]
pub struct TricubicSpline<T> {
    x0: T,
    dx: T,
    y0: T,
    dy: T,
    z0: T,
    dz: T,
    bc_x: BoundaryCondition<T>,
    bc_y: BoundaryCondition<T>,
    bc_z: BoundaryCondition<T>,
    coeffs: TricubicCoefficients<T>,
}

impl<T: Float> TricubicSpline<T> {
    /// Build a spline through `f` sampled on the grid `xs` x `ys` x `zs`,
    /// with one boundary condition shared by all three axes.
    ///
    /// `f` is row-major with x slowest: `f[(i * ys.len() + j) * zs.len() + k]`
    /// is the sample at `(xs[i], ys[j], zs[k])`.
    ///
    /// # Errors
    /// * `ShapeMismatch` if `f.len()` disagrees with the axis lengths
    /// * `GridTooSmall` if any axis has fewer than four knots
    /// * `NonUniformGrid` if any axis is not uniformly spaced
    /// * `SingularSystem` if a moment solve degenerates
    pub fn new(
        xs: &[T],
        ys: &[T],
        zs: &[T],
        f: &[T],
        bc: BoundaryCondition<T>,
    ) -> Result<Self, SplineError> {
        Self::with_axis_conditions(xs, ys, zs, f, bc, bc, bc)
    }

    /// Build with independent boundary conditions per axis.
    #[allow(clippy::too_many_arguments)]
    pub fn with_axis_conditions(
        xs: &[T],
        ys: &[T],
        zs: &[T],
        f: &[T],
        bc_x: BoundaryCondition<T>,
        bc_y: BoundaryCondition<T>,
        bc_z: BoundaryCondition<T>,
    ) -> Result<Self, SplineError> {
        let nxk = xs.len();
        let nyk = ys.len();
        let nzk = zs.len();
        if f.len() != nxk * nyk * nzk {
            return Err(SplineError::ShapeMismatch {
                expected: nxk * nyk * nzk,
                found: f.len(),
            });
        }
        for axis_len in [nxk, nyk, nzk] {
            if axis_len < MIN_KNOTS {
                return Err(SplineError::GridTooSmall {
                    len: axis_len,
                    min: MIN_KNOTS,
                });
            }
        }
        let dx = uniform_step(xs)?;
        let dy = uniform_step(ys)?;
        let dz = uniform_step(zs)?;
        let nx = nxk - 1;
        let ny = nyk - 1;
        let nz = nzk - 1;

        // Pass 1: spline each (x, y) sample line along z,
        // keeping quartets at [i][j][k][mz]
        let mut zstage = vec![T::zero(); nxk * nyk * nz * 4];
        for i in 0..nxk {
            for j in 0..nyk {
                let line = &f[(i * nyk + j) * nzk..(i * nyk + j) * nzk + nzk];
                let seg = spline_segments(line, &bc_z, dz)?;
                for k in 0..nz {
                    for mz in 0..4 {
                        zstage[((i * nyk + j) * nz + k) * 4 + mz] = seg[k][mz];
                    }
                }
            }
        }

        // Pass 2: spline each (z-cell, mz) field along y,
        // keeping [i][j][my][k][mz]
        let mut ystage = vec![T::zero(); nxk * ny * 4 * nz * 4];
        let mut line = vec![T::zero(); nyk.max(nxk)];
        for i in 0..nxk {
            for k in 0..nz {
                for mz in 0..4 {
                    for j in 0..nyk {
                        line[j] = zstage[((i * nyk + j) * nz + k) * 4 + mz];
                    }
                    let seg = spline_segments(&line[..nyk], &bc_y, dy)?;
                    for j in 0..ny {
                        for my in 0..4 {
                            ystage[((((i * ny + j) * 4 + my) * nz + k) * 4) + mz] =
                                seg[j][my];
                        }
                    }
                }
            }
        }

        // Pass 3: spline each (y-cell, my, z-cell, mz) field along x into
        // the final cell blocks
        let mut coeffs = TricubicCoefficients::zeroed(nx, ny, nz);
        for j in 0..ny {
            for my in 0..4 {
                for k in 0..nz {
                    for mz in 0..4 {
                        for i in 0..nxk {
                            line[i] = ystage[((((i * ny + j) * 4 + my) * nz + k) * 4) + mz];
                        }
                        let seg = spline_segments(&line[..nxk], &bc_x, dx)?;
                        for i in 0..nx {
                            for mx in 0..4 {
                                let at = coeffs.offset(i, j, k, mx, my, mz);
                                coeffs.data[at] = seg[i][mx];
                            }
                        }
                    }
                }
            }
        }

        Ok(Self {
            x0: xs[0],
            dx,
            y0: ys[0],
            dy,
            z0: zs[0],
            dz,
            bc_x,
            bc_y,
            bc_z,
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

    pub fn z0(&self) -> T {
        self.z0
    }

    pub fn dz(&self) -> T {
        self.dz
    }

    /// Interval counts per axis.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.coeffs.nx, self.coeffs.ny, self.coeffs.nz)
    }

    /// Per-axis boundary conditions, x first.
    pub fn boundaries(
        &self,
    ) -> (
        &BoundaryCondition<T>,
        &BoundaryCondition<T>,
        &BoundaryCondition<T>,
    ) {
        (&self.bc_x, &self.bc_y, &self.bc_z)
    }

    /// Names accepted by [`BoundaryCondition::from_name`].
    pub fn available_boundary_conditions(&self) -> &'static [&'static str] {
        available_boundary_conditions()
    }

    /// Interpolant value at `(x, y, z)`.
    pub fn eval(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [0, 0, 0])
    }

    pub fn deriv_x(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [1, 0, 0])
    }

    pub fn deriv_y(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [0, 1, 0])
    }

    pub fn deriv_z(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [0, 0, 1])
    }

    pub fn deriv_xx(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [2, 0, 0])
    }

    pub fn deriv_yy(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [0, 2, 0])
    }

    pub fn deriv_zz(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [0, 0, 2])
    }

    pub fn deriv_xy(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [1, 1, 0])
    }

    pub fn deriv_xz(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [1, 0, 1])
    }

    pub fn deriv_yz(&self, x: T, y: T, z: T) -> T {
        self.partial(x, y, z, [0, 1, 1])
    }

    /// Mixed partial of order `[dx, dy, dz]`; zero if any order exceeds 3.
    pub fn partial(&self, x: T, y: T, z: T, orders: [usize; 3]) -> T {
        if orders.iter().any(|&d| d > 3) {
            return T::zero();
        }
        let (i, tx) = locate(x, self.x0, self.dx, self.coeffs.nx);
        let (j, ty) = locate(y, self.y0, self.dy, self.coeffs.ny);
        let (k, tz) = locate(z, self.z0, self.dz, self.coeffs.nz);

        // Nested Horner sweep over the cell's 4x4x4 block, z innermost;
        // mz is the fastest-varying index so each inner row is contiguous
        let mut vx = [T::zero(); 4];
        for mx in 0..4 {
            let mut vy = [T::zero(); 4];
            for my in 0..4 {
                let base = self.coeffs.offset(i, j, k, mx, my, 0);
                let row = [
                    self.coeffs.data[base],
                    self.coeffs.data[base + 1],
                    self.coeffs.data[base + 2],
                    self.coeffs.data[base + 3],
                ];
                vy[my] = horner_deriv(&row, tz, orders[2]);
            }
            vx[mx] = horner_deriv(&vy, ty, orders[1]);
        }
        horner_deriv(&vx, tx, orders[0])
            / (self.dx.powi(orders[0] as i32)
                * self.dy.powi(orders[1] as i32)
                * self.dz.powi(orders[2] as i32))
    }

    /// Evaluate element-wise over matching coordinate slices.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the coordinate or output lengths differ
    pub fn eval_multi(
        &self,
        xs: &[T],
        ys: &[T],
        zs: &[T],
        out: &mut [T],
    ) -> Result<(), SplineError> {
        self.partial_multi(xs, ys, zs, [0, 0, 0], out)
    }

    /// Mixed partial element-wise over matching coordinate slices.
    pub fn partial_multi(
        &self,
        xs: &[T],
        ys: &[T],
        zs: &[T],
        orders: [usize; 3],
        out: &mut [T],
    ) -> Result<(), SplineError> {
        if xs.len() != ys.len() || xs.len() != zs.len() || xs.len() != out.len() {
            return Err(SplineError::ShapeMismatch {
                expected: xs.len(),
                found: out.len(),
            });
        }
        for i in 0..xs.len() {
            out[i] = self.partial(xs[i], ys[i], zs[i], orders);
        }
        Ok(())
    }

    /// Evaluate element-wise, allocating for the output.
    ///
    /// # Errors
    /// * `ShapeMismatch` if the coordinate lengths differ
    pub fn eval_alloc(&self, xs: &[T], ys: &[T], zs: &[T]) -> Result<Vec<T>, SplineError> {
        let mut out = vec![T::zero(); xs.len()];
        self.eval_multi(xs, ys, zs, &mut out)?;
        Ok(out)
    }

    /// One coefficient of cell `(i, j, k)` by per-axis polynomial degree.
    /// Panics if any index is out of range.
    pub fn coeff(&self, i: usize, j: usize, k: usize, mx: usize, my: usize, mz: usize) -> T {
        self.coeffs.get(i, j, k, mx, my, mz)
    }

    /// The full coefficient tensor.
    pub fn coefficients(&self) -> &TricubicCoefficients<T> {
        &self.coeffs
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{randn, rng_fixed_seed};
    use crate::utils::linspace;

    fn random_grid() -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        let xs = linspace(0.0, 1.0, 5);
        let ys = linspace(0.0, 1.0, 5);
        let zs = linspace(0.0, 1.0, 5);
        let mut rng = rng_fixed_seed();
        let f: Vec<f64> = randn(&mut rng, 125);
        (xs, ys, zs, f)
    }

    /// A function cubic in each coordinate separately is reproduced
    /// exactly by the tensor-product interpolant away from the boundary
    fn product_cubic(x: f64, y: f64, z: f64) -> f64 {
        (x * x * x - x) * (2.0 * y * y + 1.0) * (z + 3.0)
    }

    #[test]
    fn test_offset_mapping() {
        let c = TricubicCoefficients::<f64>::zeroed(4, 4, 4);
        assert_eq!(c.shape(), (4, 4, 256));
        assert_eq!(c.as_slice().len(), 4 * 4 * 256);

        // Trailing axis merges the z-cell with the degree block, mz fastest
        assert_eq!(c.offset(0, 0, 0, 0, 0, 0), 0);
        assert_eq!(c.offset(0, 0, 0, 0, 0, 1), 1);
        assert_eq!(c.offset(0, 0, 0, 0, 1, 0), 4);
        assert_eq!(c.offset(0, 0, 0, 1, 0, 0), 16);
        assert_eq!(c.offset(0, 0, 1, 0, 0, 0), 64);
        assert_eq!(c.offset(0, 1, 0, 0, 0, 0), 256);
        assert_eq!(c.offset(1, 0, 0, 0, 0, 0), 1024);
        assert_eq!(c.offset(1, 1, 1, 2, 2, 2), 1024 + 256 + 64 + 32 + 8 + 2);

        // The mapping is a bijection onto the buffer
        let mut seen = vec![false; c.as_slice().len()];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    for mx in 0..4 {
                        for my in 0..4 {
                            for mz in 0..4 {
                                let at = c.offset(i, j, k, mx, my, mz);
                                assert!(!seen[at]);
                                seen[at] = true;
                            }
                        }
                    }
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_shape_and_coeff_accessors() {
        let (xs, ys, zs, f) = random_grid();
        let spline = TricubicSpline::new(&xs, &ys, &zs, &f, BoundaryCondition::Natural).unwrap();

        assert_eq!(spline.coefficients().shape(), (4, 4, 256));

        let c = spline.coeff(1, 1, 1, 2, 2, 2);
        assert!(c.is_finite());
        let flat = spline.coefficients();
        assert_eq!(c, flat.as_slice()[flat.offset(1, 1, 1, 2, 2, 2)]);
    }

    #[test]
    fn test_knots_reproduced() {
        let (xs, ys, zs, f) = random_grid();
        let spline = TricubicSpline::new(&xs, &ys, &zs, &f, BoundaryCondition::Natural).unwrap();
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                for (k, &z) in zs.iter().enumerate() {
                    let v = spline.eval(x, y, z);
                    let expected = f[(i * 5 + j) * 5 + k];
                    assert!(
                        (v - expected).abs() < 1e-12,
                        "knot ({i},{j},{k}): {v} != {expected}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_reproduces_separable_cubic() {
        // not-a-knot recovers an exact cubic per axis, so the
        // tensor-product interpolant matches the function everywhere
        // on the covered domain
        let xs = linspace(0.0, 1.0, 5);
        let ys = linspace(0.0, 1.0, 5);
        let zs = linspace(0.0, 1.0, 5);
        let mut f = vec![0.0; 125];
        for i in 0..5 {
            for j in 0..5 {
                for k in 0..5 {
                    f[(i * 5 + j) * 5 + k] = product_cubic(xs[i], ys[j], zs[k]);
                }
            }
        }
        let spline = TricubicSpline::new(&xs, &ys, &zs, &f, BoundaryCondition::NotAKnot).unwrap();

        for &(x, y, z) in &[(0.13, 0.87, 0.41), (0.5, 0.5, 0.5), (0.99, 0.01, 0.77)] {
            let v = spline.eval(x, y, z);
            assert!((v - product_cubic(x, y, z)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_partials_match_finite_differences() {
        let (xs, ys, zs, f) = random_grid();
        let spline = TricubicSpline::new(&xs, &ys, &zs, &f, BoundaryCondition::Natural).unwrap();

        let (x, y, z) = (0.4, 0.6, 0.35);
        let h = 1e-4;
        let e = |x, y, z| spline.eval(x, y, z);

        let fd_x = (e(x + h, y, z) - e(x - h, y, z)) / (2.0 * h);
        assert!((fd_x - spline.deriv_x(x, y, z)).abs() < 1e-5);
        let fd_y = (e(x, y + h, z) - e(x, y - h, z)) / (2.0 * h);
        assert!((fd_y - spline.deriv_y(x, y, z)).abs() < 1e-5);
        let fd_z = (e(x, y, z + h) - e(x, y, z - h)) / (2.0 * h);
        assert!((fd_z - spline.deriv_z(x, y, z)).abs() < 1e-5);

        let fd_xx = (e(x + h, y, z) - 2.0 * e(x, y, z) + e(x - h, y, z)) / (h * h);
        assert!((fd_xx - spline.deriv_xx(x, y, z)).abs() < 1e-4);
        let fd_yy = (e(x, y + h, z) - 2.0 * e(x, y, z) + e(x, y - h, z)) / (h * h);
        assert!((fd_yy - spline.deriv_yy(x, y, z)).abs() < 1e-4);
        let fd_zz = (e(x, y, z + h) - 2.0 * e(x, y, z) + e(x, y, z - h)) / (h * h);
        assert!((fd_zz - spline.deriv_zz(x, y, z)).abs() < 1e-4);

        let fd_xy = (e(x + h, y + h, z) - e(x + h, y - h, z) - e(x - h, y + h, z)
            + e(x - h, y - h, z))
            / (4.0 * h * h);
        assert!((fd_xy - spline.deriv_xy(x, y, z)).abs() < 1e-4);
        let fd_xz = (e(x + h, y, z + h) - e(x + h, y, z - h) - e(x - h, y, z + h)
            + e(x - h, y, z - h))
            / (4.0 * h * h);
        assert!((fd_xz - spline.deriv_xz(x, y, z)).abs() < 1e-4);
        let fd_yz = (e(x, y + h, z + h) - e(x, y + h, z - h) - e(x, y - h, z + h)
            + e(x, y - h, z - h))
            / (4.0 * h * h);
        assert!((fd_yz - spline.deriv_yz(x, y, z)).abs() < 1e-4);
    }

    #[test]
    fn test_partials_beyond_cubic_degree_are_zero() {
        let (xs, ys, zs, f) = random_grid();
        let spline = TricubicSpline::new(&xs, &ys, &zs, &f, BoundaryCondition::Natural).unwrap();
        assert_eq!(spline.partial(0.5, 0.5, 0.5, [4, 0, 0]), 0.0);
        assert_eq!(spline.partial(0.5, 0.5, 0.5, [0, 4, 0]), 0.0);
        assert_eq!(spline.partial(0.5, 0.5, 0.5, [0, 0, 4]), 0.0);
    }

    #[test]
    fn test_multi_matches_scalar() {
        let (xs, ys, zs, f) = random_grid();
        let spline = TricubicSpline::new(&xs, &ys, &zs, &f, BoundaryCondition::Natural).unwrap();

        let qx = [0.2, 0.4, 0.8];
        let qy = [0.2, 0.4, 0.8];
        let qz = [0.2, 0.4, 0.8];
        let out = spline.eval_alloc(&qx, &qy, &qz).unwrap();
        assert_eq!(out.len(), 3);
        for i in 0..3 {
            assert_eq!(out[i], spline.eval(qx[i], qy[i], qz[i]));
        }

        let mut short = [0.0; 2];
        assert!(matches!(
            spline.eval_multi(&qx, &qy, &qz, &mut short),
            Err(SplineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_construction_failures() {
        let (xs, ys, zs, f) = random_grid();

        assert!(matches!(
            TricubicSpline::new(&xs, &ys, &zs, &f[..100], BoundaryCondition::Natural),
            Err(SplineError::ShapeMismatch {
                expected: 125,
                found: 100
            })
        ));

        let xs_bad = [0.0, 0.3, 0.6, 1.0, 1.5];
        assert_eq!(
            TricubicSpline::new(&xs_bad, &ys, &zs, &f, BoundaryCondition::Natural).unwrap_err(),
            SplineError::NonUniformGrid
        );

        assert!(matches!(
            BoundaryCondition::<f64>::from_name("invalid-bc"),
            Err(SplineError::UnknownBoundaryCondition(_))
        ));
    }

    #[test]
    fn test_per_axis_boundary_conditions() {
        let (xs, ys, zs, f) = random_grid();
        let spline = TricubicSpline::with_axis_conditions(
            &xs,
            &ys,
            &zs,
            &f,
            BoundaryCondition::Natural,
            BoundaryCondition::NotAKnot,
            BoundaryCondition::Natural,
        )
        .unwrap();
        let (bx, by, bz) = spline.boundaries();
        assert_eq!(bx.name(), "natural");
        assert_eq!(by.name(), "not-a-knot");
        assert_eq!(bz.name(), "natural");

        // Natural along x zeroes the x-curvature on the x-boundary faces
        assert!(spline.deriv_xx(0.0, 0.5, 0.5).abs() < 1e-9);
        assert!(spline.deriv_xx(1.0, 0.5, 0.5).abs() < 1e-9);
    }
}
