//! Piecewise-cubic spline interpolation on regular grids in one, two, and
//! three dimensions, with analytic partial derivatives.
//!
//! Each spline is constructed once from a grid of samples and a boundary
//! condition, solving a tridiagonal (or cyclic, for periodic boundaries)
//! system for the knot moments per axis and composing multi-dimensional
//! interpolants as tensor products of one-dimensional builds. The result
//! is an immutable table of per-cell polynomial coefficients that can be
//! evaluated, differentiated, and inspected arbitrarily many times.
//!
//! ```rust
//! use multispline::utils::linspace;
//! use multispline::{BicubicSpline, BoundaryCondition, CubicSplineUniform};
//!
//! // 1D: samples on a uniform grid described by origin and step
//! let f = [0.0_f64, 1.0, 0.5, -1.0, -0.5, 0.0];
//! let spline = CubicSplineUniform::new(0.0, 1.0, &f, BoundaryCondition::Natural).unwrap();
//! assert_eq!(spline.coefficients().len(), 5);
//! assert!((spline.eval(3.0) + 1.0).abs() < 1e-12);
//!
//! // 2D: boundary conditions may also be resolved from registry names
//! let bc = BoundaryCondition::from_name("not-a-knot").unwrap();
//! let xs: Vec<f64> = linspace(0.0, 1.0, 5);
//! let ys: Vec<f64> = linspace(0.0, 1.0, 5);
//! let f: Vec<f64> = xs
//!     .iter()
//!     .flat_map(|&x| ys.iter().map(move |&y| x.sin() * y.cos()))
//!     .collect();
//! let surf = BicubicSpline::new(&xs, &ys, &f, bc).unwrap();
//! assert!((surf.eval(0.5, 0.5) - 0.5_f64.sin() * 0.5_f64.cos()).abs() < 1e-3);
//! ```
// These "needless" range loops are a significant speedup
#![allow(clippy::needless_range_loop)]

pub mod bicubic;
pub mod boundary;
pub mod cubic;
pub mod error;
pub mod tricubic;
pub mod tridiagonal;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use bicubic::BicubicSpline;
pub use boundary::{available_boundary_conditions, BoundaryCondition};
pub use cubic::{CubicSpline, CubicSplineUniform};
pub use error::SplineError;
pub use tricubic::{TricubicCoefficients, TricubicSpline};
