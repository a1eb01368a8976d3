//! Construction-time failure taxonomy.
//!
//! All variants are raised synchronously while a spline is being built;
//! evaluation on a successfully constructed spline does not fail, and
//! non-finite query coordinates propagate arithmetically rather than
//! being trapped.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplineError {
    /// Sample extent disagrees with the corresponding grid axis length.
    #[error("sample extent {found} does not match grid axis of {expected} points")]
    ShapeMismatch { expected: usize, found: usize },

    /// A grid axis has too few knots to support a cubic fit.
    #[error("grid axis of {len} points is below the minimum of {min}")]
    GridTooSmall { len: usize, min: usize },

    /// Knot spacing is not constant within tolerance, or the axis is
    /// not strictly increasing.
    #[error("grid spacing is not uniform within tolerance")]
    NonUniformGrid,

    /// Boundary condition name is not in the registry.
    #[error("unknown boundary condition `{0}`")]
    UnknownBoundaryCondition(String),

    /// The per-axis moment system is singular or near-singular. Not
    /// reachable for grids that pass the construction checks.
    #[error("tridiagonal system is singular or near-singular")]
    SingularSystem,
}
