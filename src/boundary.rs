//! Boundary conditions closing the per-axis moment system.
//!
//! Each spline axis leaves two degrees of freedom open after the interior
//! continuity equations are written; the boundary condition supplies the
//! pair of end constraints that closes the system. The closed set of
//! conditions is exposed both as a tagged enum and, for callers that select
//! by name, as a registry of string keys.
use num_traits::Float;

use crate::error::SplineError;

/// Registered boundary condition names, in registry order.
/// `BoundaryCondition::from_name` accepts exactly this set.
pub const BOUNDARY_CONDITION_NAMES: [&str; 4] = ["natural", "not-a-knot", "clamped", "periodic"];

/// The set of boundary condition names accepted during construction.
pub fn available_boundary_conditions() -> &'static [&'static str] {
    &BOUNDARY_CONDITION_NAMES
}

/// End constraints applied at an axis's first and last knot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition<T> {
    /// Zero second derivative at both ends.
    Natural,

    /// Third-derivative continuity across the first and last interior
    /// knot, so the two outermost polynomial pairs each merge into one
    /// cubic.
    NotAKnot,

    /// Fixed first derivative at each end, in grid coordinates.
    /// The registry name `"clamped"` maps to zero end slopes.
    Clamped { left: T, right: T },

    /// Value, first, and second derivative at the first knot wrap to the
    /// last knot. The final sample is expected to repeat the first.
    Periodic,
}

impl<T: Float> BoundaryCondition<T> {
    /// Resolve a registry name to its end-constraint pair.
    ///
    /// # Errors
    /// * `UnknownBoundaryCondition` if `name` is not registered
    pub fn from_name(name: &str) -> Result<Self, SplineError> {
        match name {
            "natural" => Ok(Self::Natural),
            "not-a-knot" => Ok(Self::NotAKnot),
            "clamped" => Ok(Self::Clamped {
                left: T::zero(),
                right: T::zero(),
            }),
            "periodic" => Ok(Self::Periodic),
            _ => Err(SplineError::UnknownBoundaryCondition(name.to_string())),
        }
    }

    /// The registry name this condition was resolved from.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::NotAKnot => "not-a-knot",
            Self::Clamped { .. } => "clamped",
            Self::Periodic => "periodic",
        }
    }
}
