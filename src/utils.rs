//! Small grid-construction helpers used by tests, benches, and examples.
use itertools::Itertools;
use num_traits::Float;

/// Evenly spaced values from `start` to `stop` inclusive.
pub fn linspace<T>(start: T, stop: T, n: usize) -> Vec<T>
where
    T: Float,
{
    let dx: T = (stop - start) / T::from(n - 1).unwrap();
    (0..n).map(|i| start + T::from(i).unwrap() * dx).collect()
}

/// Cartesian product of the given axes in C order, one point per row,
/// with the last axis varying fastest. Matches the row-major sample
/// ordering the spline constructors expect.
pub fn meshgrid<T>(axes: &[&[T]]) -> Vec<Vec<T>>
where
    T: Float,
{
    axes.iter()
        .map(|ax| ax.iter().copied())
        .multi_cartesian_product()
        .collect()
}
