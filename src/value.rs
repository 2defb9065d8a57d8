//! Numeric types and sampling utilities for fits.
//!
//! This module defines the [`Value`] trait, which abstracts the numeric
//! types that can be used in feature expansion and least-squares fitting, ensuring
//! compatibility with nalgebra, floating-point operations, and formatting.
//!
//! # Traits
//!
//! - [`Value`]: Extends `FloatCore`, `Scalar`, and `ComplexField` to provide:
//!   - A canonical `two()` constant.
//!   - `try_cast` for safe type conversion with error handling.
//!   - `powi` and `abs` without method ambiguity.
//! - [`CoordExt`]: Access to the `x`/`y` halves of `(x, y)` point slices.
//!
//! # Sampling
//!
//! - [`linspace`]: Evenly spaced values over a closed interval, used to build
//!   prediction grids for smooth curves.
//!
//! # Example
//!
//! ```rust
//! use wagefit::value::{linspace, Value};
//!
//! let grid = linspace(0.0, 1.0, 5);
//! assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
//!
//! let squared = Value::powi(f64::two(), 2);
//! ```
use std::ops::RangeInclusive;

use crate::error::Error;

/// Numeric type for fits
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Returns true if the value is neither infinite nor NaN
    fn is_finite_value(&self) -> bool {
        num_traits::float::FloatCore::is_finite(*self)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Returns `n` evenly spaced values over `[start, end]`.
///
/// The first value is exactly `start` and the last is exactly `end`.
/// - `n == 0` yields an empty vector
/// - `n == 1` yields `[start]`
///
/// # Example
/// ```rust
/// let grid = wagefit::value::linspace(2.0, 4.0, 3);
/// assert_eq!(grid, vec![2.0, 3.0, 4.0]);
/// ```
#[must_use]
pub fn linspace<T: Value>(start: T, end: T, n: usize) -> Vec<T> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let last = n - 1;
            let step = (end - start) / T::from_positive_int(last);
            (0..n)
                .map(|i| {
                    if i == last {
                        end
                    } else {
                        start + step * T::from_positive_int(i)
                    }
                })
                .collect()
        }
    }
}

/// Returns `n` evenly spaced values over an inclusive range.
///
/// See [`linspace`].
#[must_use]
pub fn linspace_range<T: Value>(range: &RangeInclusive<T>, n: usize) -> Vec<T> {
    linspace(*range.start(), *range.end(), n)
}

/// Extension trait for accessing the `x` and `y` coordinates of point slices.
///
/// # Examples
///
/// ```
/// # use wagefit::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// assert_eq!(data.x_range(), Some(0.0..=2.0));
/// ```
pub trait CoordExt<T: Value> {
    /// Returns an iterator over the x-coordinates.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// Returns an iterator over the y-coordinates.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Returns the x-coordinates.
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinates.
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Returns the inclusive range of x-coordinates, or `None` if there are none.
    fn x_range(&self) -> Option<RangeInclusive<T>> {
        min_max(self.x_iter())
    }

    /// Returns the inclusive range of y-coordinates, or `None` if there are none.
    fn y_range(&self) -> Option<RangeInclusive<T>> {
        min_max(self.y_iter())
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

/// Smallest and largest value of an iterator, as an inclusive range.
pub fn min_max<T: Value>(values: impl Iterator<Item = T>) -> Option<RangeInclusive<T>> {
    values
        .fold(None, |acc: Option<(T, T)>, v| {
            Some(match acc {
                Some((min, max)) => (
                    nalgebra::RealField::min(min, v),
                    nalgebra::RealField::max(max, v),
                ),
                None => (v, v),
            })
        })
        .map(|(min, max)| min..=max)
}

/// Trait for infallible integer casting with clamping.
pub trait IntClampedCast:
    num_traits::Num + num_traits::NumCast + num_traits::Bounded + Copy + PartialOrd + Ord
{
    /// Clamps a value to the range of the target type and casts it.
    fn clamped_cast<T: num_traits::PrimInt>(self) -> T {
        if let Some(v) = num_traits::cast(self) {
            return v;
        }

        let min = match num_traits::cast::<T, Self>(T::min_value()) {
            Some(v) => v,              // Self can go lower than T - clamp to min
            None => Self::min_value(), // Self cannot go lower than T
        };

        let max = match num_traits::cast::<T, Self>(T::max_value()) {
            Some(v) => v,              // Self can go higher than T - clamp to max
            None => Self::max_value(), // Self cannot go higher than T
        };

        let clamped = self.clamp(min, max);
        num_traits::cast(clamped).unwrap_or_else(T::max_value)
    }
}
impl<T: num_traits::PrimInt> IntClampedCast for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_endpoints() {
        let grid = linspace(-2.0, 59.0, 100);
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], -2.0);
        assert_eq!(grid[99], 59.0);

        let steps: Vec<f64> = grid.windows(2).map(|w| w[1] - w[0]).collect();
        for step in steps {
            assert!((step - 61.0 / 99.0).abs() < 1e-12);
        }
    }

    #[test]
    fn linspace_degenerate_sizes() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(5.0, 5.0, 3), vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn coord_ranges() {
        let data = vec![(3.0, 10.0), (1.0, 30.0), (2.0, 20.0)];
        assert_eq!(data.x_range(), Some(1.0..=3.0));
        assert_eq!(data.y_range(), Some(10.0..=30.0));
        assert_eq!(data.x(), vec![3.0, 1.0, 2.0]);

        let empty: Vec<(f64, f64)> = vec![];
        assert_eq!(empty.x_range(), None);
    }

    #[test]
    fn clamped_cast_edge_cases() {
        assert_eq!(0i8.clamped_cast::<i8>(), 0);
        assert_eq!((-1i8).clamped_cast::<u8>(), 0);
        assert_eq!(255u8.clamped_cast::<i8>(), 127);
        assert_eq!(usize::MAX.clamped_cast::<i32>(), i32::MAX);
        assert_eq!(4usize.clamped_cast::<i32>(), 4);
    }
}
