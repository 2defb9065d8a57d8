//! Assertions for floating-point results.
//!
//! Fitted coefficients, basis values, and error metrics are computed through matrix
//! factorizations, so exact comparisons are rarely meaningful. These macros compare within a
//! tolerance instead.
//!
//! ### [`crate::assert_close`]
//! `assert_eq!` equivalent for floats.
//! - The default tolerance is `sqrt(ε)` scaled by the larger magnitude of the two values (at least 1).
//! - `tol = <value>` sets an explicit absolute tolerance.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two collections of the same length.

/// Default tolerance for [`crate::assert_close`], relative to the magnitude of the compared values.
#[doc(hidden)]
#[must_use]
pub fn default_tolerance<T: crate::value::Value>(a: T, b: T) -> T {
    let scale = nalgebra::RealField::max(
        T::one(),
        nalgebra::RealField::max(crate::value::Value::abs(a), crate::value::Value::abs(b)),
    );
    T::epsilon().sqrt() * scale
}

/// Asserts that two floating-point values are approximately equal.
///
/// # Parameters
/// - `$a`, `$b`: Values to compare.
/// - `tol = $tol`: *(optional)* Absolute tolerance. Defaults to [`default_tolerance`].
/// - `$msg`: *(optional)* Custom failure message, with `format!` arguments.
///
/// # Panics
/// If `|a - b|` exceeds the tolerance, or either value is NaN.
///
/// # Examples
/// ```
/// # use wagefit::assert_close;
/// assert_close!(0.1 + 0.2, 0.3);
/// assert_close!(10.0, 10.4, tol = 0.5, "within {}", "half a unit");
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tol = $tol:expr $(, $($msg:tt)+)?) => { #[allow(clippy::float_cmp)] {
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($($msg)+); )?

        let (a, b, tol) = ($a, $b, $tol);
        assert!(
            a == b || $crate::value::Value::abs(a - b) <= tol,
            "{msg}: {a} != {b} (tolerance {tol})"
        );
    }};

    ($a:expr, $b:expr $(, $($msg:tt)+)?) => {{
        let (a, b) = ($a, $b);
        let tol = $crate::test::default_tolerance(a, b);
        $crate::assert_close!(a, b, tol = tol $(, $($msg)+)?);
    }};
}

/// Asserts that two collections of floating-point values are approximately equal element-wise.
///
/// # Parameters
/// - `$src`: Source collection (implements `iter()` and `len()`).
/// - `$dst`: Expected collection, same length as `$src`.
/// - `tol = $tol`: *(optional)* Absolute tolerance passed to [`crate::assert_close`].
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements is not close.
///
/// # Examples
/// ```
/// # use wagefit::assert_all_close;
/// assert_all_close!([1.0, 2.0], vec![1.0, 2.0 + 1e-12]);
/// assert_all_close!([1.0, 2.0], [1.1, 1.9], tol = 0.2);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, tol = $tol:expr) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "{} elements - length mismatch", src.len());

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tol = $tol, "src[{}]", i);
        }
    }};

    ($src:expr, $dst:expr) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "{} elements - length mismatch", src.len());

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, "src[{}]", i);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn close_values() {
        assert_close!(1.0 + 1e-16, 1.0);
        assert_close!(1e6 + 1e-4, 1e6);
        assert_close!(3.0, 3.2, tol = 0.25);
        assert_all_close!(vec![1.0, 2.0, 3.0], [1.0, 2.0, 3.0 + 1e-12]);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn distant_values() {
        assert_close!(1.0, 1.001);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn length_mismatch() {
        assert_all_close!([1.0, 2.0], [1.0]);
    }

    #[test]
    #[should_panic(expected = "src[1]")]
    fn element_mismatch() {
        assert_all_close!([1.0, 2.0], [1.0, 2.5], tol = 0.1);
    }
}
