use nalgebra::MatrixViewMut;

use crate::{
    basis::Basis,
    display::{self, EquationDisplay, Sign, DEFAULT_PRECISION},
    error::{Error, Result},
    value::{IntClampedCast, Value},
};

/// Polynomial features: an intercept followed by powers of `x`.
///
/// The monomial basis of degree `d` expands `x` into:
///
/// ```text
/// 1, x, x², …, xᵈ
/// ```
///
/// Column `j` holds `x^j`, so a degree-`d` basis has `d + 1` columns.
/// Degree 1 is simple linear regression.
///
/// It is **not normalized**, so high degrees on wide data ranges become
/// ill-conditioned. The degrees used here (up to 4 on values below 100) are well within
/// what the SVD solver handles.
#[derive(Debug, Clone, PartialEq)]
pub struct MonomialBasis<T: Value = f64> {
    degree: usize,
    _marker: std::marker::PhantomData<T>,
}
impl<T: Value> MonomialBasis<T> {
    /// Creates a polynomial basis of the given degree.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDegree`] if `degree` is 0.
    ///
    /// # Example
    /// ```rust
    /// use wagefit::basis::{Basis, MonomialBasis};
    /// let basis = MonomialBasis::<f64>::new(4).unwrap();
    /// assert_eq!(basis.k(), 5);
    /// ```
    pub fn new(degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(Error::InvalidDegree(degree));
        }

        Ok(Self {
            degree,
            _marker: std::marker::PhantomData,
        })
    }

    /// The degree-1 basis: intercept and slope.
    #[must_use]
    pub const fn linear() -> Self {
        Self {
            degree: 1,
            _marker: std::marker::PhantomData,
        }
    }

    /// Highest power of `x` in the basis.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluates the `j`th basis function at `x`.
    #[inline(always)]
    pub fn solve_function(&self, j: usize, x: T) -> T {
        match j {
            0 => T::one(),
            1 => x,
            _ => Value::powi(x, j.clamped_cast()),
        }
    }
}
impl<T: Value> Basis<T> for MonomialBasis<T> {
    #[inline(always)]
    fn k(&self) -> usize {
        self.degree + 1
    }

    #[inline(always)]
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        x: T,
        mut row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        for j in 0..row.ncols().min(self.k()) {
            row[j] = self.solve_function(j, x);
        }
    }

    fn column_name(&self, j: usize) -> String {
        match j {
            0 => "const".to_string(),
            _ => display::format_variable("x", None, j.clamped_cast()),
        }
    }
}
impl<T: Value> EquationDisplay<T> for MonomialBasis<T> {
    fn format_term(&self, column: usize, coef: T) -> Option<display::Term> {
        let sign = Sign::from_coef(coef);

        let base = display::format_variable("x", None, column.clamped_cast());
        let coef = display::format_coefficient(coef, column, DEFAULT_PRECISION)?;

        Some(display::Term::new(sign, format!("{coef}{base}")))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;

    #[test]
    fn rejects_degree_zero() {
        assert!(matches!(
            MonomialBasis::<f64>::new(0),
            Err(Error::InvalidDegree(0))
        ));
    }

    #[test]
    fn matrix_row_holds_powers() {
        let basis = MonomialBasis::<f64>::new(4).unwrap();
        let mut m = DMatrix::zeros(1, basis.k());
        basis.fill_matrix_row(2.0, m.row_mut(0));
        assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), [1.0, 2.0, 4.0, 8.0, 16.0]);

        for j in 1..=4 {
            assert_eq!(basis.solve_function(j, 3.0), 3.0_f64.powi(j as i32));
        }
    }

    #[test]
    fn dimension_and_names() {
        let basis = MonomialBasis::<f64>::linear();
        assert_eq!(basis.degree(), 1);
        assert_eq!(basis.k(), 2);

        let basis = MonomialBasis::<f64>::new(3).unwrap();
        assert_eq!(basis.column_names(), vec!["const", "x", "x²", "x³"]);
    }

    #[test]
    fn equation() {
        let basis = MonomialBasis::<f64>::new(2).unwrap();
        let mut eq = String::new();
        basis.format_equation(&mut eq, &[5.0, 1.0, -0.5]).unwrap();
        assert_eq!(eq, "y(x) = -0.50x² + x + 5.00");
    }
}
