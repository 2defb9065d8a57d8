//! Feature (design) matrices.
//!
//! A [`FeatureMatrix`] is the `n × k` matrix produced by expanding one predictor column
//! through a [`Basis`]: one row per input value, one column per basis function.
use nalgebra::{DMatrix, DVectorView};

use crate::{
    basis::Basis,
    error::{Error, Result},
    value::Value,
};

/// An `n × k` feature matrix built from a basis.
///
/// Row `i` is the basis evaluated at the `i`th input; column 0 is the intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix<T: Value = f64> {
    matrix: DMatrix<T>,
}
impl<T: Value> FeatureMatrix<T> {
    /// Expands `xs` through `basis`.
    ///
    /// The number of columns depends only on the basis, never on `xs`.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if any value lies outside [`Basis::domain`] or is not finite.
    ///
    /// # Example
    /// ```rust
    /// use wagefit::{basis::MonomialBasis, design::FeatureMatrix};
    /// let basis = MonomialBasis::new(2).unwrap();
    /// let m = FeatureMatrix::expand(&basis, &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!((m.nrows(), m.ncols()), (3, 3));
    /// assert_eq!(m.column(2).as_slice(), &[1.0, 4.0, 9.0]);
    /// ```
    pub fn expand<B: Basis<T>>(basis: &B, xs: &[T]) -> Result<Self> {
        let mut matrix = DMatrix::zeros(xs.len(), basis.k());
        for (i, &x) in xs.iter().enumerate() {
            basis.check_domain(x)?;
            basis.fill_matrix_row(x, matrix.row_mut(i));
        }

        Ok(Self { matrix })
    }

    /// Wraps an existing matrix.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if the matrix has no columns.
    pub fn from_matrix(matrix: DMatrix<T>) -> Result<Self> {
        if matrix.ncols() == 0 {
            return Err(Error::NoData);
        }
        Ok(Self { matrix })
    }

    /// Number of rows (observations).
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns (features, intercept included).
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Column `j` of the matrix.
    ///
    /// # Panics
    /// Panics if `j >= ncols()`.
    #[must_use]
    pub fn column(&self, j: usize) -> DVectorView<'_, T> {
        self.matrix.column(j)
    }

    /// The underlying matrix.
    #[must_use]
    pub fn as_matrix(&self) -> &DMatrix<T> {
        &self.matrix
    }

    /// Consumes the wrapper, returning the underlying matrix.
    #[must_use]
    pub fn into_matrix(self) -> DMatrix<T> {
        self.matrix
    }
}
