//! Feature bases for least-squares fitting
//!
//! This module defines the [`Basis`] trait, which abstracts how a single predictor
//! column is expanded into the columns of a feature (design) matrix.
//!
//! # Provided Bases
//! - [`MonomialBasis`]: An intercept column followed by the powers x, x², … xᵈ.
//! - [`BSplineBasis`]: An intercept column followed by a cubic B-spline basis with
//!   fixed interior knots, clamped at the range of the training data.
//! - [`FeatureBasis`]: Either of the above, chosen at runtime.
//!
//! # Reproducibility
//! A basis carries every parameter it needs (degree, knot vector, boundary), so the
//! same basis evaluated on a prediction grid produces columns aligned with the
//! training matrix. Nothing is re-derived from the new inputs.
use std::ops::RangeInclusive;

use nalgebra::MatrixViewMut;

use crate::{
    display::{EquationDisplay, Term},
    error::{Error, Result},
    value::Value,
};

pub(crate) mod monomial;
pub use monomial::MonomialBasis;

pub(crate) mod bspline;
pub use bspline::BSplineBasis;

/// A trait representing a feature basis.
///
/// A basis turns one predictor value `x` into a row of `k` feature values.
/// The first column is always the intercept (a column of ones).
///
/// It is not meant to be used on its own, but through [`crate::design::FeatureMatrix`]
/// or [`crate::LinearFit`], which are generic over basis.
///
/// # Type Parameters
/// - `T`: The numeric type used for features and coefficients (e.g., `f64`).
pub trait Basis<T: Value>: Sized + Clone + std::fmt::Debug + Send + Sync {
    /// Returns the number of feature columns per row, intercept included.
    fn k(&self) -> usize;

    /// Populates a row of a feature matrix with this basis evaluated at `x`.
    ///
    /// All `k` values are written into `row`, starting at column 0.
    /// `x` must already be inside [`Basis::domain`]; see [`Basis::check_domain`].
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        x: T,
        row: MatrixViewMut<T, R, C, RS, CS>,
    );

    /// The name of feature column `j`, used in fit summaries.
    fn column_name(&self, j: usize) -> String;

    /// The closed interval this basis is defined on, or `None` if it is defined everywhere.
    fn domain(&self) -> Option<RangeInclusive<T>> {
        None
    }

    /// The names of all feature columns.
    fn column_names(&self) -> Vec<String> {
        (0..self.k()).map(|j| self.column_name(j)).collect()
    }

    /// Checks that `x` lies inside [`Basis::domain`].
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if `x` is not finite (reported as `-inf..=inf`) or is
    /// outside the domain.
    fn check_domain(&self, x: T) -> Result<()> {
        if !x.is_finite_value() {
            return Err(Error::DataRange("-inf".into(), "inf".into()));
        }

        match self.domain() {
            Some(domain) if !domain.contains(&x) => Err(Error::DataRange(
                format!("{}", domain.start()),
                format!("{}", domain.end()),
            )),
            _ => Ok(()),
        }
    }
}

/// A basis chosen at runtime: polynomial powers or a cubic B-spline.
///
/// Lets model variants with different expansions share a single fit type.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureBasis<T: Value = f64> {
    /// Intercept plus powers of `x`
    Monomial(MonomialBasis<T>),

    /// Intercept plus a B-spline basis
    Spline(BSplineBasis<T>),
}
impl<T: Value> From<MonomialBasis<T>> for FeatureBasis<T> {
    fn from(basis: MonomialBasis<T>) -> Self {
        Self::Monomial(basis)
    }
}
impl<T: Value> From<BSplineBasis<T>> for FeatureBasis<T> {
    fn from(basis: BSplineBasis<T>) -> Self {
        Self::Spline(basis)
    }
}
impl<T: Value> Basis<T> for FeatureBasis<T> {
    fn k(&self) -> usize {
        match self {
            Self::Monomial(b) => b.k(),
            Self::Spline(b) => b.k(),
        }
    }

    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        x: T,
        row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        match self {
            Self::Monomial(b) => b.fill_matrix_row(x, row),
            Self::Spline(b) => b.fill_matrix_row(x, row),
        }
    }

    fn column_name(&self, j: usize) -> String {
        match self {
            Self::Monomial(b) => b.column_name(j),
            Self::Spline(b) => b.column_name(j),
        }
    }

    fn domain(&self) -> Option<RangeInclusive<T>> {
        match self {
            Self::Monomial(b) => b.domain(),
            Self::Spline(b) => b.domain(),
        }
    }
}
impl<T: Value> EquationDisplay<T> for FeatureBasis<T> {
    fn format_term(&self, column: usize, coef: T) -> Option<Term> {
        match self {
            Self::Monomial(b) => b.format_term(column, coef),
            Self::Spline(b) => b.format_term(column, coef),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_basis_delegates() {
        let poly: FeatureBasis = MonomialBasis::new(2).unwrap().into();
        assert_eq!(poly.k(), 3);
        assert_eq!(poly.domain(), None);
        assert!(poly.check_domain(1e6).is_ok());
        assert!(poly.check_domain(f64::NAN).is_err());

        let spline: FeatureBasis = BSplineBasis::cubic(&[8.0, 15.0, 27.0], 0.0..=60.0)
            .unwrap()
            .into();
        assert_eq!(spline.k(), 7);
        assert_eq!(spline.domain(), Some(0.0..=60.0));
        assert!(spline.check_domain(60.0).is_ok());
        assert!(matches!(
            spline.check_domain(60.5),
            Err(Error::DataRange(_, _))
        ));
        assert_eq!(spline.column_names().len(), 7);
    }

    #[test]
    fn non_finite_reported_before_range() {
        let spline = BSplineBasis::cubic(&[8.0, 15.0, 27.0], 0.0..=60.0).unwrap();
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            match spline.check_domain(x) {
                Err(Error::DataRange(lo, hi)) => assert_eq!((lo.as_str(), hi.as_str()), ("-inf", "inf")),
                other => panic!("unexpected result for {x}: {other:?}"),
            }
        }

        match spline.check_domain(-1.0) {
            Err(Error::DataRange(lo, hi)) => assert_eq!((lo.as_str(), hi.as_str()), ("0", "60")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
