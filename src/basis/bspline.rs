use std::ops::RangeInclusive;

use nalgebra::MatrixViewMut;

use crate::{
    basis::Basis,
    display::{self, EquationDisplay, Sign, DEFAULT_PRECISION},
    error::{Error, Result},
    value::Value,
};

/// Regression spline features: an intercept followed by a B-spline basis.
///
/// The basis is built from a clamped knot vector: the boundary knots (the range of the
/// training predictor) are repeated `degree + 1` times around the sorted interior knots.
///
/// ```text
/// [lo, lo, lo, lo, t₁, t₂, …, t_K, hi, hi, hi, hi]    (degree 3)
/// ```
///
/// That vector defines `K + degree + 1` basis functions which sum to 1 everywhere on
/// `[lo, hi]`. Since the fitted model already has an intercept column, the first function
/// is dropped, leaving `K + degree` spline columns. Column 0 is the intercept, so
/// `k = 1 + K + degree`.
///
/// The full knot vector and boundary are stored, so the basis evaluated on new inputs
/// (a prediction grid for example) lines up exactly with the training design.
///
/// # Example
/// ```rust
/// use wagefit::basis::{Basis, BSplineBasis};
/// let basis = BSplineBasis::cubic(&[15.0, 30.0, 45.0], 0.0..=60.0).unwrap();
/// assert_eq!(basis.k(), 7);
/// assert_eq!(basis.knot_vector().len(), 11);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineBasis<T: Value = f64> {
    degree: usize,
    interior: Vec<T>,
    knots: Vec<T>,
    lo: T,
    hi: T,
}
impl<T: Value> BSplineBasis<T> {
    /// Creates a cubic B-spline basis with the given interior knots, clamped at `x_range`.
    ///
    /// # Errors
    /// See [`BSplineBasis::new`].
    pub fn cubic(knots: &[T], x_range: RangeInclusive<T>) -> Result<Self> {
        Self::new(knots, x_range, 3)
    }

    /// Creates a B-spline basis of the given degree.
    ///
    /// `x_range` is the boundary of the basis, normally the min and max of the training predictor.
    /// Interior knots may be given in any order.
    ///
    /// # Errors
    /// - [`Error::InvalidDegree`] if `degree` is 0
    /// - [`Error::InvalidKnots`] if there are no knots, a knot is non-finite, outside or on
    ///   the boundary, or repeated; or if the boundary itself is empty or non-finite.
    pub fn new(knots: &[T], x_range: RangeInclusive<T>, degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(Error::InvalidDegree(degree));
        }

        let (lo, hi) = x_range.into_inner();
        if !lo.is_finite_value() || !hi.is_finite_value() || lo >= hi {
            return Err(Error::InvalidKnots(format!(
                "boundary [{lo}, {hi}] must be a finite, non-empty interval"
            )));
        }

        if knots.is_empty() {
            return Err(Error::InvalidKnots("at least one interior knot is required".into()));
        }

        if let Some(bad) = knots.iter().find(|k| !k.is_finite_value()) {
            return Err(Error::InvalidKnots(format!("knot {bad} is not finite")));
        }

        if let Some(bad) = knots.iter().find(|&&k| k <= lo || k >= hi) {
            return Err(Error::InvalidKnots(format!(
                "knot {bad} is not strictly inside the data range ({lo}, {hi})"
            )));
        }

        let mut interior = knots.to_vec();
        interior.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(pair) = interior.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::InvalidKnots(format!("knot {} is repeated", pair[0])));
        }

        let mut full = Vec::with_capacity(interior.len() + 2 * (degree + 1));
        full.extend(std::iter::repeat_n(lo, degree + 1));
        full.extend_from_slice(&interior);
        full.extend(std::iter::repeat_n(hi, degree + 1));

        log::debug!(
            "B-spline basis: degree {degree}, {} interior knots, boundary [{lo}, {hi}]",
            interior.len()
        );

        Ok(Self {
            degree,
            interior,
            knots: full,
            lo,
            hi,
        })
    }

    /// Degree of the piecewise polynomials.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Sorted interior knots.
    #[must_use]
    pub fn interior_knots(&self) -> &[T] {
        &self.interior
    }

    /// The full clamped knot vector, boundary knots included.
    #[must_use]
    pub fn knot_vector(&self) -> &[T] {
        &self.knots
    }

    /// Number of B-spline functions defined by the knot vector, before the first is dropped.
    #[must_use]
    pub fn num_functions(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Evaluates every B-spline function at `x`, including the one dropped from the design.
    ///
    /// Returns `num_functions` values. For `x` in the boundary they are non-negative and sum to 1.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if `x` is outside the boundary.
    pub fn evaluate_all(&self, x: T) -> Result<Vec<T>> {
        self.check_domain(x)?;
        let mut values = vec![T::zero(); self.num_functions()];
        self.evaluate_into(x, &mut values);
        Ok(values)
    }

    /// Cox-de Boor recursion over the single knot span containing `x`.
    ///
    /// `values` must hold `num_functions` entries. Only the `degree + 1` functions that are
    /// non-zero on the span are written; the rest are set to zero.
    fn evaluate_into(&self, x: T, values: &mut [T]) {
        let p = self.degree;
        let knots = &self.knots;
        let num_basis = self.num_functions();

        // Right end belongs to the last non-degenerate span
        let span = if x >= knots[num_basis] {
            num_basis - 1
        } else if x < knots[p] {
            p
        } else {
            let mut span = p;
            while span < num_basis && x >= knots[span + 1] {
                span += 1;
            }
            span
        };

        let mut n = vec![T::zero(); p + 1];
        let mut left = vec![T::zero(); p + 1];
        let mut right = vec![T::zero(); p + 1];
        n[0] = T::one();

        for d in 1..=p {
            left[d] = x - knots[span + 1 - d];
            right[d] = knots[span + d] - x;

            let mut saved = T::zero();
            for r in 0..d {
                let den = right[r + 1] + left[d - r];
                let temp = if den.is_zero() { T::zero() } else { n[r] / den };

                n[r] = saved + right[r + 1] * temp;
                saved = left[d - r] * temp;
            }
            n[d] = saved;
        }

        values.fill(T::zero());
        let start = span - p;
        for (i, v) in n.into_iter().enumerate() {
            if let Some(slot) = values.get_mut(start + i) {
                *slot = v;
            }
        }
    }
}
impl<T: Value> Basis<T> for BSplineBasis<T> {
    fn k(&self) -> usize {
        // Intercept replaces the dropped first function
        self.num_functions()
    }

    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        x: T,
        mut row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        debug_assert!(
            x >= self.lo && x <= self.hi,
            "x = {x} is outside the spline boundary {}..={}",
            self.lo,
            self.hi
        );

        let mut values = vec![T::zero(); self.num_functions()];
        self.evaluate_into(x, &mut values);

        row[0] = T::one();
        for (j, v) in values.into_iter().enumerate().skip(1) {
            if j < row.ncols() {
                row[j] = v;
            }
        }
    }

    fn column_name(&self, j: usize) -> String {
        match j {
            0 => "const".to_string(),
            _ => format!("bs[{j}]"),
        }
    }

    fn domain(&self) -> Option<RangeInclusive<T>> {
        Some(self.lo..=self.hi)
    }
}
impl<T: Value> EquationDisplay<T> for BSplineBasis<T> {
    fn format_term(&self, column: usize, coef: T) -> Option<display::Term> {
        let sign = Sign::from_coef(coef);
        let coef = display::format_coefficient(coef, column, DEFAULT_PRECISION)?;

        let body = match column {
            0 => coef,
            _ => format!(
                "{coef}{}(x)",
                display::format_variable("B", Some(&column.to_string()), 1)
            ),
        };

        Some(display::Term::new(sign, body))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;
    use crate::{assert_all_close, assert_close, value::linspace};

    fn wage_basis() -> BSplineBasis {
        BSplineBasis::cubic(&[27.0, 8.0, 15.0], -2.0..=59.0).unwrap()
    }

    #[test]
    fn clamped_knot_vector() {
        let basis = wage_basis();
        assert_eq!(basis.interior_knots(), &[8.0, 15.0, 27.0]);
        assert_eq!(
            basis.knot_vector(),
            &[-2.0, -2.0, -2.0, -2.0, 8.0, 15.0, 27.0, 59.0, 59.0, 59.0, 59.0]
        );
        assert_eq!(basis.num_functions(), 7);
        assert_eq!(basis.k(), 7);
        assert_eq!(basis.degree(), 3);
    }

    #[test]
    fn partition_of_unity() {
        let basis = wage_basis();
        for x in linspace(-2.0, 59.0, 250) {
            let values = basis.evaluate_all(x).unwrap();
            assert!(values.iter().all(|&v| v >= -1e-12), "negative basis at {x}");
            assert_close!(values.iter().sum::<f64>(), 1.0, tol = 1e-12);
        }
    }

    #[test]
    fn boundary_values() {
        let basis = wage_basis();

        let at_lo = basis.evaluate_all(-2.0).unwrap();
        assert_all_close!(at_lo, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let at_hi = basis.evaluate_all(59.0).unwrap();
        assert_all_close!(at_hi, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);

        assert!(matches!(basis.evaluate_all(59.5), Err(Error::DataRange(_, _))));
        assert!(matches!(basis.evaluate_all(-2.5), Err(Error::DataRange(_, _))));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside the spline boundary")]
    fn unchecked_row_outside_boundary() {
        let basis = wage_basis();
        let mut m = DMatrix::<f64>::zeros(1, basis.k());
        basis.fill_matrix_row(60.0, m.row_mut(0));
    }

    #[test]
    fn design_row_drops_first_function() {
        let basis = wage_basis();
        let x = 11.5;
        let full = basis.evaluate_all(x).unwrap();

        let mut m = DMatrix::zeros(1, basis.k());
        basis.fill_matrix_row(x, m.row_mut(0));

        assert_close!(m[(0, 0)], 1.0);
        for j in 1..basis.k() {
            assert_close!(m[(0, j)], full[j]);
        }
    }

    #[test]
    fn degree_one_is_piecewise_linear() {
        // Hat functions at 0, 1, 2
        let basis = BSplineBasis::new(&[1.0], 0.0..=2.0, 1).unwrap();
        assert_all_close!(basis.evaluate_all(0.5).unwrap(), [0.5, 0.5, 0.0]);
        assert_all_close!(basis.evaluate_all(1.0).unwrap(), [0.0, 1.0, 0.0]);
        assert_all_close!(basis.evaluate_all(1.25).unwrap(), [0.0, 0.75, 0.25]);
    }

    #[test]
    fn dimension_depends_on_knots_only() {
        for knots in [&[30.0][..], &[8.0, 15.0, 27.0], &[10.0, 20.0, 30.0, 40.0, 50.0]] {
            let narrow = BSplineBasis::cubic(knots, 0.0..=60.0).unwrap();
            let wide = BSplineBasis::cubic(knots, -100.0..=100.0).unwrap();
            assert_eq!(narrow.k(), 1 + knots.len() + 3);
            assert_eq!(narrow.k(), wide.k());
        }
    }

    #[test]
    fn invalid_knots() {
        let cases: [&[f64]; 6] = [
            &[],
            &[f64::NAN],
            &[-5.0, 20.0],
            &[0.0, 20.0],
            &[60.0],
            &[15.0, 30.0, 15.0],
        ];
        for knots in cases {
            assert!(
                matches!(BSplineBasis::cubic(knots, 0.0..=60.0), Err(Error::InvalidKnots(_))),
                "{knots:?} accepted"
            );
        }

        assert!(matches!(
            BSplineBasis::cubic(&[1.0], 5.0..=5.0),
            Err(Error::InvalidKnots(_))
        ));
        assert!(matches!(
            BSplineBasis::new(&[1.0], 0.0..=5.0, 0),
            Err(Error::InvalidDegree(0))
        ));
    }

    #[test]
    fn names_and_equation() {
        let basis = BSplineBasis::cubic(&[30.0], 0.0..=60.0).unwrap();
        assert_eq!(
            basis.column_names(),
            vec!["const", "bs[1]", "bs[2]", "bs[3]", "bs[4]"]
        );

        let mut eq = String::new();
        basis
            .format_equation(&mut eq, &[2.0, 0.0, -1.5, 0.0, 3.0])
            .unwrap();
        assert_eq!(eq, "y(x) = 3.00B₄(x) - 1.50B₂(x) + 2.00");
    }
}
