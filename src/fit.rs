use std::{borrow::Cow, ops::RangeInclusive};

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    basis::{BSplineBasis, Basis, FeatureBasis, MonomialBasis},
    design::FeatureMatrix,
    display::{self, EquationDisplay},
    error::{Error, Result},
    score::{Aic, Bic, ModelScoreProvider},
    statistics,
    value::{linspace_range, CoordExt, Value},
};

/// Polynomial regression: intercept plus powers of `x`
///
/// Degree 1 is simple linear regression.
pub type PolynomialFit<'data, T = f64> = LinearFit<'data, MonomialBasis<T>, T>;

/// Regression spline: intercept plus a B-spline basis with fixed interior knots
pub type SplineFit<'data, T = f64> = LinearFit<'data, BSplineBasis<T>, T>;

/// Fit over a basis chosen at runtime
pub type ModelFit<'data, T = f64> = LinearFit<'data, FeatureBasis<T>, T>;

/// Solves the least-squares problem `min ‖Xβ - y‖²` for `β`.
///
/// # How it works
/// - Takes the **SVD** of the `n × k` feature matrix directly, which avoids squaring its
///   condition number the way the normal equations `XᵀX β = Xᵀy` would.
/// - Singular values below `ε · max(n, k) · σ_max` are treated as zero.
/// - A Gaussian GLM with identity link has the same maximum-likelihood estimate, so this
///   single solver covers both.
///
/// # Errors
/// - [`Error::LengthMismatch`] if `y` does not have one value per row of `x`.
/// - [`Error::SingularMatrix`] if there are fewer rows than columns, or the columns are
///   linearly dependent (numerical rank below `k`).
/// - [`Error::Algebra`] if the decomposition fails or produces NaN coefficients.
///
/// # Example
/// ```
/// # use wagefit::{basis::MonomialBasis, design::FeatureMatrix, solve_least_squares};
/// let x = FeatureMatrix::expand(&MonomialBasis::<f64>::linear(), &[1.0, 2.0, 3.0]).unwrap();
/// let beta = solve_least_squares(&x, &[3.0, 5.0, 7.0]).unwrap();
/// assert!((beta[0] - 1.0).abs() < 1e-9 && (beta[1] - 2.0).abs() < 1e-9);
/// ```
pub fn solve_least_squares<T: Value>(x: &FeatureMatrix<T>, y: &[T]) -> Result<Vec<T>> {
    let (n, k) = (x.nrows(), x.ncols());
    if y.len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            actual: y.len(),
        });
    }
    if n < k {
        return Err(Error::SingularMatrix { n, k });
    }

    let b = DVector::from_column_slice(y);
    let decomp = SVD::new(x.as_matrix().clone(), true, true);

    // ~= machine_epsilon * max(size) * max_singular
    let sigma_max = decomp.singular_values.max();
    let epsilon = T::epsilon() * T::try_cast(n.max(k))? * sigma_max;

    let rank = decomp.rank(epsilon);
    if rank < k {
        log::debug!("Feature matrix {n}x{k} has numerical rank {rank}");
        return Err(Error::SingularMatrix { n, k });
    }

    let beta = decomp.solve(&b, epsilon).map_err(Error::Algebra)?;
    let coefficients: Vec<_> = beta.data.into();

    if coefficients.iter().any(|c| c.is_nan()) {
        return Err(Error::Algebra("NaN in coefficients"));
    }

    Ok(coefficients)
}

/// Covariance of the coefficients of a [`LinearFit`].
///
/// ```math
/// Cov(β) = σ² (XᵀX)⁻¹
/// ```
/// where `σ²` is the residual variance. The inverse is an SVD pseudo-inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct FitCovariance<T: Value = f64> {
    covariance: DMatrix<T>,
}
impl<T: Value> FitCovariance<T> {
    /// Computes the covariance matrix for a fit.
    ///
    /// See [`LinearFit::covariance`]
    ///
    /// # Errors
    /// Returns an error if `XᵀX` cannot be pseudo-inverted.
    pub fn new<B>(fit: &LinearFit<'_, B, T>) -> Result<Self>
    where
        B: Basis<T> + EquationDisplay<T>,
    {
        let x = fit.design().as_matrix();
        let xtx = x.transpose() * x;

        let (k, _) = xtx.shape();
        let svd = xtx.svd(true, true);
        let epsilon = T::epsilon() * T::try_cast(k)? * svd.singular_values.max();
        let xtx_inv = svd.pseudo_inverse(epsilon).map_err(Error::Algebra)?;

        let covariance = xtx_inv * fit.residual_variance();
        Ok(Self { covariance })
    }

    /// The full `k × k` covariance matrix.
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<T> {
        &self.covariance
    }

    /// Standard error of coefficient `j`, or `None` if there is no such coefficient.
    #[must_use]
    pub fn coefficient_standard_error(&self, j: usize) -> Option<T> {
        let cell = self.covariance.get((j, j))?;
        Some(cell.sqrt())
    }

    /// Standard errors of all coefficients.
    #[must_use]
    pub fn coefficient_standard_errors(&self) -> Vec<T> {
        (0..self.covariance.ncols())
            .filter_map(|j| self.coefficient_standard_error(j))
            .collect()
    }
}

/// A least-squares fit of `y` on a basis expansion of `x`.
///
/// # How it works
/// - Expands the `x` values of the dataset into a [`FeatureMatrix`] with shape `[n, k]`.
/// - Solves `Xβ ≈ y` with [`solve_least_squares`].
/// - Keeps the basis, so the exact same expansion (degree, knots, boundary) is applied to any
///   new inputs passed to [`LinearFit::predict_x`].
///
/// A fit is never modified after it is created.
///
/// # Type parameters
/// - `B`: The basis type, implementing [`Basis<T>`].
/// - `T`: Numeric type (default `f64`) implementing [`Value`].
///
/// # Example
/// ```
/// # use wagefit::PolynomialFit;
/// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0), (3.0, 13.0)];
/// let fit = PolynomialFit::new_polynomial(data, 2).unwrap();
/// println!("{}", fit.equation());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit<'data, B, T: Value = f64>
where
    B: Basis<T> + EquationDisplay<T>,
{
    data: Cow<'data, [(T, T)]>,
    x_range: RangeInclusive<T>,
    basis: B,
    design: FeatureMatrix<T>,
    coefficients: Vec<T>,
}
impl<'data, B, T: Value> LinearFit<'data, B, T>
where
    B: Basis<T> + EquationDisplay<T>,
{
    /// Fits `data` on the given basis.
    ///
    /// # Errors
    /// - [`Error::NoData`] if `data` is empty.
    /// - [`Error::DataRange`] if an `x` value is outside the basis domain.
    /// - Any error from [`solve_least_squares`].
    pub fn new(data: impl Into<Cow<'data, [(T, T)]>>, basis: B) -> Result<Self> {
        let data: Cow<'data, [(T, T)]> = data.into();
        let x_range = data.x_range().ok_or(Error::NoData)?;

        let design = FeatureMatrix::expand(&basis, &data.x())?;
        let coefficients = solve_least_squares(&design, &data.y())?;
        log::debug!(
            "Fitted {}x{} design, coefficients {coefficients:?}",
            design.nrows(),
            design.ncols()
        );

        Ok(Self {
            data,
            x_range,
            basis,
            design,
            coefficients,
        })
    }

    /// Returns an owned version of this fit, with a full copy of the data.
    #[must_use]
    pub fn to_owned(&self) -> LinearFit<'static, B, T> {
        LinearFit {
            data: Cow::Owned(self.data.to_vec()),
            x_range: self.x_range.clone(),
            basis: self.basis.clone(),
            design: self.design.clone(),
            coefficients: self.coefficients.clone(),
        }
    }

    /// Predicts `ŷ = Xβ` for a feature matrix built with this fit's basis.
    ///
    /// # Errors
    /// Returns [`Error::ColumnMismatch`] if the matrix does not have `k` columns.
    pub fn predict(&self, features: &FeatureMatrix<T>) -> Result<Vec<T>> {
        let k = self.coefficients.len();
        if features.ncols() != k {
            return Err(Error::ColumnMismatch {
                expected: k,
                actual: features.ncols(),
            });
        }

        let beta = DVector::from_column_slice(&self.coefficients);
        let y_hat = features.as_matrix() * beta;
        Ok(y_hat.data.into())
    }

    /// Expands `xs` with the stored basis, then predicts.
    ///
    /// # Errors
    /// Returns [`Error::DataRange`] if a value is outside the basis domain.
    pub fn predict_x(&self, xs: &[T]) -> Result<Vec<T>> {
        let features = FeatureMatrix::expand(&self.basis, xs)?;
        self.predict(&features)
    }

    /// Predictions for the training rows, in data order.
    #[must_use]
    pub fn fitted_values(&self) -> Vec<T> {
        let beta = DVector::from_column_slice(&self.coefficients);
        let y_hat = self.design.as_matrix() * beta;
        y_hat.data.into()
    }

    /// `(x, ŷ)` pairs over `n` evenly spaced points spanning the training `x` range.
    ///
    /// The first and last `x` are exactly the minimum and maximum of the training data.
    ///
    /// # Errors
    /// Returns an error if the basis cannot be evaluated on the grid.
    pub fn prediction_grid(&self, n: usize) -> Result<Vec<(T, T)>> {
        let xs = linspace_range(&self.x_range, n);
        let ys = self.predict_x(&xs)?;
        Ok(xs.into_iter().zip(ys).collect())
    }

    /// Returns `(x, y - ŷ)` for each training point.
    #[must_use]
    pub fn residuals(&self) -> Vec<(T, T)> {
        self.data
            .iter()
            .zip(self.fitted_values())
            .map(|(&(x, y), y_fit)| (x, y - y_fit))
            .collect()
    }

    /// Unbiased estimate of the error variance, `SSR / (n - k)`.
    ///
    /// See [`statistics::residual_variance`].
    pub fn residual_variance(&self) -> T {
        statistics::residual_variance(self.data.y_iter(), self.fitted_values().into_iter(), self.k())
    }

    /// See [`statistics::mean_squared_error`].
    pub fn mean_squared_error(&self) -> T {
        statistics::mean_squared_error(self.data.y_iter(), self.fitted_values().into_iter())
    }

    /// In-sample root mean squared error.
    ///
    /// See [`statistics::root_mean_squared_error`].
    pub fn root_mean_squared_error(&self) -> T {
        self.mean_squared_error().sqrt()
    }

    /// See [`statistics::mean_absolute_error`].
    pub fn mean_absolute_error(&self) -> T {
        statistics::mean_absolute_error(self.data.y_iter(), self.fitted_values().into_iter())
    }

    /// Proportion of the variance of `y` explained by the fit.
    ///
    /// See [`statistics::r_squared`].
    pub fn r_squared(&self) -> T {
        statistics::r_squared(self.data.y_iter(), self.fitted_values().into_iter())
    }

    /// See [`statistics::adjusted_r_squared`].
    pub fn adjusted_r_squared(&self) -> T {
        statistics::adjusted_r_squared(self.data.y_iter(), self.fitted_values().into_iter(), self.k())
    }

    /// See [`statistics::gaussian_log_likelihood`].
    pub fn log_likelihood(&self) -> T {
        statistics::gaussian_log_likelihood(self.data.y_iter(), self.fitted_values().into_iter())
    }

    /// Scores the fit with an information criterion such as [`Aic`] or [`Bic`].
    pub fn model_score(&self, method: &impl ModelScoreProvider) -> T {
        method.score(self.data.y_iter(), self.fitted_values().into_iter(), self.k())
    }

    /// Covariance of the fitted coefficients.
    ///
    /// # Errors
    /// Returns an error if the covariance matrix cannot be computed.
    pub fn covariance(&self) -> Result<FitCovariance<T>> {
        FitCovariance::new(self)
    }

    /// Number of parameters as a `T`.
    fn k(&self) -> T {
        T::from_positive_int(self.coefficients.len())
    }

    /// Training design shape `(n, k)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.design.nrows(), self.design.ncols())
    }

    /// The basis used by this fit.
    #[must_use]
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// The fitted coefficients, one per feature column.
    #[must_use]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// The training data.
    #[must_use]
    pub fn data(&self) -> &[(T, T)] {
        &self.data
    }

    /// The training feature matrix.
    #[must_use]
    pub fn design(&self) -> &FeatureMatrix<T> {
        &self.design
    }

    /// The range of `x` in the training data.
    #[must_use]
    pub fn x_range(&self) -> RangeInclusive<T> {
        self.x_range.clone()
    }

    /// Returns the fitted equation as a string, e.g. `y(x) = 2.00x² + 3.00`.
    #[expect(clippy::missing_panics_doc, reason = "Infallible operation")]
    #[must_use]
    pub fn equation(&self) -> String {
        let mut output = String::new();
        self.basis
            .format_equation(&mut output, &self.coefficients)
            .expect("String should be infallible");
        output
    }

    /// Returns a regression summary of the fit.
    ///
    /// Standard errors and t statistics are `None` if the covariance could not be computed.
    pub fn summary(&self) -> FitSummary<T> {
        let (n, k) = self.shape();

        let standard_errors = self
            .covariance()
            .map(|cov| cov.coefficient_standard_errors())
            .ok();
        let t_values = standard_errors.as_ref().map(|errors| {
            self.coefficients
                .iter()
                .zip(errors)
                .map(|(&coef, &se)| coef / se)
                .collect()
        });

        FitSummary {
            columns: self.basis.column_names(),
            coefficients: self.coefficients.clone(),
            standard_errors,
            t_values,
            observations: n,
            parameters: k,
            df_residual: n.saturating_sub(k),
            r_squared: self.r_squared(),
            adjusted_r_squared: self.adjusted_r_squared(),
            rmse: self.root_mean_squared_error(),
            log_likelihood: self.log_likelihood(),
            aic: self.model_score(&Aic),
            bic: self.model_score(&Bic),
        }
    }
}

impl<'data, T: Value> LinearFit<'data, MonomialBasis<T>, T> {
    /// Fits a polynomial of the given degree.
    ///
    /// # Errors
    /// - [`Error::InvalidDegree`] if `degree` is 0.
    /// - See [`LinearFit::new`].
    pub fn new_polynomial(data: impl Into<Cow<'data, [(T, T)]>>, degree: usize) -> Result<Self> {
        Self::new(data, MonomialBasis::new(degree)?)
    }
}

impl<'data, T: Value> LinearFit<'data, BSplineBasis<T>, T> {
    /// Fits a cubic regression spline with the given interior knots.
    ///
    /// The boundary knots are the minimum and maximum `x` of `data`.
    ///
    /// # Errors
    /// - [`Error::NoData`] if `data` is empty.
    /// - [`Error::InvalidKnots`] if the knots do not lie strictly inside the data range.
    /// - See [`LinearFit::new`].
    pub fn new_spline(data: impl Into<Cow<'data, [(T, T)]>>, knots: &[T]) -> Result<Self> {
        let data: Cow<'data, [(T, T)]> = data.into();
        let x_range = data.x_range().ok_or(Error::NoData)?;
        let basis = BSplineBasis::cubic(knots, x_range)?;
        Self::new(data, basis)
    }
}

impl<B, T: Value> std::fmt::Display for LinearFit<'_, B, T>
where
    B: Basis<T> + EquationDisplay<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.equation())
    }
}

/// Regression summary of a [`LinearFit`].
///
/// Can be serialized to JSON or other formats.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct FitSummary<T: Value = f64> {
    /// Feature column names, intercept first.
    pub columns: Vec<String>,

    /// The fitted coefficients.
    pub coefficients: Vec<T>,

    /// Standard errors of the coefficients, if the covariance could be computed.
    pub standard_errors: Option<Vec<T>>,

    /// `coefficient / standard error` for each column.
    pub t_values: Option<Vec<T>>,

    /// Number of observations.
    pub observations: usize,

    /// Number of parameters, intercept included.
    pub parameters: usize,

    /// Residual degrees of freedom, `n - k`.
    pub df_residual: usize,

    /// R² of the fit.
    pub r_squared: T,

    /// Adjusted R² of the fit.
    pub adjusted_r_squared: T,

    /// In-sample root mean squared error.
    pub rmse: T,

    /// Gaussian log-likelihood.
    pub log_likelihood: T,

    /// Akaike information criterion.
    pub aic: T,

    /// Bayesian information criterion.
    pub bic: T,
}
impl<T: Value> std::fmt::Display for FitSummary<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num = |v: T| display::format_number(v, 4);

        writeln!(
            f,
            "Observations: {:<10} Parameters: {:<10} Df residuals: {}",
            self.observations, self.parameters, self.df_residual
        )?;
        writeln!(
            f,
            "R²: {:<20} Adj. R²: {:<15} RMSE: {}",
            num(self.r_squared),
            num(self.adjusted_r_squared),
            num(self.rmse)
        )?;
        writeln!(
            f,
            "Log-likelihood: {:<12} AIC: {:<15} BIC: {}",
            num(self.log_likelihood),
            num(self.aic),
            num(self.bic)
        )?;
        writeln!(f)?;

        writeln!(f, "{:<8} {:>14} {:>14} {:>10}", "", "coef", "std err", "t")?;
        for (j, (name, &coef)) in self.columns.iter().zip(&self.coefficients).enumerate() {
            let se = self.standard_errors.as_ref().and_then(|v| v.get(j).copied());
            let t = self.t_values.as_ref().and_then(|v| v.get(j).copied());
            writeln!(
                f,
                "{:<8} {:>14} {:>14} {:>10}",
                name,
                num(coef),
                se.map_or_else(|| "-".to_string(), num),
                t.map_or_else(|| "-".to_string(), |t| display::format_number(t, 2)),
            )?;
        }

        Ok(())
    }
}
