//! Functions for evaluating regression fits and describing data
//!
//! This module provides the error metrics used to compare model variants, the goodness-of-fit
//! measures reported in fit summaries, and the descriptive statistics used to explore a dataset.
//!
//! # Error Metrics
//! - [`root_mean_squared_error`]: Square root of MSE, in the same units as the observations. Lower is better.
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values.
//! - [`mean_absolute_error`]: Average absolute difference between observed and predicted values.
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//! - [`adjusted_r_squared`]: R² adjusted for the number of parameters. Use to compare models of different size.
//! - [`residual_variance`]: Unbiased estimate of the error variance after fitting. Used for standard errors.
//! - [`gaussian_log_likelihood`]: Log-likelihood of the fit under normally distributed errors. Used by AIC and BIC.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean.
//! - [`sample_stddev`]: Sample standard deviation (divides by `n - 1`).
//! - [`quantile`]: Linearly interpolated quantile of sorted data.
//!
//! # Examples
//!
//! ```rust
//! use wagefit::statistics::{r_squared, root_mean_squared_error};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let rmse = root_mean_squared_error(&y, &y_fit).unwrap();
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! println!("RMSE = {rmse}, R² = {r2}");
//! ```
use crate::{
    error::{Error, Result},
    value::Value,
};

/// Computes the residual variance of a model's predictions.
///
/// Residual variance is the unbiased estimate of the variance of the
/// errors (σ²) after fitting a model. It's used for the covariance estimates
/// of the fitted parameters.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// σ² = Σ (y_i - y_fit_i)² / (n - k)
/// where
///   y_i = observed values, y_fit_i = predicted values,
///   n = number of observations, k = number of model parameters
/// ```
/// </div>
///
/// Returns zero when there are no residual degrees of freedom (`n <= k`).
///
/// # Example
/// ```rust
/// # use wagefit::statistics::residual_variance;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![0.9, 2.1, 2.95];
/// let variance = residual_variance(y.into_iter(), y_fit.into_iter(), 2.0);
/// ```
pub fn residual_variance<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
    k: T,
) -> T {
    let (ssr, n) = ssr_with_n(y, y_fit);
    if n <= k {
        return T::zero();
    }
    ssr / (n - k)
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared is a number between 0 and 1 that tells you how well the model explains the data:
/// - `0` means the model explains none of the variation.
/// - `1` means the model explains all the variation.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
/// </div>
///
/// # Example
/// ```rust
/// # use wagefit::statistics::r_squared;
/// let y = vec![1.0, 2.0, 3.0];
/// let r2 = r_squared(y.iter().copied(), y.iter().copied());
/// assert_eq!(r2, 1.0);
/// ```
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let (r2, _) = r_squared_with_n(y, y_fit);
    r2
}

/// R² penalized for the number of model parameters.
///
/// ```math
/// R²_adj = 1 - (1 - R²) (n - 1) / (n - k)
/// ```
///
/// `k` counts every parameter, intercept included. Returns `NaN` when `n <= k`.
pub fn adjusted_r_squared<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
    k: T,
) -> T {
    let (r2, n) = r_squared_with_n(y, y_fit);
    if n <= k {
        return T::nan();
    }
    T::one() - (T::one() - r2) * (n - T::one()) / (n - k)
}

/// (R², n)
fn r_squared_with_n<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> (T, T) {
    let y: Vec<T> = y.collect();
    let y_fit: Vec<T> = y_fit.collect();
    let y_mean = mean(y.iter().copied());

    let mut ss_total = T::zero();
    let mut ss_residual = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.into_iter().zip(y_fit) {
        ss_total += Value::powi(y - y_mean, 2);
        ss_residual += Value::powi(y - y_fit, 2);
        n += T::one();
    }

    (T::one() - (ss_residual / ss_total), n)
}

/// Computes the root mean squared error between observed and predicted values.
///
/// ```math
/// RMSE = sqrt( Σ (y_i - y_fit_i)² / n )
/// ```
///
/// This is the score used to compare model variants. Lower is better, and it is
/// expressed in the same units as `y`.
///
/// # Errors
/// - [`Error::LengthMismatch`] if the slices differ in length.
/// - [`Error::NoData`] if they are empty.
///
/// # Example
/// ```rust
/// # use wagefit::statistics::root_mean_squared_error;
/// let rmse = root_mean_squared_error(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(rmse, 1.0);
/// ```
pub fn root_mean_squared_error<T: Value>(y: &[T], y_fit: &[T]) -> Result<T> {
    if y.len() != y_fit.len() {
        return Err(Error::LengthMismatch {
            expected: y.len(),
            actual: y_fit.len(),
        });
    }
    if y.is_empty() {
        return Err(Error::NoData);
    }

    let mse = mean_squared_error(y.iter().copied(), y_fit.iter().copied());
    Ok(mse.sqrt())
}

/// Average squared difference between observed and predicted values.
///
/// ```math
/// MSE = Σ (y_i - y_fit_i)² / n
/// ```
///
/// Returns `NaN` for empty input.
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let (ssr, n) = ssr_with_n(y, y_fit);
    ssr / n
}

/// Average absolute difference between observed and predicted values.
///
/// Less sensitive to large individual errors than [`mean_squared_error`].
/// Returns `NaN` for empty input.
pub fn mean_absolute_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let mut total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        total += Value::abs(y - y_fit);
        n += T::one();
    }
    total / n
}

/// Log-likelihood of a least-squares fit, assuming independent normal errors.
///
/// Uses the maximum-likelihood error variance `SSR / n`:
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// ℓ = -n/2 · ( ln(2π) + ln(SSR / n) + 1 )
/// where
///   SSR = Σ (y_i - y_fit_i)², n = number of observations
/// ```
/// </div>
///
/// A perfect fit (`SSR = 0`) gives `+∞`.
pub fn gaussian_log_likelihood<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    let (ssr, n) = ssr_with_n(y, y_fit);
    let two_pi = T::two_pi();
    -n / T::two() * (two_pi.ln() + (ssr / n).ln() + T::one())
}

/// (Σ (y - y_fit)², n)
fn ssr_with_n<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> (T, T) {
    let mut total = T::zero();
    let mut n = T::zero();
    for (y, y_fit) in y.zip(y_fit) {
        total += Value::powi(y - y_fit, 2);
        n += T::one();
    }
    (total, n)
}

/// Computes the arithmetic mean of a sequence of values.
///
/// Returns `NaN` if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let m = wagefit::statistics::mean(vec![1.0, 2.0, 3.0].into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = T::zero();
    for value in data {
        sum += value;
        count += T::one();
    }
    sum / count
}

/// Computes the sample standard deviation of a sequence of values.
/// - Uses the `n - 1` denominator, as summary tables of a sample conventionally do.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// s = sqrt( Σ (x_i - Mean)² / (n - 1) )
/// ```
/// </div>
///
/// Returns `NaN` for fewer than two values.
///
/// # Examples
/// ```rust
/// let s = wagefit::statistics::sample_stddev::<f64>(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter());
/// assert!((s - 2.138089935299395).abs() < 1e-12);
/// ```
pub fn sample_stddev<T: Value>(data: impl Iterator<Item = T>) -> T {
    let data: Vec<_> = data.collect();
    if data.len() < 2 {
        return T::nan();
    }

    let mean = mean(data.iter().copied());
    let mut sum_sq_diff = T::zero();
    let mut count = T::zero();
    for value in data {
        sum_sq_diff += Value::powi(value - mean, 2);
        count += T::one();
    }

    (sum_sq_diff / (count - T::one())).sqrt()
}

/// Linearly interpolated quantile of **sorted** data.
///
/// For `q` in `[0, 1]`, the position `q · (n - 1)` is located between two ranks and the
/// result is interpolated between them. `q = 0.5` is the median.
///
/// Returns `None` if `sorted` is empty or `q` is outside `[0, 1]`.
///
/// # Examples
/// ```rust
/// # use wagefit::statistics::quantile;
/// let data = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&data, 0.5), Some(2.5));
/// assert_eq!(quantile(&data, 0.25), Some(1.75));
/// ```
pub fn quantile<T: Value>(sorted: &[T], q: T) -> Option<T> {
    if sorted.is_empty() || q < T::zero() || q > T::one() {
        return None;
    }

    let position = q * T::from_positive_int(sorted.len() - 1);
    let lower = num_traits::ToPrimitive::to_usize(&num_traits::float::FloatCore::floor(position))?;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - T::from_positive_int(lower);

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    #[test]
    fn rmse_of_identical_vectors_is_zero() {
        let y = [3.0, -1.0, 12.5, 7.0];
        assert_eq!(root_mean_squared_error(&y, &y).unwrap(), 0.0);
    }

    #[test]
    fn rmse_known_value() {
        // Residuals 1, -1, 2, 0: MSE = 6 / 4
        let y = [1.0, 2.0, 3.0, 4.0];
        let y_fit = [0.0, 3.0, 1.0, 4.0];
        assert_close!(root_mean_squared_error(&y, &y_fit).unwrap(), 1.5_f64.sqrt());
    }

    #[test]
    fn rmse_rejects_bad_lengths() {
        assert!(matches!(
            root_mean_squared_error(&[1.0, 2.0], &[1.0]),
            Err(Error::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            root_mean_squared_error::<f64>(&[], &[]),
            Err(Error::NoData)
        ));
    }

    #[test]
    fn goodness_of_fit() {
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y_fit = [1.1, 1.9, 3.2, 3.8, 5.0];

        // SS_res = 0.1, SS_tot = 10
        let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
        assert_close!(r2, 0.99);

        let adj = adjusted_r_squared(y.iter().copied(), y_fit.iter().copied(), 2.0);
        assert_close!(adj, 1.0 - 0.01 * 4.0 / 3.0);

        let var = residual_variance(y.iter().copied(), y_fit.iter().copied(), 2.0);
        assert_close!(var, 0.1 / 3.0);

        assert_close!(
            mean_absolute_error(y.iter().copied(), y_fit.iter().copied()),
            0.6 / 5.0
        );
        assert_close!(
            mean_squared_error(y.iter().copied(), y_fit.iter().copied()),
            0.1 / 5.0
        );
    }

    #[test]
    fn log_likelihood_matches_closed_form() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let y_fit = [1.5, 1.5, 3.5, 3.5];

        // SSR = 1, n = 4
        let expected = -2.0 * ((2.0 * std::f64::consts::PI).ln() + 0.25_f64.ln() + 1.0);
        assert_close!(
            gaussian_log_likelihood(y.iter().copied(), y_fit.iter().copied()),
            expected
        );
    }

    #[test]
    fn descriptive() {
        let data = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_close!(mean(data.iter().copied()), 3.0);
        assert_close!(sample_stddev(data.iter().copied()), 2.5_f64.sqrt());
        assert!(sample_stddev::<f64>([1.0].into_iter()).is_nan());

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 0.25), Some(2.0));
        assert_eq!(quantile(&sorted, 1.0), Some(5.0));
        assert_eq!(quantile(&sorted, 1.5), None);
        assert_eq!(quantile::<f64>(&[], 0.5), None);
    }
}
