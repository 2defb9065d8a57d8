//! Information criteria for comparing fitted models.
//!
//! These balance fit quality against model complexity. They are not measures of fit quality
//! themselves; for that, use RMSE or R².
//!
//! # Overview of Available Scoring Methods
//! - **Akaike Information Criterion (AIC)**: A lenient penalty for complexity. Tends to favor slightly more complex models if they fit better.
//! - **Bayesian Information Criterion (BIC)**: Penalizes complexity by `ln(n)` per parameter, so it prefers simpler models on large samples.
//!
//! Both use the Gaussian log-likelihood of a least-squares fit; see
//! [`crate::statistics::gaussian_log_likelihood`].
//!
//! The [`ModelScoreProvider`] trait defines the interface for implementing custom scoring methods.
use crate::{statistics, value::Value};

/// Trait for implementing information criteria.
pub trait ModelScoreProvider {
    /// Short name shown in fit summaries.
    fn name(&self) -> &'static str;

    /// Calculate the model's score using this scoring method.
    ///
    /// # Notes
    /// - Lower scores indicate a better trade-off between fit and complexity.
    /// - Returns `NaN` for empty input.
    ///
    /// # Parameters
    /// - `y`: Iterator over the observed (actual) values.
    /// - `y_fit`: Iterator over the predicted values from the model.
    /// - `k`: Number of model parameters, intercept included.
    ///
    /// # Example
    /// ```
    /// # use wagefit::score::{Aic, ModelScoreProvider};
    /// # let y = vec![1.0, 2.0, 3.0];
    /// # let y_fit = vec![1.1, 1.9, 3.05];
    /// let score = Aic.score(y.into_iter(), y_fit.into_iter(), 2.0);
    /// ```
    fn score<T: Value>(
        &self,
        y: impl Iterator<Item = T>,
        y_fit: impl Iterator<Item = T>,
        k: T,
    ) -> T;
}

/// Bayesian Information Criterion.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// BIC = -2ℓ + k · ln(n)
/// where
///   ℓ = Gaussian log-likelihood of the fit
///   n = number of observations, k = number of model parameters
/// ```
/// </div>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bic;
impl ModelScoreProvider for Bic {
    fn name(&self) -> &'static str {
        "BIC"
    }

    fn score<T: Value>(
        &self,
        y: impl Iterator<Item = T>,
        y_fit: impl Iterator<Item = T>,
        k: T,
    ) -> T {
        let (log_likelihood, n) = log_likelihood_with_n(y, y_fit);
        if n == T::zero() {
            return T::nan();
        }

        -T::two() * log_likelihood + k * n.ln()
    }
}

/// Akaike Information Criterion.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// AIC = -2ℓ + 2k
/// where
///   ℓ = Gaussian log-likelihood of the fit
///   k = number of model parameters
/// ```
/// </div>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aic;
impl ModelScoreProvider for Aic {
    fn name(&self) -> &'static str {
        "AIC"
    }

    fn score<T: Value>(
        &self,
        y: impl Iterator<Item = T>,
        y_fit: impl Iterator<Item = T>,
        k: T,
    ) -> T {
        let (log_likelihood, n) = log_likelihood_with_n(y, y_fit);
        if n == T::zero() {
            return T::nan();
        }

        -T::two() * log_likelihood + T::two() * k
    }
}

fn log_likelihood_with_n<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> (T, T) {
    let y: Vec<T> = y.collect();
    let n = T::from_positive_int(y.len());
    (statistics::gaussian_log_likelihood(y.into_iter(), y_fit), n)
}
