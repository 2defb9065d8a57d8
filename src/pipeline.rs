//! The end-to-end analysis: filter, then fit and score every model variant.
//!
//! ```text
//! Dataset ─► filter_outliers ─► for each ModelSpec:
//!                                 basis ─► LinearFit ─► fitted values ─► RMSE
//!                                                   └─► prediction grid
//! ```
//!
//! Variants are independent of each other. With the `parallel` feature they are fitted
//! concurrently; results are always returned in configuration order.
use std::{fmt, ops::RangeInclusive, path::Path};

use crate::{
    basis::{BSplineBasis, FeatureBasis, MonomialBasis},
    data::Dataset,
    error::{Error, Result},
    fit::{FitSummary, ModelFit},
    report::{RmseRecord, RmseSummary},
    statistics,
};

/// One model variant to fit.
///
/// Serialized with a `kind` tag:
/// ```json
/// [{ "kind": "linear" }, { "kind": "polynomial", "degree": 2 }, { "kind": "spline", "knots": [8, 15, 27] }]
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Intercept and slope
    Linear,

    /// Intercept plus powers of experience up to `degree`
    Polynomial {
        /// Highest power
        degree: usize,
    },

    /// Intercept plus a cubic B-spline with these interior knots
    Spline {
        /// Interior knots, strictly inside the experience range
        knots: Vec<f64>,
    },
}
impl ModelSpec {
    /// The label used in reports, e.g. `Polynomial(degree=2)` or `Spline(knots=[8,15,27])`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Linear => "Simple Linear Regression".to_string(),
            Self::Polynomial { degree } => format!("Polynomial(degree={degree})"),
            Self::Spline { knots } => {
                let knots: Vec<String> = knots.iter().map(ToString::to_string).collect();
                format!("Spline(knots=[{}])", knots.join(","))
            }
        }
    }

    /// Builds the basis for this variant.
    ///
    /// `x_range` is the experience range of the training data; it becomes the boundary of a
    /// spline basis and is ignored otherwise.
    ///
    /// # Errors
    /// - [`Error::InvalidDegree`] for a polynomial of degree 0.
    /// - [`Error::InvalidKnots`] for knots that do not fit inside `x_range`.
    pub fn basis(&self, x_range: RangeInclusive<f64>) -> Result<FeatureBasis> {
        Ok(match self {
            Self::Linear => MonomialBasis::linear().into(),
            Self::Polynomial { degree } => MonomialBasis::new(*degree)?.into(),
            Self::Spline { knots } => BSplineBasis::cubic(knots, x_range)?.into(),
        })
    }
}
impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parameters of an analysis run.
///
/// The defaults reproduce the standard comparison; every field can be overridden from JSON,
/// and missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rows with a wage above this are dropped before fitting.
    pub outlier_threshold: f64,

    /// Number of points in each prediction grid.
    pub grid_size: usize,

    /// Model variants, in report order.
    pub variants: Vec<ModelSpec>,
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 4000.0,
            grid_size: 100,
            variants: vec![
                ModelSpec::Linear,
                ModelSpec::Polynomial { degree: 2 },
                ModelSpec::Polynomial { degree: 4 },
                ModelSpec::Spline {
                    knots: vec![8.0, 15.0, 27.0],
                },
                ModelSpec::Spline {
                    knots: vec![15.0, 30.0, 45.0],
                },
            ],
        }
    }
}
impl AnalysisConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// The outcome of fitting one model variant.
#[derive(Debug, Clone)]
pub struct VariantReport {
    /// Report label.
    pub label: String,

    /// The variant that was fitted.
    pub spec: ModelSpec,

    /// The fitted model, with its basis.
    pub fit: ModelFit<'static>,

    /// In-sample RMSE on the filtered data.
    pub rmse: f64,

    /// `(experience, ŷ)` over an evenly spaced grid of the training experience range.
    pub grid: Vec<(f64, f64)>,
}
impl VariantReport {
    /// Regression summary of the fit.
    #[must_use]
    pub fn summary(&self) -> FitSummary {
        self.fit.summary()
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The dataset as loaded.
    pub raw: Dataset,

    /// The dataset after outlier filtering; all variants are fitted on it.
    pub filtered: Dataset,

    /// One report per variant, in configuration order.
    pub variants: Vec<VariantReport>,
}
impl Analysis {
    /// The `(label, RMSE)` table, in configuration order.
    #[must_use]
    pub fn rmse_summary(&self) -> RmseSummary {
        self.variants
            .iter()
            .map(|v| RmseRecord::new(v.label.clone(), v.rmse))
            .collect()
    }
}

/// Runs the full analysis.
///
/// # Errors
/// - [`Error::NoData`] if nothing is left after filtering.
/// - [`Error::Variant`] wrapping the first failure of a model variant. No partial results
///   are returned.
pub fn run(dataset: Dataset, config: &AnalysisConfig) -> Result<Analysis> {
    log::info!(
        "Filtering {} rows at wage <= {}",
        dataset.len(),
        config.outlier_threshold
    );
    let filtered = dataset.filter_outliers(config.outlier_threshold);
    let x_range = filtered.experience_range().ok_or(Error::NoData)?;
    let points = filtered.points();

    log::info!(
        "Fitting {} variants on {} rows, experience in [{}, {}]",
        config.variants.len(),
        points.len(),
        x_range.start(),
        x_range.end()
    );

    let variants = fit_all(&config.variants, &points, &x_range, config.grid_size)?;

    Ok(Analysis {
        raw: dataset,
        filtered,
        variants,
    })
}

#[cfg(not(feature = "parallel"))]
fn fit_all(
    specs: &[ModelSpec],
    points: &[(f64, f64)],
    x_range: &RangeInclusive<f64>,
    grid_size: usize,
) -> Result<Vec<VariantReport>> {
    specs
        .iter()
        .map(|spec| fit_variant(spec, points, x_range, grid_size))
        .collect()
}

#[cfg(feature = "parallel")]
fn fit_all(
    specs: &[ModelSpec],
    points: &[(f64, f64)],
    x_range: &RangeInclusive<f64>,
    grid_size: usize,
) -> Result<Vec<VariantReport>> {
    use rayon::prelude::*;

    // Indexed collect keeps configuration order
    let results: Vec<Result<VariantReport>> = specs
        .par_iter()
        .map(|spec| fit_variant(spec, points, x_range, grid_size))
        .collect();
    results.into_iter().collect()
}

/// Fits, predicts and scores one variant.
///
/// # Errors
/// Any failure is wrapped in [`Error::Variant`] with the variant label.
pub fn fit_variant(
    spec: &ModelSpec,
    points: &[(f64, f64)],
    x_range: &RangeInclusive<f64>,
    grid_size: usize,
) -> Result<VariantReport> {
    let label = spec.label();
    let report = try_fit_variant(spec, label.clone(), points, x_range, grid_size)
        .map_err(|e| e.in_variant(label))?;

    log::info!("{}: RMSE {:.4}", report.label, report.rmse);
    log::debug!("{}: {}", report.label, report.fit);
    Ok(report)
}

fn try_fit_variant(
    spec: &ModelSpec,
    label: String,
    points: &[(f64, f64)],
    x_range: &RangeInclusive<f64>,
    grid_size: usize,
) -> Result<VariantReport> {
    let basis = spec.basis(x_range.clone())?;
    let fit = ModelFit::new(points.to_vec(), basis)?;

    let observed: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    let rmse = statistics::root_mean_squared_error(&observed, &fit.fitted_values())?;
    let grid = fit.prediction_grid(grid_size)?;

    Ok(VariantReport {
        label,
        spec: spec.clone(),
        fit,
        rmse,
        grid,
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};
    use rand_distr::{Distribution, Normal, Uniform};

    use super::*;
    use crate::{assert_close, data::WageRecord};

    /// Wage-like data: concave in experience, heteroscedastic noise, a few large outliers.
    fn synthetic_wages(n: usize, seed: u64) -> Dataset {
        let mut rng = SmallRng::seed_from_u64(seed);
        let exper = Uniform::new_inclusive(-2.0, 59.0).unwrap();
        let noise = Normal::new(0.0, 1.0).unwrap();

        let mut records: Vec<WageRecord> = (0..n)
            .map(|_| {
                let x: f64 = exper.sample(&mut rng);
                let mean = 350.0 + 35.0 * x - 0.6 * x * x;
                let wage = (mean + noise.sample(&mut rng) * (80.0 + 4.0 * x.abs())).max(50.0);
                WageRecord::new(x, wage)
            })
            .collect();

        // Pin the range and add rows for the filter to drop
        records.push(WageRecord::new(-2.0, 300.0));
        records.push(WageRecord::new(59.0, 500.0));
        records.push(WageRecord::new(20.0, 7500.0));
        records.push(WageRecord::new(31.0, 4000.5));
        Dataset::from_records(records)
    }

    #[test]
    fn labels() {
        let labels: Vec<String> = AnalysisConfig::default()
            .variants
            .iter()
            .map(ModelSpec::label)
            .collect();
        assert_eq!(
            labels,
            [
                "Simple Linear Regression",
                "Polynomial(degree=2)",
                "Polynomial(degree=4)",
                "Spline(knots=[8,15,27])",
                "Spline(knots=[15,30,45])",
            ]
        );
        assert_eq!(
            ModelSpec::Spline { knots: vec![7.5] }.to_string(),
            "Spline(knots=[7.5])"
        );
    }

    #[test]
    fn config_json() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"variants": [{"kind": "polynomial", "degree": 3}, {"kind": "linear"}]}"#)
                .unwrap();
        assert_eq!(config.outlier_threshold, 4000.0);
        assert_eq!(config.grid_size, 100);
        assert_eq!(
            config.variants,
            vec![ModelSpec::Polynomial { degree: 3 }, ModelSpec::Linear]
        );

        let round: AnalysisConfig =
            serde_json::from_str(&serde_json::to_string(&AnalysisConfig::default()).unwrap()).unwrap();
        assert_eq!(round, AnalysisConfig::default());
    }

    #[test]
    fn default_run() {
        let data = synthetic_wages(400, 42);
        let analysis = run(data, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.raw.len(), 404);
        assert_eq!(analysis.filtered.len(), 402);
        assert!(analysis.filtered.records().iter().all(|r| r.wage <= 4000.0));

        let shapes: Vec<(usize, usize)> = analysis.variants.iter().map(|v| v.fit.shape()).collect();
        assert_eq!(shapes, [(402, 2), (402, 3), (402, 5), (402, 7), (402, 7)]);

        for v in &analysis.variants {
            assert!(v.rmse.is_finite() && v.rmse > 0.0);
            assert_close!(v.rmse, v.fit.root_mean_squared_error());

            assert_eq!(v.grid.len(), 100);
            assert_eq!(v.grid[0].0, -2.0);
            assert_eq!(v.grid[99].0, 59.0);
        }

        // Nested polynomial models
        let rmse: Vec<f64> = analysis.variants.iter().map(|v| v.rmse).collect();
        assert!(rmse[1] <= rmse[0] + 1e-9);
        assert!(rmse[2] <= rmse[1] + 1e-9);

        let summary = analysis.rmse_summary();
        assert_eq!(summary.records().len(), 5);
        assert_eq!(summary.records()[3].model, "Spline(knots=[8,15,27])");
    }

    #[test]
    fn failing_variant_names_itself() {
        let data = synthetic_wages(50, 1);
        let config = AnalysisConfig {
            variants: vec![
                ModelSpec::Linear,
                ModelSpec::Spline {
                    knots: vec![15.0, 80.0],
                },
            ],
            ..AnalysisConfig::default()
        };

        let err = run(data, &config).unwrap_err();
        match err {
            Error::Variant { label, source } => {
                assert_eq!(label, "Spline(knots=[15,80])");
                assert!(matches!(*source, Error::InvalidKnots(_)));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn too_few_rows_for_quartic() {
        let data: Dataset = [(1.0, 100.0), (2.0, 150.0), (3.0, 170.0)]
            .into_iter()
            .map(|(e, w)| WageRecord::new(e, w))
            .collect();
        let config = AnalysisConfig {
            variants: vec![ModelSpec::Polynomial { degree: 4 }],
            ..AnalysisConfig::default()
        };

        let err = run(data, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Variant { ref source, .. } if matches!(**source, Error::SingularMatrix { n: 3, k: 5 })
        ));
    }

    #[test]
    fn everything_filtered_out() {
        let data: Dataset = [(1.0, 5000.0)].into_iter().map(|(e, w)| WageRecord::new(e, w)).collect();
        assert!(matches!(
            run(data, &AnalysisConfig::default()),
            Err(Error::NoData)
        ));
    }
}
