//! # Wagefit
//! ## Wage against experience, five ways
//!
//! This crate fits weekly wage as a function of years of labor-market experience with ordinary
//! least squares, and compares the fits by in-sample root mean squared error:
//! - A straight line
//! - Polynomials of degree 2 and 4
//! - Cubic B-splines with two different sets of interior knots
//!
//! Every model is linear in its coefficients. What changes between them is the [`basis::Basis`]
//! used to expand the experience column into a [`design::FeatureMatrix`]; the solver,
//! predictor and scoring are shared.
//!
//! The simplest use-case is to fit one model to a set of points:
//! ```rust
//! # use wagefit::PolynomialFit;
//! let data = [(0.0, 5.0), (1.0, 5.5), (2.0, 5.0), (3.0, 3.5), (4.0, 1.0)];
//!
//! let fit = PolynomialFit::new_polynomial(&data[..], 2).unwrap();
//! assert!(fit.root_mean_squared_error() < 1e-9);
//! println!("{fit}"); // y(x) = -0.50x² + x + 5.00
//! ```
//!
//! Or to run the whole comparison on a dataset:
//! ```rust
//! # use wagefit::{data::{Dataset, WageRecord}, pipeline::{self, AnalysisConfig}};
//! let data: Dataset = (0..60)
//!     .map(|i| WageRecord::new(f64::from(i) - 2.0, 300.0 + 25.0 * f64::from(i % 17)))
//!     .collect();
//!
//! let analysis = pipeline::run(data, &AnalysisConfig::default()).unwrap();
//! println!("{}", analysis.rmse_summary());
//! ```
//!
//! # Core Concepts
//! - A [`data::Dataset`] is an ordered table of `(experience, wage)` rows, loaded from CSV or JSON.
//!     - [`data::Dataset::filter_outliers`] drops rows above a wage threshold.
//! - A [`basis::Basis`] turns an experience value into one row of the design matrix.
//!     - [`basis::MonomialBasis`] gives `1, x, x², ...`
//!     - [`basis::BSplineBasis`] gives `1` followed by a clamped B-spline function set. Its knots
//!       and boundary are stored, so new inputs are expanded exactly as the training data was.
//! - A [`LinearFit`] holds the coefficients from [`solve_least_squares`] along with the basis
//!   and the data it was fit on.
//! - [`pipeline::run`] filters the data, fits each [`pipeline::ModelSpec`] and collects
//!   the RMSE of each into a [`report::RmseSummary`].
//!
//! # Features
//! - `plotting`: PNG figures of the data and every fitted curve, see `plotting`
//! - `parallel`: fit the model variants concurrently with `rayon`
//!
//! # Testing utilities
//!
//! [`assert_close!`] and [`assert_all_close!`] compare floating point values with a
//! relative tolerance. See [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plotting;

pub mod basis;
pub mod data;
pub mod design;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod statistics;
pub mod value;

mod fit;

pub use fit::*;

pub use nalgebra;
