//! Error types for loading, expanding, fitting and scoring
//!
//! This module defines the failure modes of the analysis pipeline, along with a
//! convenient `Result` alias. Every error is fatal to a run.

/// Errors that can occur during the regression analysis.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot fit or score because there is no data.
    #[error("No data available")]
    NoData,

    /// The input table is malformed or is missing a required column.
    #[error("Malformed dataset{}: {reason}", .row.map(|r| format!(" (row {r})")).unwrap_or_default())]
    DatasetFormat {
        /// 1-based data row that failed, if the failure is row-specific
        row: Option<usize>,
        /// What went wrong
        reason: String,
    },

    /// The spline knot sequence is empty, degenerate, or outside the data range.
    #[error("Invalid knot sequence: {0}")]
    InvalidKnots(String),

    /// A polynomial expansion needs at least degree 1.
    #[error("Polynomial degree `{0}` is not supported; use 1 or higher")]
    InvalidDegree(usize),

    /// Cannot compute the least-squares solution because the design matrix is rank-deficient
    ///
    /// Usually there are more features than rows, or two features are collinear.
    #[error(
        "Design matrix is rank-deficient; the data may be insufficient or collinear. [n: {n}, k: {k}]"
    )]
    SingularMatrix {
        /// Number of rows
        n: usize,
        /// Number of feature columns
        k: usize,
    },

    /// Observed and predicted vectors differ in length.
    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Length of the observed vector
        expected: usize,
        /// Length of the predicted vector
        actual: usize,
    },

    /// A feature matrix does not have the column layout the model was trained on.
    #[error("Feature matrix has {actual} columns but the model was fitted on {expected}")]
    ColumnMismatch {
        /// Columns at fit time
        expected: usize,
        /// Columns supplied
        actual: usize,
    },

    /// The input x-values are outside the range a basis is defined on.
    #[error("This basis is only defined within the x-value range {0}..={1}")]
    DataRange(String, String),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// Failed to solve the algebraic system during fitting.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A model variant failed; wraps the underlying cause.
    #[error("Model `{label}` failed: {source}")]
    Variant {
        /// Label of the failing model variant
        label: String,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// Reading the input or writing a report failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON dataset or configuration could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Rendering a figure failed.
    #[error("Failed to render plot: {0}")]
    Plot(String),
}

impl Error {
    /// Wraps this error with the label of the model variant that produced it.
    #[must_use]
    pub fn in_variant(self, label: impl Into<String>) -> Self {
        Self::Variant {
            label: label.into(),
            source: Box::new(self),
        }
    }
}

/// Result type for the analysis
pub type Result<T> = std::result::Result<T, Error>;
