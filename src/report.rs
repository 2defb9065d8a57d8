//! The model comparison table.
//!
//! An [`RmseSummary`] is the ordered list of `(model, RMSE)` pairs produced by a run. It
//! prints as a two-column table and can be written as CSV.
use std::{fmt, io::Write};

use crate::{
    display,
    error::{Error, Result},
};

/// In-sample RMSE of one model variant.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RmseRecord {
    /// Model label, e.g. `Polynomial(degree=2)`.
    pub model: String,

    /// Root mean squared error on the filtered data.
    pub rmse: f64,
}
impl RmseRecord {
    /// Creates a record.
    pub fn new(model: impl Into<String>, rmse: f64) -> Self {
        Self {
            model: model.into(),
            rmse,
        }
    }
}

/// Ordered RMSE records, one per model variant.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RmseSummary {
    records: Vec<RmseRecord>,
}
impl RmseSummary {
    /// Appends a record.
    pub fn push(&mut self, record: RmseRecord) {
        self.records.push(record);
    }

    /// The records, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[RmseRecord] {
        &self.records
    }

    /// The record with the lowest RMSE; the first one on ties.
    #[must_use]
    pub fn best(&self) -> Option<&RmseRecord> {
        self.records
            .iter()
            .reduce(|best, r| if r.rmse < best.rmse { r } else { best })
    }

    /// Writes the records as CSV with a `model,rmse` header.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for record in &self.records {
            csv.serialize(record).map_err(csv_error)?;
        }
        csv.flush()?;
        Ok(())
    }
}
impl FromIterator<RmseRecord> for RmseSummary {
    fn from_iter<I: IntoIterator<Item = RmseRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
impl fmt::Display for RmseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .records
            .iter()
            .map(|r| r.model.chars().count())
            .max()
            .unwrap_or(0)
            .max("Model".len());

        writeln!(f, "{:<width$}  {:>12}", "Model", "RMSE")?;
        writeln!(f, "{}  {}", "-".repeat(width), "-".repeat(12))?;
        for r in &self.records {
            writeln!(f, "{:<width$}  {:>12}", r.model, display::format_number(r.rmse, 4))?;
        }
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> Error {
    match e.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        other => Error::Io(std::io::Error::other(format!("{other:?}"))),
    }
}
