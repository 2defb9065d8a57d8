use std::{fmt, ops::RangeInclusive};

use crate::{display, statistics, value::min_max};

/// One observation: years of experience and weekly wage.
///
/// Experience may be negative; census-derived data estimates it from age and education.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WageRecord {
    /// Years of labor-market experience (the predictor).
    pub experience: f64,

    /// Weekly wage (the response).
    pub wage: f64,
}
impl WageRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(experience: f64, wage: f64) -> Self {
        Self { experience, wage }
    }
}

/// An ordered, immutable table of [`WageRecord`]s.
///
/// Operations that change the rows, such as [`Dataset::filter_outliers`], return a new dataset
/// and leave this one untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<WageRecord>,
}
impl Dataset {
    /// Creates a dataset from records, keeping their order.
    #[must_use]
    pub fn from_records(records: Vec<WageRecord>) -> Self {
        Self { records }
    }

    /// The records, in order.
    #[must_use]
    pub fn records(&self) -> &[WageRecord] {
        &self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The experience column.
    #[must_use]
    pub fn experience(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.experience).collect()
    }

    /// The wage column.
    #[must_use]
    pub fn wages(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.wage).collect()
    }

    /// `(experience, wage)` pairs, the input format of the fitting functions.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.records.iter().map(|r| (r.experience, r.wage)).collect()
    }

    /// Smallest and largest experience, or `None` if the dataset is empty.
    #[must_use]
    pub fn experience_range(&self) -> Option<RangeInclusive<f64>> {
        min_max(self.records.iter().map(|r| r.experience))
    }

    /// Summary statistics of both columns.
    #[must_use]
    pub fn describe(&self) -> Description {
        Description {
            columns: vec![
                ColumnSummary::of("experience", &self.experience()),
                ColumnSummary::of("wage", &self.wages()),
            ],
        }
    }
}
impl FromIterator<WageRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = WageRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

/// Descriptive statistics of one column.
///
/// The standard deviation uses the `n - 1` denominator and quantiles are linearly interpolated.
/// All statistics are `NaN` for an empty column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub name: String,
    /// Number of values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Smallest value.
    pub min: f64,
    /// First quartile.
    pub q25: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q75: f64,
    /// Largest value.
    pub max: f64,
}
impl ColumnSummary {
    /// Summarizes a column of values.
    #[must_use]
    pub fn of(name: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q = |p: f64| statistics::quantile(&sorted, p).unwrap_or(f64::NAN);

        Self {
            name: name.to_string(),
            count: values.len(),
            mean: statistics::mean(values.iter().copied()),
            std: statistics::sample_stddev(values.iter().copied()),
            min: q(0.0),
            q25: q(0.25),
            median: q(0.5),
            q75: q(0.75),
            max: q(1.0),
        }
    }
}

/// Per-column summaries of a [`Dataset`], displayed as a table with one column per field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Description {
    /// One summary per dataset column.
    pub columns: Vec<ColumnSummary>,
}
impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6}", "")?;
        for c in &self.columns {
            write!(f, " {:>12}", c.name)?;
        }
        writeln!(f)?;

        let rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
            ("count", |c| c.count as f64),
            ("mean", |c| c.mean),
            ("std", |c| c.std),
            ("min", |c| c.min),
            ("25%", |c| c.q25),
            ("50%", |c| c.median),
            ("75%", |c| c.q75),
            ("max", |c| c.max),
        ];
        for (label, field) in rows {
            write!(f, "{label:<6}")?;
            for c in &self.columns {
                write!(f, " {:>12}", display::format_number(field(c), 2))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    fn sample() -> Dataset {
        [(3.0, 500.0), (-1.0, 200.0), (10.0, 900.0), (4.0, 650.0)]
            .into_iter()
            .map(|(e, w)| WageRecord::new(e, w))
            .collect()
    }

    #[test]
    fn columns_keep_order() {
        let data = sample();
        assert_eq!(data.len(), 4);
        assert_eq!(data.experience(), vec![3.0, -1.0, 10.0, 4.0]);
        assert_eq!(data.points()[1], (-1.0, 200.0));
        assert_eq!(data.experience_range(), Some(-1.0..=10.0));
        assert_eq!(Dataset::default().experience_range(), None);
    }

    #[test]
    fn describe_columns() {
        let description = sample().describe();
        let exper = &description.columns[0];
        assert_eq!(exper.count, 4);
        assert_close!(exper.mean, 4.0);
        assert_close!(exper.std, (62.0_f64 / 3.0).sqrt());
        assert_eq!((exper.min, exper.max), (-1.0, 10.0));
        assert_close!(exper.median, 3.5);
        assert_close!(exper.q25, 2.0);

        let wage = &description.columns[1];
        assert_close!(wage.q75, 712.5);

        let table = description.to_string();
        assert!(table.contains("experience"));
        assert!(table.lines().any(|l| l.starts_with("50%")));
    }

    #[test]
    fn describe_empty() {
        let description = Dataset::default().describe();
        assert_eq!(description.columns[0].count, 0);
        assert!(description.columns[0].min.is_nan());
    }
}
