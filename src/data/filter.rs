use super::model::{Dataset, WageRecord};

impl Dataset {
    /// Keeps the rows with `wage <= threshold`, in their original order.
    ///
    /// Returns a new dataset; `self` is untouched. The threshold is inclusive.
    ///
    /// # Example
    /// ```rust
    /// # use wagefit::data::{Dataset, WageRecord};
    /// let data: Dataset = [(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]
    ///     .into_iter()
    ///     .map(|(e, w)| WageRecord::new(e, w))
    ///     .collect();
    /// assert_eq!(data.filter_outliers(25.0).len(), 2);
    /// ```
    #[must_use]
    pub fn filter_outliers(&self, threshold: f64) -> Dataset {
        let kept = self.filter(|r| r.wage <= threshold);

        let removed = self.len() - kept.len();
        if removed > 0 {
            log::warn!("Removed {removed} rows with wage above {threshold}");
        }

        kept
    }

    /// Keeps the rows matching `predicate`, in their original order.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&WageRecord) -> bool) -> Dataset {
        self.records().iter().filter(|r| predicate(r)).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[(f64, f64)]) -> Dataset {
        rows.iter().map(|&(e, w)| WageRecord::new(e, w)).collect()
    }

    #[test]
    fn keeps_rows_at_or_below_threshold() {
        let data = dataset(&[(1.0, 10.0), (2.0, 20.0), (3.0, 30.0)]);
        let kept = data.filter_outliers(25.0);
        assert_eq!(kept.points(), vec![(1.0, 10.0), (2.0, 20.0)]);

        // Inclusive bound
        assert_eq!(data.filter_outliers(30.0).len(), 3);

        // Source unchanged
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn preserves_order() {
        let data = dataset(&[(5.0, 5000.0), (9.0, 300.0), (1.0, 4000.0), (2.0, 4000.1), (7.0, 100.0)]);
        let kept = data.filter_outliers(4000.0);
        assert_eq!(kept.experience(), vec![9.0, 1.0, 7.0]);
    }

    #[test]
    fn everything_filtered() {
        let data = dataset(&[(1.0, 10.0)]);
        assert!(data.filter_outliers(5.0).is_empty());
    }
}
