use serde::Serialize;

use crate::{descriptive::DescriptiveStats, histogram::Histogram, quantiles::Quantiles};

/// Summary of a single numeric column, ready to be handed to a chart renderer.
///
/// Combines:
/// - descriptive statistics (mean, sample standard deviation, ...)
/// - the 2.5 / 50 / 97.5 quantile markers
/// - a density histogram with the requested number of buckets
///
/// Missing values are counted but otherwise excluded.
///
/// # Examples
///
/// ```
/// use rockfall_stats::summary::ColumnSummary;
///
/// let column = [1.0, 2.0, 3.0, 4.0, 5.0].map(Some);
/// let summary = ColumnSummary::new(column, 5).unwrap();
///
/// assert_eq!(summary.stats.mean, 3.0);
/// assert_eq!(summary.quantiles.get(50.0), Some(3.0));
/// assert_eq!(summary.histogram.buckets.len(), 5);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Number of present values.
    pub count: usize,
    /// Number of missing (`None` or `NaN`) values.
    pub missing: usize,
    /// Descriptive statistics over the present values.
    pub stats: DescriptiveStats,
    /// Quantile markers over the present values.
    pub quantiles: Quantiles,
    /// Density histogram over the present values.
    pub histogram: Histogram,
}

impl ColumnSummary {
    /// Summarizes a column using the default 2.5 / 50 / 97.5 markers.
    ///
    /// # Returns
    ///
    /// * `Some(ColumnSummary)` - if the column contains at least one present value
    /// * `None` - if every value is missing
    #[must_use]
    pub fn new<I>(values: I, num_buckets: usize) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::with_percents(values, num_buckets, &crate::quantiles::MARKER_PERCENTS)
    }

    /// Summarizes a column with custom quantile markers.
    #[must_use]
    pub fn with_percents<I>(values: I, num_buckets: usize, percents: &[f64]) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let (sorted, missing) = crate::sorted_present(values);
        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let quantiles = Quantiles::from_sorted(&sorted, percents);
        let histogram = Histogram::from_sorted(&sorted, num_buckets);

        Some(Self {
            count: sorted.len(),
            missing,
            stats,
            quantiles,
            histogram,
        })
    }
}
