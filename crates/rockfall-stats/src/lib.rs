//! Descriptive statistics for rockfall field-test columns.
//!
//! This crate provides the numeric building blocks used by the reporting
//! layer of the pipeline:
//!
//! - **Descriptive statistics**: mean, sample standard deviation, min/max, median
//! - **Quantiles**: linearly interpolated quantile markers (2.5 / 50 / 97.5 by default)
//! - **Density histograms**: equal-width buckets whose areas sum to one
//! - **Column summaries**: all of the above for a column with missing values
//! - **Correlation**: pairwise Pearson correlation matrices over named columns
//!
//! Missing values are represented as `None` (or `NaN`) and are excluded from
//! every computation.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`quantiles`]: Quantile computation and storage
//! - [`histogram`]: Density histogram construction
//! - [`summary`]: Column summaries combining the above
//! - [`correlation`]: Pearson correlation matrices
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use rockfall_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing quantiles
//!
//! ```
//! use rockfall_stats::quantiles::Quantiles;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let quantiles = Quantiles::new(&values, &[25.0, 50.0, 75.0]);
//! assert_eq!(quantiles.get(50.0), Some(3.0));
//! assert_eq!(quantiles.get(25.0), Some(2.0));
//! ```
//!
//! ## Summarizing a column with missing values
//!
//! ```
//! use rockfall_stats::summary::ColumnSummary;
//!
//! let column = [Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
//! let summary = ColumnSummary::new(column, 5).unwrap();
//! assert_eq!(summary.count, 5);
//! assert_eq!(summary.missing, 1);
//! assert_eq!(summary.stats.mean, 3.0);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod quantiles;
pub mod summary;

/// Returns `true` for values that take part in statistics.
///
/// `NaN` is treated the same as a missing value.
#[must_use]
pub fn is_present(value: f64) -> bool {
    !value.is_nan()
}

/// Collects the present values of a column, sorted in ascending order.
///
/// Returns the sorted values and the number of missing entries.
pub fn sorted_present<I>(values: I) -> (Vec<f64>, usize)
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut missing = 0;
    let mut present = values
        .into_iter()
        .filter_map(|value| match value {
            Some(v) if is_present(v) => Some(v),
            _ => {
                missing += 1;
                None
            }
        })
        .collect::<Vec<_>>();
    present.sort_by(f64::total_cmp);
    (present, missing)
}
