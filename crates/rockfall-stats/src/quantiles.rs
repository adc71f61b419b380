use serde::Serialize;

/// Quantile markers drawn on every column histogram (2.5 %, 50 %, 97.5 %).
pub const MARKER_PERCENTS: [f64; 3] = [2.5, 50.0, 97.5];

/// Precomputed quantile values for a dataset.
///
/// Stores percent-value pairs for lookup of commonly used quantile points.
///
/// # Examples
///
/// ```
/// use rockfall_stats::quantiles::Quantiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let quantiles = Quantiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(quantiles.get(50.0), Some(5.5));
/// assert_eq!(quantiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Quantiles {
    /// Percent-value pairs in the order they were requested.
    /// Each tuple contains (percent, value) where percent is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Quantiles {
    /// Computes quantiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percents: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percents
            .iter()
            .map(|&p| (p, compute_quantile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes quantiles from unsorted values, skipping `NaN`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rockfall_stats::quantiles::Quantiles;
    ///
    /// let values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
    /// let quantiles = Quantiles::new(&values, &[50.0]);
    ///
    /// assert_eq!(quantiles.get(50.0), Some(5.0));
    /// ```
    #[must_use]
    pub fn new(values: &[f64], percents: &[f64]) -> Self {
        let (sorted, _) = crate::sorted_present(values.iter().copied().map(Some));
        Self::from_sorted(&sorted, percents)
    }

    /// Computes the 2.5 / 50 / 97.5 markers from sorted values.
    #[must_use]
    pub fn markers_from_sorted(sorted_values: &[f64]) -> Self {
        Self::from_sorted(sorted_values, &MARKER_PERCENTS)
    }

    /// Gets the value at a specific percent.
    ///
    /// Returns `None` if the percent was not precomputed.
    #[must_use]
    pub fn get(&self, percent: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percent).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percent, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    /// Returns all percent-value pairs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a single quantile from sorted data.
///
/// Uses linear interpolation between the two closest order statistics
/// (Hyndman-Fan type 7): for `n` values the position is
/// `h = (n - 1) * percent / 100` and the result is
/// `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use rockfall_stats::quantiles::compute_quantile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_quantile(&values, 50.0), 3.0);
/// assert_eq!(compute_quantile(&values, 25.0), 2.0);
/// assert_eq!(compute_quantile(&values, 100.0), 5.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_quantile(sorted_values: &[f64], percent: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let h = (last as f64 * percent.clamp(0.0, 100.0)) / 100.0;
    let lo = (h.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = h - h.floor();
    sorted_values[lo] + frac * (sorted_values[hi] - sorted_values[lo])
}
