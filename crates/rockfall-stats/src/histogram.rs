use serde::Serialize;

/// A density histogram of a dataset.
///
/// The data range `[min, max]` is split into equal-width buckets. Each bucket
/// carries its raw count and a density scaled so that the bucket areas
/// (`density * width`) sum to one, which is what a probability-scaled
/// histogram renders.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Width shared by every bucket.
    pub bucket_width: f64,
    /// Number of values binned.
    pub total: u64,
    /// The buckets, in ascending order of range.
    pub buckets: Vec<HistogramBucket>,
}

/// A single bucket in a histogram.
///
/// The range is half-open (`start..end`) except for the last bucket, which
/// also contains its upper edge.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBucket {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge.
    pub end: f64,
    /// The number of values that fall within this bucket.
    pub count: u64,
    /// `count / (total * width)`.
    pub density: f64,
}

impl Histogram {
    /// Creates a histogram from unsorted values, skipping `NaN`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rockfall_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, 5);
    /// assert_eq!(histogram.buckets.len(), 5);
    /// assert!((histogram.area() - 1.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_buckets: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (sorted, _) = crate::sorted_present(values.into_iter().map(Some));
        Self::from_sorted(&sorted, num_buckets)
    }

    /// Creates a histogram from pre-sorted values without missing entries.
    ///
    /// An empty input or `num_buckets == 0` yields a histogram without
    /// buckets. A constant input is spread over a unit-width range centered
    /// on the value so that every bucket keeps a positive width.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_buckets: usize) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self::empty();
        };
        if num_buckets == 0 {
            return Self::empty();
        }

        let (start, range) = if max - min < f64::EPSILON * max.abs().max(1.0) {
            (min - 0.5, 1.0)
        } else {
            (min, max - min)
        };
        let bucket_width = range / num_buckets as f64;

        let mut counts = vec![0_u64; num_buckets];
        for &value in sorted_values {
            let position = (value - start) / bucket_width;
            // the upper edge belongs to the last bucket
            let idx = (position.floor().max(0.0) as usize).min(num_buckets - 1);
            counts[idx] += 1;
        }

        let total = sorted_values.len() as u64;
        let buckets = counts
            .into_iter()
            .enumerate()
            .map(|(idx, count)| {
                // Recompute edges from the origin to avoid accumulating rounding error
                let bucket_start = start + range * idx as f64 / num_buckets as f64;
                let bucket_end = start + range * (idx + 1) as f64 / num_buckets as f64;
                HistogramBucket {
                    start: bucket_start,
                    end: bucket_end,
                    count,
                    density: count as f64 / (total as f64 * bucket_width),
                }
            })
            .collect();

        Self {
            bucket_width,
            total,
            buckets,
        }
    }

    fn empty() -> Self {
        Self {
            bucket_width: 0.0,
            total: 0,
            buckets: vec![],
        }
    }

    /// Total area under the histogram: one for any non-empty histogram.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.buckets
            .iter()
            .map(|bucket| bucket.density * self.bucket_width)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_one_per_bucket() {
        let histogram = Histogram::from_sorted(&[1.0, 2.0, 3.0, 4.0, 5.0], 5);
        assert_eq!(histogram.buckets.len(), 5);
        assert!((histogram.bucket_width - 0.8).abs() < 1e-12);
        let counts = histogram.buckets.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 1, 1, 1, 1]);
        assert!((histogram.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_value_in_last_bucket() {
        let histogram = Histogram::from_sorted(&[0.0, 10.0], 4);
        assert_eq!(histogram.buckets[0].count, 1);
        assert_eq!(histogram.buckets[3].count, 1);
        assert_eq!(histogram.buckets[3].end, 10.0);
    }

    #[test]
    fn test_constant_values() {
        let histogram = Histogram::from_sorted(&[2.0, 2.0, 2.0], 2);
        assert_eq!(histogram.buckets.len(), 2);
        assert_eq!(histogram.buckets[0].start, 1.5);
        assert_eq!(histogram.buckets[1].end, 2.5);
        assert_eq!(histogram.buckets[1].count, 3);
        assert!((histogram.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        assert!(Histogram::from_sorted(&[], 5).buckets.is_empty());
        assert!(Histogram::from_sorted(&[1.0], 0).buckets.is_empty());
    }

    #[test]
    fn test_density_integrates_to_one_skewed() {
        let values = [0.1, 0.2, 0.2, 0.3, 5.0, 12.5, 40.0, 41.0];
        let histogram = Histogram::new(values, 7);
        assert_eq!(histogram.total, 8);
        assert!((histogram.area() - 1.0).abs() < 1e-9);
    }
}
