//! Prediction accuracy metrics.
//!
//! R² follows the squared-correlation definition: the squared Pearson
//! correlation between observed and predicted values. It is undefined when
//! either side is constant.

use rockfall_stats::correlation::pearson;

/// Root mean squared error.
///
/// # Panics
///
/// Panics if the slices differ in length.
///
/// # Examples
///
/// ```
/// use rockfall_model::metrics::rmse;
///
/// assert_eq!(rmse(&[1.0, 2.0], &[1.0, 4.0]), 2.0_f64.sqrt());
/// ```
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn rmse(observed: &[f64], predicted: &[f64]) -> f64 {
    assert_eq!(observed.len(), predicted.len());
    if observed.is_empty() {
        return f64::NAN;
    }
    let sse = observed
        .iter()
        .zip(predicted)
        .map(|(o, p)| (o - p).powi(2))
        .sum::<f64>();
    (sse / observed.len() as f64).sqrt()
}

/// Squared Pearson correlation of observed and predicted values.
///
/// # Panics
///
/// Panics if the slices differ in length.
///
/// # Examples
///
/// ```
/// use rockfall_model::metrics::r_squared;
///
/// let r2 = r_squared(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((r2 - 1.0).abs() < 1e-12);
/// assert_eq!(r_squared(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
/// ```
#[must_use]
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Option<f64> {
    assert_eq!(observed.len(), predicted.len());
    if is_constant(observed) || is_constant(predicted) {
        return None;
    }
    let observed = observed.iter().copied().map(Some).collect::<Vec<_>>();
    let predicted = predicted.iter().copied().map(Some).collect::<Vec<_>>();
    pearson(&observed, &predicted).map(|r| r * r)
}

#[expect(clippy::float_cmp)]
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
