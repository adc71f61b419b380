//! Cross-validated scoring
//!
//! [`cross_validate`] fits the regressor once per holdout fold of a
//! [`ResamplingConfig`] on the remaining rows, predicts the holdout, and
//! reports RMSE and R² per fold along with their means. Folds with
//! undefined R² (constant predictions or observations) are left out of the
//! R² mean.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    ModelError,
    frame::{ModelFrame, ModelSpec},
    metrics::{r_squared, rmse},
    regressor::{FittedModel as _, Regressor},
    resampling::ResamplingConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldMetrics {
    pub repeat: usize,
    pub fold: usize,
    pub holdout_rows: usize,
    pub rmse: f64,
    pub r_squared: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResampleSummary {
    pub spec: ModelSpec,
    pub resampling: ResamplingConfig,
    pub folds: Vec<FoldMetrics>,
    pub mean_rmse: f64,
    /// Mean over folds with defined R², `None` if there are none.
    pub mean_r_squared: Option<f64>,
}

pub fn cross_validate<R>(
    regressor: &R,
    frame: &ModelFrame,
    config: &ResamplingConfig,
) -> Result<ResampleSummary, ModelError>
where
    R: Regressor,
{
    if frame.is_empty() {
        return Err(ModelError::EmptyFrame);
    }

    let mut metrics = vec![];
    for fold in config.folds(frame.len())? {
        let training = frame.subset(&fold.training(frame.len()));
        let holdout = frame.subset(&fold.holdout);

        let fitted = regressor.fit(&training)?;
        let predicted = fitted.predict(holdout.rows());
        let fold_metrics = FoldMetrics {
            repeat: fold.repeat,
            fold: fold.fold,
            holdout_rows: holdout.len(),
            rmse: rmse(holdout.target(), &predicted),
            r_squared: r_squared(holdout.target(), &predicted),
        };
        debug!(
            repeat = fold_metrics.repeat,
            fold = fold_metrics.fold,
            rmse = fold_metrics.rmse,
            "scored fold"
        );
        metrics.push(fold_metrics);
    }

    let mean_rmse = mean(metrics.iter().map(|m| m.rmse)).unwrap_or(f64::NAN);
    let mean_r_squared = mean(metrics.iter().filter_map(|m| m.r_squared));
    info!(
        folds = metrics.len(),
        mean_rmse,
        mean_r_squared = ?mean_r_squared,
        "cross-validation finished"
    );

    Ok(ResampleSummary {
        spec: frame.spec().clone(),
        resampling: *config,
        folds: metrics,
        mean_rmse,
        mean_r_squared,
    })
}

#[expect(clippy::cast_precision_loss)]
fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
