//! Model-fitting seam
//!
//! External fitting routines (linear models, k-nearest neighbors, support
//! vector machines, ...) plug in by implementing [`Regressor`]. The only
//! capability required of a fitted model is prediction on new predictor
//! rows.

use serde::Serialize;

use crate::{ModelError, frame::ModelFrame};

pub trait Regressor {
    type Fitted: FittedModel;

    /// Fits a model on every row of `frame`.
    fn fit(&self, frame: &ModelFrame) -> Result<Self::Fitted, ModelError>;
}

pub trait FittedModel {
    /// Predictions on the modeled scale, one per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64>;
}

/// Baseline that ignores the predictors and predicts the training mean.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanRegressor;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedMean {
    pub mean: f64,
}

impl Regressor for MeanRegressor {
    type Fitted = FittedMean;

    #[expect(clippy::cast_precision_loss)]
    fn fit(&self, frame: &ModelFrame) -> Result<Self::Fitted, ModelError> {
        if frame.is_empty() {
            return Err(ModelError::EmptyFrame);
        }
        let mean = frame.target().iter().sum::<f64>() / frame.len() as f64;
        Ok(FittedMean { mean })
    }
}

impl FittedModel for FittedMean {
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        vec![self.mean; rows.len()]
    }
}
