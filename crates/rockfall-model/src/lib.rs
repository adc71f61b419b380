//! Regression contract for the derived rockfall dataset
//!
//! Model fitting itself belongs to external statistical libraries. This crate
//! defines what they consume and how they are scored:
//!
//! - [`frame`]: a target vector and predictor matrix selected from a
//!   [`DerivedDataset`](rockfall_pipeline::dataset::DerivedDataset)
//! - [`resampling`]: seeded repeated k-fold assignments
//! - [`regressor`]: the [`Regressor`](regressor::Regressor) /
//!   [`FittedModel`](regressor::FittedModel) traits and a mean baseline
//! - [`metrics`]: RMSE and R²
//! - [`validation`]: cross-validated scoring of any regressor
//!
//! # Example
//!
//! ```no_run
//! use rockfall_model::{
//!     frame::{ModelFrame, ModelSpec},
//!     regressor::MeanRegressor,
//!     resampling::ResamplingConfig,
//!     validation::cross_validate,
//! };
//! use rockfall_pipeline::{PipelineConfig, run_pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let prepared = run_pipeline("rockfall.csv", &PipelineConfig::default())?;
//! let frame = ModelFrame::from_dataset(&prepared.dataset, &ModelSpec::log_linear())?;
//! let summary = cross_validate(&MeanRegressor, &frame, &ResamplingConfig::default())?;
//! println!("baseline RMSE: {:.3}", summary.mean_rmse);
//! # Ok(())
//! # }
//! ```

use rockfall_pipeline::record::Column;

pub mod frame;
pub mod metrics;
pub mod regressor;
pub mod resampling;
pub mod validation;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display("model frame has no rows")]
    EmptyFrame,
    #[display("column {column} is both the target and a predictor")]
    TargetAsPredictor { column: Column },
    /// `index` is the position of the record in the raw input.
    #[display("log target requires positive values, but record #{index} has {value}")]
    NonPositiveTarget { index: usize, value: f64 },
    #[display("{folds} folds requested for {rows} rows (need 2 <= folds <= rows)")]
    InvalidFolds { folds: usize, rows: usize },
    #[display("at least one repeat is required")]
    NoRepeats,
}
