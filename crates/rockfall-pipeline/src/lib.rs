//! Data preparation for the rockfall impact-energy study
//!
//! This crate turns a field-test table of rockfall rolls into the derived
//! modeling dataset and describes its columns for charting.
//!
//! # Overview
//!
//! The pipeline is a batch of four stages, each consuming the whole output
//! of the previous one:
//!
//! 1. **Load** ([`loader`]): read [`RawRecord`](record::RawRecord)s from a delimited file
//! 2. **Normalize** ([`normalization`]): typed categoricals, group codes,
//!    missing-value policy, material indicators
//! 3. **Derive** ([`features`]): total energy, slope length, potential energy,
//!    energy ratio
//! 4. **Report** ([`dataset`], [`report`]): named-column queries, anomaly
//!    queries, column summaries, correlation matrices
//!
//! # Example
//!
//! ```no_run
//! use rockfall_pipeline::{PipelineConfig, record::Column, run_pipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let prepared = run_pipeline("rockfall.csv", &config)?;
//!
//! println!("{} rows", prepared.dataset.len());
//! for record in prepared.dataset.energy_ratio_anomalies() {
//!     println!("{}: ratio {:.2}", record.observation.test_group, record.energy_ratio);
//! }
//! if let Some(report) = prepared.dataset.summarize(Column::TotalEnergy, &config.report) {
//!     println!("mean total energy: {}", report.summary.stats.mean);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::Serialize;

pub use self::config::PipelineConfig;
use self::{
    config::InvalidDelimiterError,
    dataset::DerivedDataset,
    features::{DeriveError, FeatureCalculator},
    loader::LoadError,
    normalization::{NormalizationError, NormalizationReport, Normalizer},
    record::RawRecord,
};

pub mod config;
pub mod dataset;
pub mod features;
pub mod loader;
pub mod normalization;
pub mod record;
pub mod report;

/// Fatal pipeline errors.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("invalid configuration: {_0}")]
    Config(InvalidDelimiterError),
    #[display("load failed: {_0}")]
    Load(LoadError),
    #[display("normalization failed: {_0}")]
    Normalization(NormalizationError),
    #[display("feature derivation failed: {_0}")]
    Derive(DeriveError),
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Prepared {
    pub dataset: DerivedDataset,
    pub normalization: NormalizationReport,
}

/// Loads, normalizes and derives the dataset stored at `path`.
pub fn run_pipeline<P>(path: P, config: &PipelineConfig) -> Result<Prepared, PipelineError>
where
    P: AsRef<Path>,
{
    let records = loader::load_records(path, config.loader_options()?)?;
    prepare(&records, config)
}

/// Normalizes and derives already loaded records.
pub fn prepare(records: &[RawRecord], config: &PipelineConfig) -> Result<Prepared, PipelineError> {
    let normalized = Normalizer::new(config.normalization).normalize(records)?;
    let dataset = FeatureCalculator::new(config.degenerate_rows)
        .derive_all(&normalized.observations, normalized.group_codes)?;
    Ok(Prepared {
        dataset,
        normalization: normalized.report,
    })
}
