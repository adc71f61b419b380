//! JSON documents written by the subcommands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rockfall_model::{resampling::ResamplingConfig, validation::ResampleSummary};
use rockfall_pipeline::{
    dataset::{DataQualityWarning, ExcludedRow},
    normalization::NormalizationReport,
    record::DerivedRecord,
    report::ColumnReport,
};
use rockfall_stats::correlation::CorrelationMatrix;
use serde::Serialize;

/// Common header of every report.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Report<T> {
    pub fn new(input: PathBuf, body: T) -> Self {
        Self {
            generated_at: Utc::now(),
            input,
            body,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreparedTable<'a> {
    pub normalization: &'a NormalizationReport,
    pub excluded: &'a [ExcludedRow],
    pub warnings: Vec<DataQualityWarning>,
    pub records: &'a [DerivedRecord],
}

#[derive(Debug, Serialize)]
pub struct ColumnReports {
    pub rows: usize,
    pub columns: Vec<ColumnReport>,
}

#[derive(Debug, Serialize)]
pub struct Anomalies<'a> {
    pub rows: usize,
    pub anomalies: Vec<&'a DerivedRecord>,
    pub warnings: Vec<DataQualityWarning>,
    pub excluded: &'a [ExcludedRow],
    pub normalization: &'a NormalizationReport,
}

#[derive(Debug, Serialize)]
pub struct Correlation {
    pub rows: usize,
    pub matrix: CorrelationMatrix,
}

/// Fold of one row in each repeat.
#[derive(Debug, Serialize)]
pub struct FoldRow<'a> {
    pub row: usize,
    pub test_group: &'a str,
    pub folds: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct FoldTable<'a> {
    pub resampling: ResamplingConfig,
    pub rows: Vec<FoldRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Baseline {
    pub rows: usize,
    pub model: &'static str,
    pub summary: ResampleSummary,
}
