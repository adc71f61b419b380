use serde::{Deserialize, Serialize};

use crate::{
    features::DegenerateRowPolicy, loader::LoaderOptions, normalization::NormalizationPolicy,
    report::ReportConfig,
};

/// Configuration of one pipeline run. Every field has a default, so a
/// partial JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Field delimiter of the input file.
    pub delimiter: char,
    pub normalization: NormalizationPolicy,
    pub degenerate_rows: DegenerateRowPolicy,
    pub report: ReportConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            normalization: NormalizationPolicy::default(),
            degenerate_rows: DegenerateRowPolicy::default(),
            report: ReportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("delimiter '{delimiter}' is not a single-byte character")]
pub struct InvalidDelimiterError {
    pub delimiter: char,
}

impl PipelineConfig {
    pub fn loader_options(&self) -> Result<LoaderOptions, InvalidDelimiterError> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(InvalidDelimiterError {
                delimiter: self.delimiter,
            })?;
        Ok(LoaderOptions { delimiter })
    }
}
