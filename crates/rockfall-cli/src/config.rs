use std::path::Path;

use rockfall_model::resampling::ResamplingConfig;
use rockfall_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::util;

/// Contents of the `--config` file: pipeline settings plus resampling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
    pub resampling: ResamplingConfig,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => util::read_json_file("config", path),
            None => Ok(Self::default()),
        }
    }
}
