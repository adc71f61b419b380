use std::path::PathBuf;

use tracing::warn;

use crate::{
    command::DatasetArg,
    config::Config,
    schema::{Anomalies, Report},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnomaliesArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnomaliesArg, config: &Config) -> anyhow::Result<()> {
    let prepared = arg.dataset.prepare(config)?;
    let dataset = &prepared.dataset;

    let warnings = dataset.data_quality_warnings();
    for warning in &warnings {
        warn!("{warning}");
    }

    Output::save_json(
        &Report::new(
            arg.dataset.input.clone(),
            Anomalies {
                rows: dataset.len(),
                anomalies: dataset.energy_ratio_anomalies().collect(),
                warnings,
                excluded: dataset.excluded(),
                normalization: &prepared.normalization,
            },
        ),
        arg.output.clone(),
    )
}
