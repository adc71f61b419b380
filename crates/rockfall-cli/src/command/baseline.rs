use std::path::PathBuf;

use rockfall_model::{
    frame::{ModelFrame, ModelSpec},
    regressor::MeanRegressor,
    validation::cross_validate,
};

use crate::{
    command::{DatasetArg, ResamplingArg},
    config::Config,
    schema::{Baseline, Report},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BaselineArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,
    #[clap(flatten)]
    pub resampling: ResamplingArg,
    /// Score on the log of total energy
    #[arg(long)]
    pub log_target: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BaselineArg, config: &Config) -> anyhow::Result<()> {
    let resampling = arg.resampling.apply(config.resampling);
    let prepared = arg.dataset.prepare(config)?;

    let spec = if arg.log_target {
        ModelSpec::log_linear()
    } else {
        ModelSpec::linear()
    };
    let frame = ModelFrame::from_dataset(&prepared.dataset, &spec)?;
    let summary = cross_validate(&MeanRegressor, &frame, &resampling)?;

    Output::save_json(
        &Report::new(
            arg.dataset.input.clone(),
            Baseline {
                rows: frame.len(),
                model: "mean",
                summary,
            },
        ),
        arg.output.clone(),
    )
}
