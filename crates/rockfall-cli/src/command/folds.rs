use std::path::PathBuf;

use crate::{
    command::{DatasetArg, ResamplingArg},
    config::Config,
    schema::{FoldRow, FoldTable, Report},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FoldsArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,
    #[clap(flatten)]
    pub resampling: ResamplingArg,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &FoldsArg, config: &Config) -> anyhow::Result<()> {
    let resampling = arg.resampling.apply(config.resampling);
    let prepared = arg.dataset.prepare(config)?;
    let records = prepared.dataset.records();

    let assignments = resampling.fold_assignments(records.len())?;
    let rows = records
        .iter()
        .enumerate()
        .map(|(row, record)| FoldRow {
            row,
            test_group: &record.observation.test_group,
            folds: assignments.iter().map(|fold_of| fold_of[row]).collect(),
        })
        .collect();

    Output::save_json(
        &Report::new(
            arg.dataset.input.clone(),
            FoldTable { resampling, rows },
        ),
        arg.output.clone(),
    )
}
