use std::path::PathBuf;

use anyhow::{Context as _, ensure};
use rockfall_pipeline::record::Column;

use crate::{
    command::DatasetArg,
    config::Config,
    schema::{ColumnReports, Report},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,
    /// Column to summarize, repeatable (all continuous columns if omitted)
    #[arg(long = "column")]
    pub columns: Vec<Column>,
    /// Number of histogram buckets
    #[arg(long)]
    pub buckets: Option<usize>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg, config: &Config) -> anyhow::Result<()> {
    let mut report_config = config.pipeline.report.clone();
    if let Some(buckets) = arg.buckets {
        report_config.num_buckets = buckets;
    }
    report_config
        .validate()
        .context("Invalid histogram settings")?;

    let prepared = arg.dataset.prepare(config)?;
    let dataset = &prepared.dataset;
    ensure!(!dataset.is_empty(), "No rows left to summarize");

    let columns = if arg.columns.is_empty() {
        Column::CONTINUOUS.to_vec()
    } else {
        arg.columns.clone()
    };
    let reports = columns
        .into_iter()
        .filter_map(|column| dataset.summarize(column, &report_config))
        .collect();

    Output::save_json(
        &Report::new(
            arg.dataset.input.clone(),
            ColumnReports {
                rows: dataset.len(),
                columns: reports,
            },
        ),
        arg.output.clone(),
    )
}
