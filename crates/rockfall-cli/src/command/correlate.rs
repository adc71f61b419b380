use std::path::PathBuf;

use rockfall_pipeline::record::Column;

use crate::{
    command::DatasetArg,
    config::Config,
    schema::{Correlation, Report},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CorrelateArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,
    /// Columns to correlate (comma-separated, all continuous columns if omitted)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<Column>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CorrelateArg, config: &Config) -> anyhow::Result<()> {
    let prepared = arg.dataset.prepare(config)?;
    let dataset = &prepared.dataset;

    let columns = if arg.columns.is_empty() {
        Column::CONTINUOUS.to_vec()
    } else {
        arg.columns.clone()
    };

    Output::save_json(
        &Report::new(
            arg.dataset.input.clone(),
            Correlation {
                rows: dataset.len(),
                matrix: dataset.correlation(&columns),
            },
        ),
        arg.output.clone(),
    )
}
