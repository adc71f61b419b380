use std::path::PathBuf;

use tracing::info;

use crate::{
    command::DatasetArg,
    config::Config,
    schema::{PreparedTable, Report},
    util::Output,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Format {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PrepareArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
}

pub(crate) fn run(arg: &PrepareArg, config: &Config) -> anyhow::Result<()> {
    let prepared = arg.dataset.prepare(config)?;
    let dataset = &prepared.dataset;

    let mut output = Output::from_output_path(arg.output.clone())?;
    match arg.format {
        Format::Json => output.write_json(Report::new(
            arg.dataset.input.clone(),
            PreparedTable {
                normalization: &prepared.normalization,
                excluded: dataset.excluded(),
                warnings: dataset.data_quality_warnings(),
                records: dataset.records(),
            },
        ))?,
        Format::Csv => output.write_table(dataset)?,
    }
    info!(rows = dataset.len(), output = %output.display_path(), "wrote derived table");
    Ok(())
}
