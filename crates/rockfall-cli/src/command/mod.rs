use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rockfall_model::resampling::ResamplingConfig;
use rockfall_pipeline::{Prepared, features::DegenerateRowPolicy, run_pipeline};

use self::{
    anomalies::AnomaliesArg, baseline::BaselineArg, correlate::CorrelateArg, folds::FoldsArg,
    prepare::PrepareArg, summarize::SummarizeArg,
};
use crate::{config::Config, logging};

mod anomalies;
mod baseline;
mod correlate;
mod folds;
mod prepare;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Pipeline configuration JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug messages
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Log warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the full pipeline and write the derived table
    Prepare(#[clap(flatten)] PrepareArg),
    /// Histogram and quantile report of columns
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Records violating energy conservation
    Anomalies(#[clap(flatten)] AnomaliesArg),
    /// Pairwise correlation matrix of columns
    Correlate(#[clap(flatten)] CorrelateArg),
    /// Repeated k-fold assignment of every row
    Folds(#[clap(flatten)] FoldsArg),
    /// Cross-validated metrics of the mean baseline
    Baseline(#[clap(flatten)] BaselineArg),
}

/// Input file and pipeline overrides shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DatasetArg {
    /// Path to the field-test CSV file
    pub input: PathBuf,
    /// Exclude rows with undefined derived features instead of failing
    #[arg(long)]
    pub exclude_degenerate: bool,
}

impl DatasetArg {
    pub(crate) fn prepare(&self, config: &Config) -> anyhow::Result<Prepared> {
        let mut pipeline = config.pipeline.clone();
        if self.exclude_degenerate {
            pipeline.degenerate_rows = DegenerateRowPolicy::Exclude;
        }
        run_pipeline(&self.input, &pipeline)
            .with_context(|| format!("Failed to prepare dataset: {}", self.input.display()))
    }
}

/// Overrides of the configured resampling.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ResamplingArg {
    /// Number of folds
    #[arg(long)]
    pub folds: Option<usize>,
    /// Number of repeats
    #[arg(long)]
    pub repeats: Option<usize>,
    /// Seed of the fold shuffler
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ResamplingArg {
    pub(crate) fn apply(&self, config: ResamplingConfig) -> ResamplingConfig {
        ResamplingConfig {
            folds: self.folds.unwrap_or(config.folds),
            repeats: self.repeats.unwrap_or(config.repeats),
            seed: self.seed.unwrap_or(config.seed),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(logging::level(args.verbose, args.quiet))?;
    let config = Config::load(args.config.as_deref())?;

    match &args.mode {
        Mode::Prepare(arg) => prepare::run(arg, &config)?,
        Mode::Summarize(arg) => summarize::run(arg, &config)?,
        Mode::Anomalies(arg) => anomalies::run(arg, &config)?,
        Mode::Correlate(arg) => correlate::run(arg, &config)?,
        Mode::Folds(arg) => folds::run(arg, &config)?,
        Mode::Baseline(arg) => baseline::run(arg, &config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;
    use rockfall_pipeline::record::Column;

    use super::*;

    fn parse(args: &[&str]) -> CommandArgs {
        CommandArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["rockfall", "anomalies", "data.csv", "-v", "--config", "c.json"]);
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
        assert!(matches!(args.mode, Mode::Anomalies(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CommandArgs::try_parse_from(["rockfall", "-v", "-q", "prepare", "a.csv"]).is_err());
    }

    #[test]
    fn test_summarize_columns() {
        let args = parse(&[
            "rockfall",
            "summarize",
            "data.csv",
            "--column",
            "total_energy",
            "--column",
            "SlopeHeight",
            "--buckets",
            "8",
        ]);
        let Mode::Summarize(arg) = args.mode else {
            panic!("expected summarize");
        };
        assert_eq!(arg.columns, vec![Column::TotalEnergy, Column::SlopeHeight]);
        assert_eq!(arg.buckets, Some(8));
    }

    #[test]
    fn test_unknown_column_rejected() {
        assert!(
            CommandArgs::try_parse_from(["rockfall", "summarize", "a.csv", "--column", "speed"])
                .is_err()
        );
    }

    #[test]
    fn test_correlate_comma_separated() {
        let args = parse(&[
            "rockfall",
            "correlate",
            "data.csv",
            "--columns",
            "weight,total_energy",
        ]);
        let Mode::Correlate(arg) = args.mode else {
            panic!("expected correlate");
        };
        assert_eq!(arg.columns, vec![Column::Weight, Column::TotalEnergy]);
    }

    #[test]
    fn test_baseline_overrides() {
        let args = parse(&[
            "rockfall",
            "baseline",
            "data.csv",
            "--log-target",
            "--folds",
            "3",
            "--seed",
            "7",
            "--exclude-degenerate",
        ]);
        let Mode::Baseline(arg) = args.mode else {
            panic!("expected baseline");
        };
        assert!(arg.log_target);
        assert!(arg.dataset.exclude_degenerate);

        let resampling = arg.resampling.apply(Config::default().resampling);
        assert_eq!((resampling.folds, resampling.repeats, resampling.seed), (3, 5, 7));
    }
}
