use std::io;

use anyhow::Context as _;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Log level selected by the `-v` / `-q` flags.
#[must_use]
pub fn level(verbose: bool, quiet: bool) -> Level {
    match (verbose, quiet) {
        (true, _) => Level::DEBUG,
        (false, true) => Level::WARN,
        (false, false) => Level::INFO,
    }
}

/// Installs the global subscriber. Logs go to stderr; stdout carries data.
pub fn init(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
