//! audiodec-eval CLI
//!
//! Command-line entry point for codec resynthesis evaluation.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use audiodec_eval::cli::{commands, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("audiodec-eval v{}", env!("CARGO_PKG_VERSION"));

    if cli.list_codecs {
        commands::list_codecs()?;
        return Ok(());
    }

    commands::evaluate(&cli.data_dir, &cli.dataset, cli.settings(), &cli.output_dir)
        .with_context(|| format!("evaluation of dataset '{}' failed", cli.dataset))?;

    Ok(())
}
