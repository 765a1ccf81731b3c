//! CLI Module
//!
//! Command-line interface for the evaluation pipeline.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;

use crate::config::{EvalSettings, Mode, DEFAULT_DATASET};

/// Evaluate audio codec resynthesis against the original audio
#[derive(Parser, Debug)]
#[command(name = "audiodec-eval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Name of the dataset to evaluate
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// How the original split is consumed
    #[arg(long, value_enum, default_value_t = Mode::Streaming)]
    pub mode: Mode,

    /// Batch size for processing the dataset in batch mode
    #[arg(long = "batch_size", visible_alias = "batch-size", default_value_t = 100)]
    pub batch_size: usize,

    /// Specific models to evaluate
    #[arg(long, num_args = 0..)]
    pub models: Option<Vec<String>>,

    /// Maximum duration of audio recordings in seconds
    #[arg(long = "max_duration", visible_alias = "max-duration", default_value_t = 120)]
    pub max_duration: u64,

    /// Directory holding datasets
    #[arg(long, env = "AUDIODEC_DATA_DIR", default_value = "datasets")]
    pub data_dir: PathBuf,

    /// Directory the results file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// List known codec configurations and exit
    #[arg(long)]
    pub list_codecs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Evaluation settings selected on the command line
    pub fn settings(&self) -> EvalSettings {
        EvalSettings {
            mode: self.mode,
            batch_size: self.batch_size,
            models: self.models.clone(),
            max_duration: self.max_duration,
        }
    }
}
