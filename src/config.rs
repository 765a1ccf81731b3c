//! Evaluation settings

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default dataset evaluated when none is given
pub const DEFAULT_DATASET: &str = "AudioDecBenchmark/librispeech_asr_dummy_synth";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_DURATION_SECS: u64 = 120;

/// How the original split is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Decode the split up front and process it in fixed-size batches
    Batch,
    /// Decode and process one entry at a time
    #[default]
    Streaming,
}

impl Mode {
    pub fn is_streaming(self) -> bool {
        self == Mode::Streaming
    }
}

/// Knobs of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSettings {
    pub mode: Mode,
    /// Entries per batch in batch mode; 0 means a single batch
    pub batch_size: usize,
    /// Restrict evaluation to these models; `None` evaluates all of them
    pub models: Option<Vec<String>>,
    /// Entries longer than this many seconds are skipped
    pub max_duration: u64,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            models: None,
            max_duration: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

impl EvalSettings {
    /// Whether `model` passes the `models` filter
    pub fn selects(&self, model: &str) -> bool {
        self.models
            .as_ref()
            .map(|models| models.iter().any(|m| m == model))
            .unwrap_or(true)
    }
}
