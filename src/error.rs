//! Error handling for audiodec-eval
//!
//! Every failure aborts the run. The only conditions that are recovered
//! silently (over-long entries, empty aggregations) never reach this type.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

/// Main error type for evaluation operations
#[derive(Error, Debug)]
pub enum EvalError {
    // Dataset Errors
    #[error("Dataset not found: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Dataset '{dataset}' has no 'original' split")]
    MissingOriginalSplit { dataset: String },

    #[error("Split not found: {split}")]
    SplitNotFound { split: String },

    #[error("Entry '{id}' from the original split is missing in model '{model}'")]
    MissingEntry { model: String, id: String },

    // Audio Errors
    #[error("Invalid audio file {path}: {reason}")]
    InvalidAudio {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<hound::Error>,
    },

    #[error("Invalid signal: {reason}")]
    InvalidSignal { reason: String },

    // Metric Errors
    #[error("Metric '{metric}' failed: {reason}")]
    MetricError { metric: String, reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EvalError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EvalError::DatasetNotFound { .. } => "DATASET_NOT_FOUND",
            EvalError::MissingOriginalSplit { .. } => "MISSING_ORIGINAL_SPLIT",
            EvalError::SplitNotFound { .. } => "SPLIT_NOT_FOUND",
            EvalError::MissingEntry { .. } => "MISSING_ENTRY",
            EvalError::InvalidAudio { .. } => "INVALID_AUDIO",
            EvalError::InvalidSignal { .. } => "INVALID_SIGNAL",
            EvalError::MetricError { .. } => "METRIC_ERROR",
            EvalError::Io(_) => "IO_ERROR",
            EvalError::Walk(_) => "WALK_ERROR",
            EvalError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            EvalError::DatasetNotFound { .. } => vec![
                "Check the --dataset name",
                "Point --data-dir (or AUDIODEC_DATA_DIR) at the directory holding the dataset",
            ],
            EvalError::MissingOriginalSplit { .. } => vec![
                "The dataset needs an 'original' subdirectory with the reference audio",
            ],
            EvalError::MissingEntry { .. } => vec![
                "Re-run resynthesis for the model so every original entry has a counterpart",
                "Exclude the model with --models",
            ],
            EvalError::InvalidAudio { .. } => vec![
                "Check the file plays in another application",
                "Re-export the file as PCM or float WAV",
            ],
            _ => vec![],
        }
    }
}

/// Build an `InvalidAudio` error from a hound failure
pub(crate) fn invalid_audio(path: impl Into<PathBuf>, source: hound::Error) -> EvalError {
    EvalError::InvalidAudio {
        path: path.into(),
        reason: source.to_string(),
        source: Some(source),
    }
}
