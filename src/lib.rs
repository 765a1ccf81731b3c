//! audiodec-eval - Codec Resynthesis Evaluation
//!
//! Measures how faithfully audio codecs reconstruct their input. A dataset
//! holds an `original` split and one split per codec model; every original
//! entry is compared with its resynthesis and the metrics are averaged per
//! model.
//!
//! # Pipeline
//!
//! - Dataset: named splits of (id, samples, sampling rate) entries
//! - Batcher: fixed-size grouping of the original split in batch mode
//! - Evaluator: pad, duration filter, metric computation per entry
//! - Aggregator: NaN-ignoring mean per metric
//! - Reporter: diagnostics and the `<dataset>_evaluation_results.json` file

pub mod audio;
pub mod cli;
pub mod codec;
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod metrics;
pub mod report;

pub use error::{EvalError, Result};
