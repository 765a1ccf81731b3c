//! Result reporting
//!
//! Results are written once, at the end of a run, as an indented JSON object
//! mapping model name to metric name to mean. Means that are not finite are
//! written as `null`.

mod diagnostics;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::ser::Serializer;
use serde::Serialize;

pub use diagnostics::ResourceMonitor;

use crate::error::Result;
use crate::eval::EvaluationResults;

/// File name results for `dataset` are written to
pub fn output_file_name(dataset: &str) -> String {
    format!("{}_evaluation_results.json", dataset.replace('/', "_"))
}

/// Aggregated results of one run
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub dataset: String,
    pub results: EvaluationResults,
}

impl EvaluationReport {
    pub fn new(dataset: impl Into<String>, results: EvaluationResults) -> Self {
        Self {
            dataset: dataset.into(),
            results,
        }
    }

    /// Render as JSON with a four-space indent
    pub fn to_json(&self) -> Result<String> {
        let serializable: BTreeMap<&str, BTreeMap<&str, Mean>> = self
            .results
            .iter()
            .map(|(model, metrics)| {
                let means = metrics
                    .iter()
                    .map(|(name, &value)| (name.as_str(), Mean(value)))
                    .collect();
                (model.as_str(), means)
            })
            .collect();

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        serializable.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write to `<dir>/<output_file_name>`, replacing any existing file
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(output_file_name(&self.dataset));
        fs::write(&path, self.to_json()?)?;
        info!("Wrote {} model results to {}", self.results.len(), path.display());
        Ok(path)
    }
}

/// Mean value serialized as `null` when not finite
struct Mean(f64);

impl Serialize for Mean {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}
