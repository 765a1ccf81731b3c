//! Objective reconstruction metrics
//!
//! Every metric compares a reference signal with an estimate of the same
//! length and sampling rate and produces a single scalar.
//!
//! # Standard set
//! - `mel_distance`: multi-scale log/linear mel-spectrogram L1 distance
//! - `stft_distance`: multi-scale log/linear STFT magnitude L1 distance
//! - `waveform_distance`: mean absolute sample difference
//! - `sisdr`: scale-invariant signal-to-distortion ratio in dB

mod spectral;
mod waveform;

use std::collections::BTreeMap;

pub use spectral::{MelDistance, StftDistance};
pub use waveform::{SiSdr, WaveformDistance};

use crate::audio::AudioSignal;
use crate::error::{EvalError, Result};

/// Metric name to value for one entry
pub type MetricsRecord = BTreeMap<String, f64>;

/// A scalar comparison between a reference and an estimate
pub trait Metric {
    /// Key under which the value is reported
    fn name(&self) -> &'static str;

    /// Compare `estimate` against `reference`
    fn compute(&self, reference: &AudioSignal, estimate: &AudioSignal) -> Result<f64>;
}

/// Fixed collection of metrics evaluated together
pub struct MetricSet {
    metrics: Vec<Box<dyn Metric>>,
}

impl MetricSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
        }
    }

    /// The metric set reported by the evaluator
    pub fn standard() -> Self {
        Self::new()
            .with(MelDistance::default())
            .with(StftDistance::default())
            .with(WaveformDistance)
            .with(SiSdr::default())
    }

    /// Add a metric
    pub fn with(mut self, metric: impl Metric + 'static) -> Self {
        self.metrics.push(Box::new(metric));
        self
    }

    /// Names of all metrics, in evaluation order
    pub fn names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Compute every metric for one reference/estimate pair
    pub fn evaluate(&self, reference: &AudioSignal, estimate: &AudioSignal) -> Result<MetricsRecord> {
        self.metrics
            .iter()
            .map(|metric| {
                let value = metric.compute(reference, estimate)?;
                Ok((metric.name().to_string(), value))
            })
            .collect()
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reject pairs that cannot be compared sample by sample
pub(crate) fn check_pair(metric: &str, reference: &AudioSignal, estimate: &AudioSignal) -> Result<()> {
    if reference.sample_rate() != estimate.sample_rate() {
        return Err(EvalError::MetricError {
            metric: metric.to_string(),
            reason: format!(
                "sampling rates differ ({} Hz vs {} Hz)",
                reference.sample_rate(),
                estimate.sample_rate()
            ),
        });
    }
    if reference.num_samples() != estimate.num_samples() {
        return Err(EvalError::MetricError {
            metric: metric.to_string(),
            reason: format!(
                "lengths differ ({} vs {} samples)",
                reference.num_samples(),
                estimate.num_samples()
            ),
        });
    }
    Ok(())
}
