//! Time-domain metrics

use crate::audio::AudioSignal;
use crate::error::Result;
use crate::metrics::{check_pair, Metric};

/// Mean absolute difference between samples
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveformDistance;

impl Metric for WaveformDistance {
    fn name(&self) -> &'static str {
        "waveform_distance"
    }

    fn compute(&self, reference: &AudioSignal, estimate: &AudioSignal) -> Result<f64> {
        check_pair(self.name(), reference, estimate)?;
        if reference.is_empty() {
            return Ok(0.0);
        }
        let sum: f64 = reference
            .samples()
            .iter()
            .zip(estimate.samples())
            .map(|(&r, &e)| (r as f64 - e as f64).abs())
            .sum();
        Ok(sum / reference.num_samples() as f64)
    }
}

/// Scale-invariant signal-to-distortion ratio in dB (higher is better)
#[derive(Debug, Clone, Copy)]
pub struct SiSdr {
    /// Remove the mean of both signals before projecting
    pub zero_mean: bool,
    pub eps: f64,
}

impl Default for SiSdr {
    fn default() -> Self {
        Self {
            zero_mean: true,
            eps: 1e-8,
        }
    }
}

impl Metric for SiSdr {
    fn name(&self) -> &'static str {
        "sisdr"
    }

    fn compute(&self, reference: &AudioSignal, estimate: &AudioSignal) -> Result<f64> {
        check_pair(self.name(), reference, estimate)?;

        let (ref_mean, est_mean) = if self.zero_mean {
            (mean(reference.samples()), mean(estimate.samples()))
        } else {
            (0.0, 0.0)
        };

        let mut dot = 0.0;
        let mut ref_energy = 0.0;
        for (&r, &e) in reference.samples().iter().zip(estimate.samples()) {
            let r = r as f64 - ref_mean;
            let e = e as f64 - est_mean;
            dot += r * e;
            ref_energy += r * r;
        }

        // Optimal scaling of the reference onto the estimate
        let alpha = (dot + self.eps) / (ref_energy + self.eps);

        let mut target_energy = 0.0;
        let mut residual_energy = 0.0;
        for (&r, &e) in reference.samples().iter().zip(estimate.samples()) {
            let target = alpha * (r as f64 - ref_mean);
            let residual = (e as f64 - est_mean) - target;
            target_energy += target * target;
            residual_energy += residual * residual;
        }

        Ok(10.0 * ((target_energy + self.eps) / (residual_energy + self.eps)).log10())
    }
}

fn mean(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64
}
