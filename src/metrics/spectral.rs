//! Multi-scale spectral distances
//!
//! Each scale runs a centered STFT (periodic Hann window, hop of a quarter
//! window, zero padding of half a window on both sides). Per scale the loss is
//!
//! ```text
//! log_weight * L1(log10(clamp(X, eps)^pow), log10(clamp(Y, eps)^pow))
//!   + mag_weight * L1(X, Y)
//! ```
//!
//! and the reported value is the sum over scales.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::audio::AudioSignal;
use crate::error::Result;
use crate::metrics::{check_pair, Metric};

const CLAMP_EPS: f64 = 1e-5;

/// Loss weighting shared by the spectral metrics
#[derive(Debug, Clone, Copy)]
pub struct SpectralWeights {
    pub log_weight: f64,
    pub mag_weight: f64,
    pub pow: f64,
}

impl Default for SpectralWeights {
    fn default() -> Self {
        Self {
            log_weight: 1.0,
            mag_weight: 1.0,
            pow: 2.0,
        }
    }
}

/// Distance between linear STFT magnitudes
#[derive(Debug, Clone)]
pub struct StftDistance {
    pub window_lengths: Vec<usize>,
    pub weights: SpectralWeights,
}

impl Default for StftDistance {
    fn default() -> Self {
        Self {
            window_lengths: vec![2048, 512],
            weights: SpectralWeights::default(),
        }
    }
}

impl Metric for StftDistance {
    fn name(&self) -> &'static str {
        "stft_distance"
    }

    fn compute(&self, reference: &AudioSignal, estimate: &AudioSignal) -> Result<f64> {
        check_pair(self.name(), reference, estimate)?;
        let mut planner = FftPlanner::new();
        let total: f64 = self
            .window_lengths
            .iter()
            .map(|&window_length| {
                let stft = Stft::new(window_length, &mut planner);
                let x = stft.magnitudes(reference.samples());
                let y = stft.magnitudes(estimate.samples());
                spectral_loss(&x, &y, &self.weights)
            })
            .sum();
        Ok(total)
    }
}

/// One mel resolution
#[derive(Debug, Clone, Copy)]
pub struct MelScale {
    pub window_length: usize,
    pub n_mels: usize,
}

/// Distance between mel spectrograms
#[derive(Debug, Clone)]
pub struct MelDistance {
    pub scales: Vec<MelScale>,
    pub weights: SpectralWeights,
}

impl Default for MelDistance {
    fn default() -> Self {
        Self {
            scales: vec![
                MelScale {
                    window_length: 2048,
                    n_mels: 150,
                },
                MelScale {
                    window_length: 512,
                    n_mels: 80,
                },
            ],
            weights: SpectralWeights::default(),
        }
    }
}

impl Metric for MelDistance {
    fn name(&self) -> &'static str {
        "mel_distance"
    }

    fn compute(&self, reference: &AudioSignal, estimate: &AudioSignal) -> Result<f64> {
        check_pair(self.name(), reference, estimate)?;
        let sample_rate = reference.sample_rate();
        let mut planner = FftPlanner::new();
        let total: f64 = self
            .scales
            .iter()
            .map(|scale| {
                let stft = Stft::new(scale.window_length, &mut planner);
                let filters = mel_filterbank(
                    sample_rate,
                    scale.window_length,
                    scale.n_mels,
                    0.0,
                    sample_rate as f64 / 2.0,
                );
                let x = apply_filterbank(&filters, &stft.magnitudes(reference.samples()));
                let y = apply_filterbank(&filters, &stft.magnitudes(estimate.samples()));
                spectral_loss(&x, &y, &self.weights)
            })
            .sum();
        Ok(total)
    }
}

struct Stft {
    window: Vec<f32>,
    hop_length: usize,
    fft: Arc<dyn Fft<f32>>,
}

impl Stft {
    fn new(window_length: usize, planner: &mut FftPlanner<f32>) -> Self {
        Self {
            window: hann_window(window_length),
            hop_length: (window_length / 4).max(1),
            fft: planner.plan_fft_forward(window_length),
        }
    }

    fn n_freq(&self) -> usize {
        self.window.len() / 2 + 1
    }

    /// Magnitude frames, each `n_freq` bins long
    fn magnitudes(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let window_length = self.window.len();
        let pad = window_length / 2;

        let mut padded = vec![0.0f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let n_frames = if padded.len() >= window_length {
            1 + (padded.len() - window_length) / self.hop_length
        } else {
            0
        };

        let mut buffer = vec![Complex::new(0.0f32, 0.0); window_length];
        (0..n_frames)
            .map(|frame| {
                let start = frame * self.hop_length;
                for ((slot, &s), &w) in buffer
                    .iter_mut()
                    .zip(&padded[start..start + window_length])
                    .zip(&self.window)
                {
                    *slot = Complex::new(s * w, 0.0);
                }
                self.fft.process(&mut buffer);
                buffer[..self.n_freq()].iter().map(|c| c.norm()).collect::<Vec<f32>>()
            })
            .collect()
    }
}

/// Periodic Hann window
fn hann_window(length: usize) -> Vec<f32> {
    (0..length)
        .map(|i| {
            let angle = 2.0 * std::f32::consts::PI * i as f32 / length as f32;
            0.5 * (1.0 - angle.cos())
        })
        .collect()
}

fn spectral_loss(x: &[Vec<f32>], y: &[Vec<f32>], weights: &SpectralWeights) -> f64 {
    let mut log_sum = 0.0;
    let mut mag_sum = 0.0;
    let mut count = 0usize;

    for (fx, fy) in x.iter().zip(y) {
        for (&a, &b) in fx.iter().zip(fy) {
            let (a, b) = (a as f64, b as f64);
            let log_a = a.max(CLAMP_EPS).powf(weights.pow).log10();
            let log_b = b.max(CLAMP_EPS).powf(weights.pow).log10();
            log_sum += (log_a - log_b).abs();
            mag_sum += (a - b).abs();
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    weights.log_weight * log_sum / n + weights.mag_weight * mag_sum / n
}

fn hertz_to_mel(freq: f64) -> f64 {
    // Slaney: linear below 1 kHz, logarithmic above
    const MIN_LOG_HZ: f64 = 1000.0;
    const MIN_LOG_MEL: f64 = 15.0;
    let logstep = 6.4f64.ln() / 27.0;

    if freq >= MIN_LOG_HZ {
        MIN_LOG_MEL + (freq / MIN_LOG_HZ).ln() / logstep
    } else {
        3.0 * freq / 200.0
    }
}

fn mel_to_hertz(mels: f64) -> f64 {
    const MIN_LOG_HZ: f64 = 1000.0;
    const MIN_LOG_MEL: f64 = 15.0;
    let logstep = 6.4f64.ln() / 27.0;

    if mels >= MIN_LOG_MEL {
        MIN_LOG_HZ * (logstep * (mels - MIN_LOG_MEL)).exp()
    } else {
        200.0 * mels / 3.0
    }
}

/// Slaney-normalised triangular filters, `n_mels` rows of `n_fft / 2 + 1` bins
pub(crate) fn mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
    fmin: f64,
    fmax: f64,
) -> Vec<Vec<f32>> {
    let n_freq = n_fft / 2 + 1;
    let fft_freqs: Vec<f64> = (0..n_freq)
        .map(|f| f as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    let mel_min = hertz_to_mel(fmin);
    let mel_max = hertz_to_mel(fmax);
    let edges: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hertz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
        .collect();

    (0..n_mels)
        .map(|m| {
            let lower = (edges[m + 1] - edges[m]).max(1e-6);
            let upper = (edges[m + 2] - edges[m + 1]).max(1e-6);
            let enorm = 2.0 / (edges[m + 2] - edges[m]).max(1e-6);
            fft_freqs
                .iter()
                .map(|&f| {
                    let down = (f - edges[m]) / lower;
                    let up = (edges[m + 2] - f) / upper;
                    (down.min(up).max(0.0) * enorm) as f32
                })
                .collect()
        })
        .collect()
}

fn apply_filterbank(filters: &[Vec<f32>], frames: &[Vec<f32>]) -> Vec<Vec<f32>> {
    frames
        .iter()
        .map(|frame| {
            filters
                .iter()
                .map(|filter| filter.iter().zip(frame).map(|(w, m)| w * m).sum::<f32>())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tone(freq: f32, amplitude: f32, rate: u32, len: usize) -> AudioSignal {
        let samples = (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect();
        AudioSignal::new(samples, rate).unwrap()
    }

    #[test]
    fn test_identical_signals_have_zero_distance() {
        let a = tone(440.0, 0.5, 16_000, 8_000);
        assert_relative_eq!(StftDistance::default().compute(&a, &a).unwrap(), 0.0);
        assert_relative_eq!(MelDistance::default().compute(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_grows_with_mismatch() {
        let reference = tone(440.0, 0.5, 16_000, 8_000);
        let close = tone(440.0, 0.45, 16_000, 8_000);
        let far = tone(1_000.0, 0.5, 16_000, 8_000);

        for metric in [&StftDistance::default() as &dyn Metric, &MelDistance::default()] {
            let near = metric.compute(&reference, &close).unwrap();
            let distant = metric.compute(&reference, &far).unwrap();
            assert!(near > 0.0, "{} should be positive", metric.name());
            assert!(distant > near, "{}: {} <= {}", metric.name(), distant, near);
        }
    }

    #[test]
    fn test_frame_count() {
        let mut planner = FftPlanner::new();
        let stft = Stft::new(512, &mut planner);
        // 1000 samples + 512 padding, hop 128
        let frames = stft.magnitudes(&[0.0; 1_000]);
        assert_eq!(frames.len(), 1 + (1_512 - 512) / 128);
        assert!(frames.iter().all(|f| f.len() == 257));
    }

    #[test]
    fn test_short_signal_still_framed() {
        let mut planner = FftPlanner::new();
        let stft = Stft::new(2048, &mut planner);
        assert_eq!(stft.magnitudes(&[]).len(), 1);
    }

    #[test]
    fn test_mel_filterbank_shape() {
        let filters = mel_filterbank(16_000, 512, 80, 0.0, 8_000.0);
        assert_eq!(filters.len(), 80);
        assert!(filters.iter().all(|row| row.len() == 257));
        assert!(filters.iter().flatten().all(|&w| w >= 0.0));
        assert!(filters.iter().filter(|row| row.iter().any(|&w| w > 0.0)).count() > 60);
    }

    #[test]
    fn test_mel_scale_round_trip_points() {
        assert_relative_eq!(hertz_to_mel(1_000.0), 15.0);
        assert_relative_eq!(mel_to_hertz(15.0), 1_000.0);
        assert_relative_eq!(mel_to_hertz(hertz_to_mel(4_000.0)), 4_000.0, epsilon = 1e-9);
    }
}
