//! WAV decoding for local datasets
//!
//! Integer PCM is scaled to [-1, 1). Float PCM is passed through. Multi-channel
//! audio is downmixed to mono by averaging the channels of each frame.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{invalid_audio, EvalError, Result};

/// Read a WAV file as mono f32 samples, returning the samples and the
/// sampling rate
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let reader = WavReader::open(path).map_err(|e| invalid_audio(path, e))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    if channels == 0 {
        return Err(EvalError::InvalidAudio {
            path: path.to_path_buf(),
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(path, reader, spec.bits_per_sample, spec.sample_format)?;
    Ok((downmix(&interleaved, channels), spec.sample_rate))
}

fn read_samples_as_f32<R: std::io::Read>(
    path: &Path,
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let samples = match sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let scale = match bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8388608.0,
                32 => 2147483648.0,
                _ => {
                    return Err(EvalError::InvalidAudio {
                        path: path.to_path_buf(),
                        reason: format!("{}-bit integer audio is not supported", bits_per_sample),
                        source: None,
                    })
                }
            };
            // hound widens every integer width into i32
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()
        }
    };

    samples.map_err(|e| invalid_audio(path, e))
}

/// Average interleaved frames down to one channel
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
