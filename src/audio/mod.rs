//! Audio representation for evaluation
//!
//! Mono signals at a fixed sampling rate, length equalisation, and WAV
//! decoding for local datasets.

mod io;
mod padding;
mod signal;

pub use io::read_wav_mono;
pub use padding::pad_arrays_to_match;
pub use signal::AudioSignal;
