//! Codec variant configuration
//!
//! A variant selects a codec model, sets its target bandwidth and records the
//! setting label and sampling rate used to name its resynthesis split.
//! Inference is not part of this crate; dataset splits are expected to be
//! named after the `setting` label of the variant that produced them.

/// Codec model families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFamily {
    Encodec,
}

impl CodecFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecFamily::Encodec => "encodec",
        }
    }
}

/// One named codec configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CodecConfig {
    pub family: CodecFamily,
    /// Pretrained model constructor to select
    pub model: &'static str,
    pub target_bandwidth_kbps: f32,
    /// Label used as the resynthesis split name
    pub setting: &'static str,
    pub sampling_rate: u32,
}

impl CodecConfig {
    const fn encodec(
        model: &'static str,
        target_bandwidth_kbps: f32,
        setting: &'static str,
        sampling_rate: u32,
    ) -> Self {
        Self {
            family: CodecFamily::Encodec,
            model,
            target_bandwidth_kbps,
            setting,
            sampling_rate,
        }
    }

    /// Human readable one-liner
    pub fn describe(&self) -> String {
        format!(
            "{} {} at {} kbps ({} Hz)",
            self.family.as_str(),
            self.model,
            self.target_bandwidth_kbps,
            self.sampling_rate
        )
    }
}

const KNOWN_CODECS: &[CodecConfig] = &[
    CodecConfig::encodec("encodec_model_24khz", 1.5, "encodec_24khz_1.5", 24_000),
    CodecConfig::encodec("encodec_model_24khz", 3.0, "encodec_24khz_3", 24_000),
    CodecConfig::encodec("encodec_model_24khz", 6.0, "encodec_24khz_6", 24_000),
    CodecConfig::encodec("encodec_model_24khz", 12.0, "encodec_24khz_12", 24_000),
    CodecConfig::encodec("encodec_model_24khz", 24.0, "encodec_24khz_24", 24_000),
    CodecConfig::encodec("encodec_model_48khz", 3.0, "encodec_48khz_3", 48_000),
    CodecConfig::encodec("encodec_model_48khz", 6.0, "encodec_48khz_6", 48_000),
    CodecConfig::encodec("encodec_model_48khz", 12.0, "encodec_48khz_12", 48_000),
    CodecConfig::encodec("encodec_model_48khz", 24.0, "encodec_48khz_24", 48_000),
];

/// All codec variants this crate knows about
pub fn known_codecs() -> &'static [CodecConfig] {
    KNOWN_CODECS
}

/// Look up a variant by setting label
pub fn find_codec(setting: &str) -> Option<&'static CodecConfig> {
    KNOWN_CODECS.iter().find(|c| c.setting == setting)
}
