//! Local Dataset Tests
//!
//! Runs the full command path over WAV datasets on disk.

use std::fs;
use std::path::Path;

use audiodec_eval::cli::commands;
use audiodec_eval::config::{EvalSettings, Mode};
use hound::{SampleFormat, WavSpec, WavWriter};
use serde_json::Value;
use tempfile::tempdir;

fn write_tone(path: &Path, frequency: f32, amplitude: f32, sample_rate: u32, len: usize) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for i in 0..len {
        let t = i as f32 / sample_rate as f32;
        let s = amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin();
        writer.write_sample((s * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// org/bench with three originals and two codec splits
fn build_dataset(root: &Path) {
    let ds = root.join("org/bench");
    for (i, freq) in [220.0, 440.0, 660.0].iter().enumerate() {
        let name = format!("utt{}.wav", i);
        write_tone(&ds.join("original").join(&name), *freq, 0.5, 16_000, 8_000);
        write_tone(&ds.join("encodec_24khz_6").join(&name), *freq, 0.45, 16_000, 7_800);
        write_tone(&ds.join("other_codec").join(&name), *freq * 2.0, 0.3, 16_000, 8_200);
    }
}

fn read_results(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_streaming_run_writes_all_models() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    build_dataset(data.path());

    let path = commands::evaluate(data.path(), "org/bench", EvalSettings::default(), out.path()).unwrap();

    assert_eq!(path, out.path().join("org_bench_evaluation_results.json"));
    let results = read_results(&path);
    let models = results.as_object().unwrap();
    assert_eq!(models.len(), 2);
    for model in ["encodec_24khz_6", "other_codec"] {
        let metrics = models[model].as_object().unwrap();
        for name in ["mel_distance", "stft_distance", "waveform_distance", "sisdr"] {
            assert!(metrics[name].is_f64(), "{}.{} should be a number", model, name);
        }
    }
    assert!(
        results["encodec_24khz_6"]["sisdr"].as_f64().unwrap()
            > results["other_codec"]["sisdr"].as_f64().unwrap()
    );
}

#[test]
fn test_batch_run_matches_streaming() {
    let data = tempdir().unwrap();
    build_dataset(data.path());

    let streaming_out = tempdir().unwrap();
    let batch_out = tempdir().unwrap();

    let streaming = commands::evaluate(
        data.path(),
        "org/bench",
        EvalSettings::default(),
        streaming_out.path(),
    )
    .unwrap();
    let batch = commands::evaluate(
        data.path(),
        "org/bench",
        EvalSettings {
            mode: Mode::Batch,
            batch_size: 2,
            ..Default::default()
        },
        batch_out.path(),
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(streaming).unwrap(),
        fs::read_to_string(batch).unwrap()
    );
}

#[test]
fn test_model_subset_and_empty_split() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    build_dataset(data.path());
    fs::create_dir_all(data.path().join("org/bench/untrained")).unwrap();

    let settings = EvalSettings {
        models: Some(vec!["untrained".to_string(), "other_codec".to_string()]),
        ..Default::default()
    };
    let path = commands::evaluate(data.path(), "org/bench", settings, out.path()).unwrap();
    let results = read_results(&path);
    let models = results.as_object().unwrap();

    assert_eq!(models.len(), 2);
    assert!(!models.contains_key("encodec_24khz_6"));
    assert!(models["untrained"]
        .as_object()
        .unwrap()
        .values()
        .all(Value::is_null));
}

#[test]
fn test_unknown_dataset_fails() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();

    let err = commands::evaluate(data.path(), "org/missing", EvalSettings::default(), out.path())
        .unwrap_err();
    assert_eq!(err.error_code(), "DATASET_NOT_FOUND");
    assert!(fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn test_missing_resynthesis_writes_nothing() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    build_dataset(data.path());
    fs::remove_file(data.path().join("org/bench/other_codec/utt1.wav")).unwrap();

    let err = commands::evaluate(data.path(), "org/bench", EvalSettings::default(), out.path())
        .unwrap_err();
    assert_eq!(err.error_code(), "MISSING_ENTRY");
    assert!(fs::read_dir(out.path()).unwrap().next().is_none());
}

#[test]
fn test_unreadable_original_fails_with_empty_split() {
    for mode in [Mode::Streaming, Mode::Batch] {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        let ds = data.path().join("ds");
        fs::create_dir_all(ds.join("original")).unwrap();
        fs::create_dir_all(ds.join("empty_model")).unwrap();
        fs::write(ds.join("original/a.wav"), b"garbage").unwrap();

        let settings = EvalSettings {
            mode,
            ..Default::default()
        };
        let err = commands::evaluate(data.path(), "ds", settings, out.path()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_AUDIO", "{:?}", mode);
        assert!(fs::read_dir(out.path()).unwrap().next().is_none());
    }
}
