//! Datasets stored as directories of WAV files
//!
//! Layout:
//!
//! ```text
//! <data_dir>/<dataset_name>/
//!   original/<id>.wav
//!   <model_a>/<id>.wav
//!   <model_b>/<id>.wav
//! ```
//!
//! Files are found recursively. The entry id is the path relative to the split
//! directory, without extension, using `/` separators.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::audio::read_wav_mono;
use crate::dataset::{Dataset, Entry, EntryIter, SPLIT_ORIGINAL};
use crate::error::{EvalError, Result};

/// Dataset backed by a directory tree
#[derive(Debug, Clone)]
pub struct LocalDataset {
    name: String,
    root: PathBuf,
    streaming: bool,
    splits: Vec<String>,
}

impl LocalDataset {
    /// Open `<data_dir>/<name>`.
    ///
    /// With `streaming` set, each entry is decoded when the iterator reaches
    /// it. Otherwise a split is decoded in full when it is opened.
    pub fn open(data_dir: &Path, name: &str, streaming: bool) -> Result<Self> {
        let root = data_dir.join(name);
        if !root.is_dir() {
            return Err(EvalError::DatasetNotFound { path: root });
        }

        let mut splits = Vec::new();
        for dir_entry in fs::read_dir(&root)? {
            let dir_entry = dir_entry?;
            if dir_entry.file_type()?.is_dir() {
                splits.push(dir_entry.file_name().to_string_lossy().into_owned());
            }
        }
        splits.sort();

        if !splits.iter().any(|s| s == SPLIT_ORIGINAL) {
            return Err(EvalError::MissingOriginalSplit {
                dataset: name.to_string(),
            });
        }

        debug!("Opened dataset {} with splits {:?}", root.display(), splits);

        Ok(Self {
            name: name.to_string(),
            root,
            streaming,
            splits,
        })
    }

    fn split_files(&self, split_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir_entry in WalkDir::new(split_dir).min_depth(1).sort_by_file_name() {
            let dir_entry = dir_entry?;
            if dir_entry.file_type().is_file() && is_wav(dir_entry.path()) {
                files.push(dir_entry.into_path());
            }
        }
        Ok(files)
    }
}

impl Dataset for LocalDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn split_names(&self) -> Vec<String> {
        self.splits.clone()
    }

    fn split(&self, name: &str) -> Result<EntryIter<'_>> {
        if !self.splits.iter().any(|s| s == name) {
            return Err(EvalError::SplitNotFound {
                split: name.to_string(),
            });
        }

        let split_dir = self.root.join(name);
        let files = self.split_files(&split_dir)?;
        debug!("Split {} has {} files", name, files.len());

        if self.streaming {
            Ok(Box::new(
                files
                    .into_iter()
                    .map(move |path| load_entry(&split_dir, &path)),
            ))
        } else {
            let entries = files
                .iter()
                .map(|path| load_entry(&split_dir, path))
                .collect::<Result<Vec<_>>>()?;
            Ok(Box::new(entries.into_iter().map(Ok)))
        }
    }
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

fn entry_id(split_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(split_dir).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn load_entry(split_dir: &Path, path: &Path) -> Result<Entry> {
    let (samples, sampling_rate) = read_wav_mono(path)?;
    Ok(Entry::new(entry_id(split_dir, path), samples, sampling_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::tempdir;

    fn write_wav(path: &Path, samples: &[f32], rate: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let spec = WavSpec {
            channels: 1,
            sample_rate: rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_entry_id_nested() {
        let split = Path::new("/data/ds/original");
        let path = Path::new("/data/ds/original/speaker1/utt3.wav");
        assert_eq!(entry_id(split, path), "speaker1/utt3");
    }

    #[test]
    fn test_is_wav_case_insensitive() {
        assert!(is_wav(Path::new("a.WAV")));
        assert!(!is_wav(Path::new("a.flac")));
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempdir().unwrap();
        let err = LocalDataset::open(dir.path(), "org/none", true).unwrap_err();
        assert_eq!(err.error_code(), "DATASET_NOT_FOUND");
    }

    #[test]
    fn test_missing_original() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ds/model")).unwrap();
        let err = LocalDataset::open(dir.path(), "ds", true).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_ORIGINAL_SPLIT");
    }

    #[test]
    fn test_streaming_and_eager_agree() {
        let dir = tempdir().unwrap();
        let ds = dir.path().join("org/ds");
        write_wav(&ds.join("original/b.wav"), &[0.25, 0.5], 16_000);
        write_wav(&ds.join("original/a.wav"), &[0.1], 16_000);
        write_wav(&ds.join("codec/a.wav"), &[0.1], 16_000);
        fs::write(ds.join("original/notes.txt"), "ignored").unwrap();

        let streamed: Vec<Entry> = LocalDataset::open(dir.path(), "org/ds", true)
            .unwrap()
            .split(SPLIT_ORIGINAL)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let eager: Vec<Entry> = LocalDataset::open(dir.path(), "org/ds", false)
            .unwrap()
            .split(SPLIT_ORIGINAL)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(streamed, eager);
        assert_eq!(streamed.len(), 2);
        assert_eq!(streamed[0].id, "a");
        assert_eq!(streamed[1].samples, vec![0.25, 0.5]);
    }

    #[test]
    fn test_split_listing() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ds/original")).unwrap();
        fs::create_dir_all(dir.path().join("ds/zcodec")).unwrap();
        fs::create_dir_all(dir.path().join("ds/acodec")).unwrap();

        let dataset = LocalDataset::open(dir.path(), "ds", true).unwrap();
        assert_eq!(dataset.model_splits(), vec!["acodec", "zcodec"]);
        assert!(dataset.split("nope").is_err());
    }
}
