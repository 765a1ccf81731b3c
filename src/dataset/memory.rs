//! In-memory dataset

use crate::dataset::{Dataset, Entry, EntryIter};
use crate::error::{EvalError, Result};

/// Dataset whose splits are held in memory, in insertion order
#[derive(Clone, Debug, Default)]
pub struct MemoryDataset {
    name: String,
    splits: Vec<(String, Vec<Entry>)>,
}

impl MemoryDataset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            splits: Vec::new(),
        }
    }

    /// Add a split, replacing any existing split of the same name
    pub fn with_split(mut self, name: impl Into<String>, entries: Vec<Entry>) -> Self {
        let name = name.into();
        match self.splits.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = entries,
            None => self.splits.push((name, entries)),
        }
        self
    }
}

impl Dataset for MemoryDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn split_names(&self) -> Vec<String> {
        self.splits.iter().map(|(name, _)| name.clone()).collect()
    }

    fn split(&self, name: &str) -> Result<EntryIter<'_>> {
        let (_, entries) = self
            .splits
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| EvalError::SplitNotFound {
                split: name.to_string(),
            })?;
        Ok(Box::new(entries.iter().cloned().map(Ok)))
    }
}
