//! Dataset access
//!
//! A dataset exposes named splits. The `original` split holds the reference
//! audio and every other split holds one model's resynthesis of it, joined
//! to the reference by entry id.

mod batch;
mod local;
mod memory;

pub use batch::Batched;
pub use local::LocalDataset;
pub use memory::MemoryDataset;

use crate::error::Result;

/// Name of the reference split
pub const SPLIT_ORIGINAL: &str = "original";

/// One (identifier, audio array, sampling rate) record
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: String,
    pub samples: Vec<f32>,
    pub sampling_rate: u32,
}

impl Entry {
    pub fn new(id: impl Into<String>, samples: Vec<f32>, sampling_rate: u32) -> Self {
        Self {
            id: id.into(),
            samples,
            sampling_rate,
        }
    }
}

/// Iterator over the entries of one split
pub type EntryIter<'a> = Box<dyn Iterator<Item = Result<Entry>> + 'a>;

/// Source of named splits
pub trait Dataset {
    /// Dataset name as given by the caller
    fn name(&self) -> &str;

    /// All split names, in a stable order
    fn split_names(&self) -> Vec<String>;

    /// Open a split for a single ordered pass
    fn split(&self, name: &str) -> Result<EntryIter<'_>>;

    /// Every split except `original`
    fn model_splits(&self) -> Vec<String> {
        self.split_names()
            .into_iter()
            .filter(|name| name != SPLIT_ORIGINAL)
            .collect()
    }
}
