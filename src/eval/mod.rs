//! Per-model evaluation loop
//!
//! For every selected model split:
//! 1. Build an id → samples map from the model split
//! 2. Walk the `original` split (entry by entry, or in batches)
//! 3. Look up each original id in the map; a missing id aborts the run
//! 4. Zero-pad both arrays to the longer length
//! 5. Skip entries whose padded original is longer than `max_duration`
//! 6. Compute the metric set and accumulate the record
//! 7. Reduce to per-metric means and drop the map

pub mod aggregate;

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

pub use aggregate::{nan_mean, AggregatedMetrics, Aggregator};

use crate::audio::{pad_arrays_to_match, AudioSignal};
use crate::codec::find_codec;
use crate::config::{EvalSettings, Mode};
use crate::dataset::{Batched, Dataset, Entry, SPLIT_ORIGINAL};
use crate::error::{EvalError, Result};
use crate::metrics::{MetricSet, MetricsRecord};

/// Model name to aggregated metrics
pub type EvaluationResults = BTreeMap<String, AggregatedMetrics>;

/// Result of evaluating one model split
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub model: String,
    pub metrics: AggregatedMetrics,
    /// Original entries that produced a metrics record
    pub entries_evaluated: usize,
    /// Original entries dropped for exceeding the duration limit
    pub entries_skipped: usize,
    pub elapsed: Duration,
}

/// Runs the metric set over every selected model of a dataset
pub struct Evaluator<'a, D: Dataset + ?Sized> {
    dataset: &'a D,
    metrics: MetricSet,
    settings: EvalSettings,
}

impl<'a, D: Dataset + ?Sized> Evaluator<'a, D> {
    /// Create an evaluator using the standard metric set
    pub fn new(dataset: &'a D, settings: EvalSettings) -> Self {
        Self {
            dataset,
            metrics: MetricSet::standard(),
            settings,
        }
    }

    /// Replace the metric set
    pub fn with_metrics(mut self, metrics: MetricSet) -> Self {
        self.metrics = metrics;
        self
    }

    /// Model splits that pass the `models` filter, in dataset order
    pub fn selected_models(&self) -> Vec<String> {
        let available = self.dataset.model_splits();

        if let Some(requested) = &self.settings.models {
            for name in requested {
                if !available.contains(name) {
                    warn!("Requested model '{}' is not a split of {}", name, self.dataset.name());
                }
            }
        }

        available
            .into_iter()
            .filter(|model| self.settings.selects(model))
            .collect()
    }

    /// Evaluate every selected model
    pub fn run(&self) -> Result<EvaluationResults> {
        self.run_with(|_| {})
    }

    /// Evaluate every selected model, calling `on_model` after each one
    pub fn run_with(&self, mut on_model: impl FnMut(&ModelOutcome)) -> Result<EvaluationResults> {
        let mut results = EvaluationResults::new();
        for model in self.selected_models() {
            let outcome = self.evaluate_model(&model)?;
            on_model(&outcome);
            results.insert(outcome.model, outcome.metrics);
        }
        Ok(results)
    }

    /// Evaluate one model split against the original split
    pub fn evaluate_model(&self, model: &str) -> Result<ModelOutcome> {
        let start = Instant::now();
        info!("Evaluating metrics for model: {}", model);
        if let Some(codec) = find_codec(model) {
            info!("Model {} is {}", model, codec.describe());
        }

        let id_map = self.build_id_map(model)?;
        let mut aggregator = Aggregator::with_metrics(self.metrics.names());
        let mut skipped = 0;

        // An empty split still walks `original` so decode errors surface
        let compare = !id_map.is_empty();
        if !compare {
            warn!("Model {} has no entries; every metric will be NaN", model);
        }

        let original = self.dataset.split(SPLIT_ORIGINAL)?;
        match self.settings.mode {
            Mode::Streaming => {
                for entry in original {
                    let entry = entry?;
                    if compare {
                        self.accumulate(model, &entry, &id_map, &mut aggregator, &mut skipped)?;
                    }
                }
            }
            Mode::Batch => {
                for (index, batch) in Batched::new(original, self.settings.batch_size).enumerate() {
                    debug!("Model {}: batch {} with {} entries", model, index, batch.len());
                    for entry in batch {
                        let entry = entry?;
                        if compare {
                            self.accumulate(model, &entry, &id_map, &mut aggregator, &mut skipped)?;
                        }
                    }
                }
            }
        }

        // Release the resynthesized audio before the next model is loaded
        drop(id_map);

        Ok(ModelOutcome {
            model: model.to_string(),
            metrics: aggregator.finish(),
            entries_evaluated: aggregator.records(),
            entries_skipped: skipped,
            elapsed: start.elapsed(),
        })
    }

    /// Compare one original entry with its resynthesis.
    ///
    /// Returns `Ok(None)` when the padded original exceeds `max_duration`.
    pub fn compare_entry(
        &self,
        model: &str,
        entry: &Entry,
        id_map: &HashMap<String, Vec<f32>>,
    ) -> Result<Option<MetricsRecord>> {
        let resynth = id_map.get(&entry.id).ok_or_else(|| EvalError::MissingEntry {
            model: model.to_string(),
            id: entry.id.clone(),
        })?;

        let (original, resynth) = pad_arrays_to_match(&entry.samples, resynth);
        let original = AudioSignal::new(original, entry.sampling_rate)?;
        if original.duration() > self.settings.max_duration as f64 {
            debug!(
                "Skipping {} ({:.1}s > {}s)",
                entry.id,
                original.duration(),
                self.settings.max_duration
            );
            return Ok(None);
        }

        let resynth = AudioSignal::new(resynth, entry.sampling_rate)?;
        self.metrics.evaluate(&original, &resynth).map(Some)
    }

    fn build_id_map(&self, model: &str) -> Result<HashMap<String, Vec<f32>>> {
        let mut id_map = HashMap::new();
        for entry in self.dataset.split(model)? {
            let entry = entry?;
            id_map.insert(entry.id, entry.samples);
        }
        debug!("Model {}: {} resynthesized entries", model, id_map.len());
        Ok(id_map)
    }

    fn accumulate(
        &self,
        model: &str,
        entry: &Entry,
        id_map: &HashMap<String, Vec<f32>>,
        aggregator: &mut Aggregator,
        skipped: &mut usize,
    ) -> Result<()> {
        match self.compare_entry(model, entry, id_map)? {
            Some(record) => aggregator.push(&record),
            None => *skipped += 1,
        }
        Ok(())
    }
}
