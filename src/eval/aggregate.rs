//! Reduction of per-entry records to per-model means

use std::collections::BTreeMap;

use crate::metrics::MetricsRecord;

/// Metric name to mean value for one model
pub type AggregatedMetrics = BTreeMap<String, f64>;

/// Mean of the non-NaN values; NaN when there are none
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Collects metric values across entries, grouped by metric name
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    values: BTreeMap<String, Vec<f64>>,
    records: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an empty list for each name so they are reported even if no
    /// record arrives
    pub fn with_metrics<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            values: names
                .into_iter()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
            records: 0,
        }
    }

    pub fn push(&mut self, record: &MetricsRecord) {
        for (name, &value) in record {
            self.values.entry(name.clone()).or_default().push(value);
        }
        self.records += 1;
    }

    /// Number of records pushed
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn finish(&self) -> AggregatedMetrics {
        self.values
            .iter()
            .map(|(name, values)| (name.clone(), nan_mean(values)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(pairs: &[(&str, f64)]) -> MetricsRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_nan_mean() {
        assert_relative_eq!(nan_mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_relative_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean(&[]).is_nan());
        assert!(nan_mean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_single_record_verbatim() {
        let r = record(&[("sisdr", 12.5), ("waveform_distance", 0.25)]);
        let mut agg = Aggregator::new();
        agg.push(&r);
        assert_eq!(agg.finish(), r);
    }

    #[test]
    fn test_order_independent() {
        let records = vec![
            record(&[("a", 0.1), ("b", 10.0)]),
            record(&[("a", 0.7), ("b", -3.0)]),
            record(&[("a", 2.2), ("b", 4.5)]),
        ];

        let mut forward = Aggregator::new();
        records.iter().for_each(|r| forward.push(r));
        let mut backward = Aggregator::new();
        records.iter().rev().for_each(|r| backward.push(r));

        let (f, b) = (forward.finish(), backward.finish());
        for key in ["a", "b"] {
            assert_relative_eq!(f[key], b[key], epsilon = 1e-12);
        }
        assert_eq!(forward.records(), 3);
    }

    #[test]
    fn test_seeded_metrics_report_nan() {
        let agg = Aggregator::with_metrics(["mel_distance", "sisdr"]);
        let result = agg.finish();
        assert_eq!(result.len(), 2);
        assert!(result.values().all(|v| v.is_nan()));
    }
}
