//! Metrics export and snapshot functionality

use crate::{BatchStats, Metrics, MetricsCollector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a run's metrics at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Number of completed batches
    pub batch_count: usize,
    /// Mean completed batch size
    pub mean: f64,
    /// Sample standard deviation of completed batch sizes
    pub std_dev: f64,
    /// Smallest completed batch
    pub min: Option<usize>,
    /// Largest completed batch
    pub max: Option<usize>,
    /// Counter values
    pub counters: BTreeMap<String, u64>,
    /// Gauge values
    pub gauges: BTreeMap<String, i64>,
    /// Histogram summaries
    pub histograms: BTreeMap<String, HistogramSummary>,
}

/// Summary of a histogram
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Mean value
    pub mean: f64,
    /// Total observation count
    pub count: u64,
    /// `(upper bound, count)` per bucket
    pub buckets: Vec<(u64, u64)>,
    /// Observations above the last bound
    pub overflow: u64,
}

impl MetricsSnapshot {
    /// Create a snapshot from batch statistics and a metrics store
    pub fn new(batches: &BatchStats, metrics: &Metrics) -> Self {
        let counters = metrics.all_counters().into_iter().collect();
        let gauges = metrics.all_gauges().into_iter().collect();
        let histograms = metrics
            .all_histograms()
            .into_iter()
            .map(|(name, h)| {
                let summary = HistogramSummary {
                    mean: h.mean(),
                    count: h.total_count(),
                    buckets: h.bucket_counts(),
                    overflow: h.overflow_count(),
                };
                (name, summary)
            })
            .collect();

        Self {
            batch_count: batches.len(),
            mean: batches.mean(),
            std_dev: batches.std_dev(),
            min: batches.min(),
            max: batches.max(),
            counters,
            gauges,
            histograms,
        }
    }

    /// Create a snapshot from a collector
    pub fn from_collector(collector: &MetricsCollector) -> Self {
        Self::new(collector.batches(), collector.metrics())
    }

    /// Export snapshot as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export snapshot as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EVICTIONS, TRANSACTIONS_EXAMINED};

    #[test]
    fn test_snapshot_json() {
        let mut collector = MetricsCollector::new();
        collector.record_batch(4);
        collector.record_batch(6);
        collector.metrics().counter(TRANSACTIONS_EXAMINED, 12);
        collector.metrics().gauge("stations_active", 3);

        let snapshot = MetricsSnapshot::from_collector(&collector);
        assert_eq!(snapshot.batch_count, 2);
        assert_eq!(snapshot.mean, 5.0);
        assert_eq!(snapshot.counters.get(EVICTIONS), Some(&2));

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("transactions_examined"));
        assert!(json.contains("12"));
        assert!(json.contains("stations_active"));
        assert!(json.contains("batch_size"));
    }

    #[test]
    fn test_snapshot_roundtrips_through_serde() {
        let collector = MetricsCollector::new();
        let snapshot = MetricsSnapshot::from_collector(&collector);
        let json = snapshot.to_json_compact().unwrap();
        let back: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.batch_count, 0);
        assert_eq!(back.min, None);
    }
}
