//! Metrics collector implementation

use crate::{BatchStats, Histogram, BATCH_SIZE, EVICTIONS};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Thread-safe metrics storage
///
/// Readers on other threads may poll counters while a run is in progress.
pub struct Metrics {
    /// Histogram metrics
    histograms: RwLock<HashMap<String, Arc<Histogram>>>,
    /// Counter metrics for event counting
    counters: RwLock<HashMap<String, Arc<AtomicU64>>>,
    /// Gauge metrics for current values
    gauges: RwLock<HashMap<String, Arc<AtomicI64>>>,
}

impl Metrics {
    /// Create a new metrics store
    pub fn new() -> Self {
        Self {
            histograms: RwLock::new(HashMap::new()),
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
        }
    }

    /// Record a histogram observation
    pub fn histogram(&self, name: &str, value: u64) {
        let histograms = self.histograms.read();
        if let Some(h) = histograms.get(name) {
            h.observe(value);
            return;
        }
        drop(histograms);

        let mut histograms = self.histograms.write();
        let h = histograms
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Histogram::new()));
        h.observe(value);
    }

    /// Increment a counter
    pub fn counter(&self, name: &str, delta: u64) {
        let counters = self.counters.read();
        if let Some(c) = counters.get(name) {
            c.fetch_add(delta, Ordering::Relaxed);
            return;
        }
        drop(counters);

        let mut counters = self.counters.write();
        let c = counters
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicU64::new(0)));
        c.fetch_add(delta, Ordering::Relaxed);
    }

    /// Set a gauge value
    pub fn gauge(&self, name: &str, value: i64) {
        let gauges = self.gauges.read();
        if let Some(g) = gauges.get(name) {
            g.store(value, Ordering::Relaxed);
            return;
        }
        drop(gauges);

        let mut gauges = self.gauges.write();
        let g = gauges
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicI64::new(0)));
        g.store(value, Ordering::Relaxed);
    }

    /// Get a histogram by name
    pub fn get_histogram(&self, name: &str) -> Option<Arc<Histogram>> {
        self.histograms.read().get(name).cloned()
    }

    /// Get counter value
    pub fn get_counter(&self, name: &str) -> Option<u64> {
        self.counters
            .read()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
    }

    /// Get gauge value
    pub fn get_gauge(&self, name: &str) -> Option<i64> {
        self.gauges
            .read()
            .get(name)
            .map(|g| g.load(Ordering::Relaxed))
    }

    /// Get all counter names and values
    pub fn all_counters(&self) -> Vec<(String, u64)> {
        self.counters
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect()
    }

    /// Get all gauge names and values
    pub fn all_gauges(&self) -> Vec<(String, i64)> {
        self.gauges
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
            .collect()
    }

    /// Get all histograms by name
    pub fn all_histograms(&self) -> Vec<(String, Arc<Histogram>)> {
        self.histograms
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates completed batch sizes for one scheduler run
///
/// Keeps the exact ordered sequence of sizes alongside the shared
/// counter/gauge store.
pub struct MetricsCollector {
    batches: BatchStats,
    metrics: Arc<Metrics>,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(Metrics::new()))
    }

    /// Create a collector that reports into an existing metrics store
    pub fn with_metrics(metrics: Arc<Metrics>) -> Self {
        Self {
            batches: BatchStats::new(),
            metrics,
        }
    }

    /// Record the size of an evicted batch
    pub fn record_batch(&mut self, size: usize) {
        self.batches.record(size);
        self.metrics.counter(EVICTIONS, 1);
        self.metrics.histogram(BATCH_SIZE, size as u64);
        tracing::trace!(size, recorded = self.batches.len(), "batch recorded");
    }

    /// Ordered statistics over recorded batches
    pub fn batches(&self) -> &BatchStats {
        &self.batches
    }

    /// Take the recorded batches, leaving the collector empty
    pub fn take_batches(&mut self) -> BatchStats {
        std::mem::take(&mut self.batches)
    }

    /// Get a reference to the metrics store
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get a clone of the metrics Arc for sharing
    pub fn shared(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
