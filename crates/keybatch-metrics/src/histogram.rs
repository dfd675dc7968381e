//! Histogram over completed batch sizes

use std::sync::atomic::{AtomicU64, Ordering};

/// Histogram for tracking the distribution of batch sizes
///
/// Bucket `i` counts observations `<= buckets[i]` that did not fit an
/// earlier bucket. Values above the last boundary land in a separate
/// overflow bucket.
pub struct Histogram {
    /// Inclusive upper bounds, ascending
    buckets: Vec<u64>,
    /// Counts per bucket
    counts: Vec<AtomicU64>,
    /// Observations above the last boundary
    overflow: AtomicU64,
    /// Sum of all values
    sum: AtomicU64,
    /// Total count
    count: AtomicU64,
}

impl Histogram {
    /// Create histogram with default buckets
    pub fn new() -> Self {
        Self::with_buckets(vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024])
    }

    /// Create histogram with custom buckets
    ///
    /// Boundaries are sorted and deduplicated.
    pub fn with_buckets(mut buckets: Vec<u64>) -> Self {
        buckets.sort_unstable();
        buckets.dedup();
        let counts = buckets.iter().map(|_| AtomicU64::new(0)).collect();
        Histogram {
            buckets,
            counts,
            overflow: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a value
    pub fn observe(&self, value: u64) {
        self.sum.fetch_add(value, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        match self.buckets.iter().position(|boundary| value <= *boundary) {
            Some(i) => {
                self.counts[i].fetch_add(1, Ordering::Relaxed);
            }
            None => {
                self.overflow.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Get mean value
    pub fn mean(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.sum.load(Ordering::Relaxed) as f64 / count as f64
    }

    /// Get total count
    pub fn total_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Bucket boundaries paired with their counts
    pub fn bucket_counts(&self) -> Vec<(u64, u64)> {
        self.buckets
            .iter()
            .zip(self.counts.iter())
            .map(|(b, c)| (*b, c.load(Ordering::Relaxed)))
            .collect()
    }

    /// Observations above the last boundary
    pub fn overflow_count(&self) -> u64 {
        self.overflow.load(Ordering::Relaxed)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_into_buckets() {
        let h = Histogram::with_buckets(vec![1, 4, 16]);
        h.observe(1);
        h.observe(3);
        h.observe(4);
        h.observe(10);

        assert_eq!(h.bucket_counts(), vec![(1, 1), (4, 2), (16, 1)]);
        assert_eq!(h.overflow_count(), 0);
        assert_eq!(h.total_count(), 4);
    }

    #[test]
    fn test_overflow_bucket() {
        let h = Histogram::with_buckets(vec![2]);
        h.observe(3);
        h.observe(100);

        assert_eq!(h.bucket_counts(), vec![(2, 0)]);
        assert_eq!(h.overflow_count(), 2);
    }

    #[test]
    fn test_mean() {
        let h = Histogram::new();
        assert_eq!(h.mean(), 0.0);
        h.observe(2);
        h.observe(4);
        assert_eq!(h.mean(), 3.0);
    }

    #[test]
    fn test_unsorted_boundaries() {
        let h = Histogram::with_buckets(vec![8, 2, 2, 4]);
        let bounds: Vec<u64> = h.bucket_counts().into_iter().map(|(b, _)| b).collect();
        assert_eq!(bounds, vec![2, 4, 8]);
    }
}
