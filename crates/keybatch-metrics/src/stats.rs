//! Summary statistics over the ordered sequence of completed batch sizes

use serde::{Deserialize, Serialize};

/// Ordered record of completed batch sizes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    sizes: Vec<usize>,
}

impl BatchStats {
    /// Create an empty record
    pub fn new() -> Self {
        Self { sizes: Vec::new() }
    }

    /// Create a record with room for `n` batches
    pub fn with_capacity(n: usize) -> Self {
        Self {
            sizes: Vec::with_capacity(n),
        }
    }

    /// Append a completed batch size
    pub fn record(&mut self, size: usize) {
        self.sizes.push(size);
    }

    /// Recorded sizes in eviction order
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Consume the record, returning the sizes
    pub fn into_sizes(self) -> Vec<usize> {
        self.sizes
    }

    /// Number of recorded batches
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of all recorded sizes
    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Arithmetic mean, 0.0 when empty
    pub fn mean(&self) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        self.total() as f64 / self.sizes.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator)
    ///
    /// Fewer than two samples yield 0.0.
    pub fn std_dev(&self) -> f64 {
        let n = self.sizes.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let sq: f64 = self
            .sizes
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum();
        (sq / (n - 1) as f64).sqrt()
    }

    /// Smallest recorded size
    pub fn min(&self) -> Option<usize> {
        self.sizes.iter().copied().min()
    }

    /// Largest recorded size
    pub fn max(&self) -> Option<usize> {
        self.sizes.iter().copied().max()
    }
}

impl From<Vec<usize>> for BatchStats {
    fn from(sizes: Vec<usize>) -> Self {
        Self { sizes }
    }
}
