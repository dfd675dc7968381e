//! Random keys with a hot subset
//!
//! Each key is drawn independently: with probability `hot_probability` from
//! the hot range `[0, hot_keys)`, otherwise uniformly from the whole domain
//! `[0, total_keys)`. Cold draws can land in the hot range too.

use crate::error::{WorkloadError, WorkloadResult};
use keybatch_scheduler::{KeyDomain, KeyId, KeySetGenerator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hot/cold distribution parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotColdParams {
    /// Size of the hot subset
    #[serde(default = "default_hot_keys")]
    pub hot_keys: u64,
    /// Size of the whole key domain
    #[serde(default = "default_total_keys")]
    pub total_keys: u64,
    /// Chance that a single draw targets the hot subset
    #[serde(default = "default_hot_probability")]
    pub hot_probability: f64,
}

fn default_hot_keys() -> u64 {
    1_000
}

fn default_total_keys() -> u64 {
    1_000_000
}

fn default_hot_probability() -> f64 {
    0.2
}

impl Default for HotColdParams {
    fn default() -> Self {
        Self {
            hot_keys: default_hot_keys(),
            total_keys: default_total_keys(),
            hot_probability: default_hot_probability(),
        }
    }
}

impl HotColdParams {
    /// Check ranges
    pub fn validate(&self) -> WorkloadResult<()> {
        if self.total_keys == 0 {
            return Err(WorkloadError::InvalidParameter(
                "total_keys must be at least 1".into(),
            ));
        }
        if self.hot_keys > self.total_keys {
            return Err(WorkloadError::InvalidParameter(format!(
                "hot_keys ({}) exceeds total_keys ({})",
                self.hot_keys, self.total_keys
            )));
        }
        if !(0.0..=1.0).contains(&self.hot_probability) {
            return Err(WorkloadError::InvalidParameter(format!(
                "hot_probability {} not in [0, 1]",
                self.hot_probability
            )));
        }
        if self.hot_keys == 0 && self.hot_probability > 0.0 {
            return Err(WorkloadError::InvalidParameter(
                "hot_probability is positive but the hot subset is empty".into(),
            ));
        }
        Ok(())
    }
}

/// Seeded hot/cold key generator
#[derive(Clone, Debug)]
pub struct HotColdGenerator {
    params: HotColdParams,
    transaction_size: usize,
    rng: StdRng,
}

impl HotColdGenerator {
    /// Create a generator producing `transaction_size` keys per transaction
    pub fn new(params: HotColdParams, transaction_size: usize, seed: u64) -> WorkloadResult<Self> {
        params.validate()?;
        if transaction_size == 0 {
            return Err(WorkloadError::InvalidParameter(
                "transaction_size must be at least 1".into(),
            ));
        }

        tracing::debug!(
            "Hot/cold generator: {} hot of {} keys, p={}, seed {}",
            params.hot_keys,
            params.total_keys,
            params.hot_probability,
            seed
        );

        Ok(Self {
            params,
            transaction_size,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Distribution parameters
    pub fn params(&self) -> &HotColdParams {
        &self.params
    }

    fn draw(&mut self) -> KeyId {
        let hot = self.params.hot_keys > 0 && self.rng.gen_bool(self.params.hot_probability);
        let bound = if hot {
            self.params.hot_keys
        } else {
            self.params.total_keys
        };
        KeyId::new(self.rng.gen_range(0..bound))
    }
}

impl KeySetGenerator for HotColdGenerator {
    fn domain(&self) -> KeyDomain {
        KeyDomain::new(self.params.total_keys)
    }

    fn next_keys(&mut self) -> Option<Vec<KeyId>> {
        Some((0..self.transaction_size).map(|_| self.draw()).collect())
    }
}
