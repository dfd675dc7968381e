//! Workload selection from configuration files

use crate::cyclic::CyclicGenerator;
use crate::error::WorkloadResult;
use crate::hot_cold::{HotColdGenerator, HotColdParams};
use crate::replay::ReplayGenerator;
use keybatch_scheduler::KeySetGenerator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Transaction source configuration
///
/// ```toml
/// [workload]
/// kind = "hot-cold"
/// hot_keys = 1000
/// total_keys = 1000000
/// hot_probability = 0.2
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WorkloadConfig {
    /// [`HotColdGenerator`]
    HotCold(HotColdParams),
    /// [`CyclicGenerator`]
    Cyclic {
        /// Transactions in one cycle
        transactions: Vec<Vec<u64>>,
        /// Key domain size
        domain: u64,
    },
    /// [`ReplayGenerator`]
    Replay {
        /// Trace file
        path: PathBuf,
        /// Key domain size; derived from the trace when absent
        #[serde(default)]
        domain: Option<u64>,
    },
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig::HotCold(HotColdParams::default())
    }
}

impl WorkloadConfig {
    /// Short name of the source kind
    pub fn kind(&self) -> &'static str {
        match self {
            WorkloadConfig::HotCold(_) => "hot-cold",
            WorkloadConfig::Cyclic { .. } => "cyclic",
            WorkloadConfig::Replay { .. } => "replay",
        }
    }

    /// Instantiate the source
    ///
    /// `seed` only affects random sources.
    pub fn build(
        &self,
        transaction_size: usize,
        seed: u64,
    ) -> WorkloadResult<Box<dyn KeySetGenerator>> {
        let generator: Box<dyn KeySetGenerator> = match self {
            WorkloadConfig::HotCold(params) => Box::new(HotColdGenerator::new(
                params.clone(),
                transaction_size,
                seed,
            )?),
            WorkloadConfig::Cyclic {
                transactions,
                domain,
            } => Box::new(CyclicGenerator::new(
                transactions.clone(),
                transaction_size,
                *domain,
            )?),
            WorkloadConfig::Replay { path, domain } => Box::new(ReplayGenerator::from_file(
                path,
                transaction_size,
                *domain,
            )?),
        };
        Ok(generator)
    }
}
