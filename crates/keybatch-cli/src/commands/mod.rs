//! Subcommands

pub mod run;
pub mod sweep;

use crate::{config::Config, CliError};
use clap::Args;
use keybatch_scheduler::{BatchScheduler, FinalFlush, PolicyKind, RunReport};
use keybatch_workload::{HotColdParams, WorkloadConfig};
use std::path::PathBuf;

/// Flags shared by every scheduling command; each overrides the config file
#[derive(Debug, Clone, Default, Args)]
pub struct ScheduleArgs {
    /// Number of stations
    #[arg(long)]
    pub stations: Option<usize>,

    /// Keys per transaction
    #[arg(long)]
    pub txn_size: Option<usize>,

    /// Completed batches to record
    #[arg(long)]
    pub batches: Option<usize>,

    /// Transactions examined per eviction before giving up
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Eviction policy (least-count, most-count, oldest, largest-key-set, random)
    #[arg(long)]
    pub policy: Option<PolicyKind>,

    /// Seed for random workloads and the random policy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verify station disjointness after the run
    #[arg(long)]
    pub audit: bool,

    /// Report still-accumulating stations separately at the end
    #[arg(long)]
    pub drain: bool,

    /// Size of the hot key subset
    #[arg(long)]
    pub hot_keys: Option<u64>,

    /// Size of the key domain
    #[arg(long)]
    pub total_keys: Option<u64>,

    /// Chance that a key is drawn from the hot subset
    #[arg(long)]
    pub hot_probability: Option<f64>,

    /// Replay transactions from a trace file instead of generating them
    #[arg(long, conflicts_with_all = ["hot_keys", "total_keys", "hot_probability"])]
    pub trace: Option<PathBuf>,
}

impl ScheduleArgs {
    /// Apply the flags on top of `config`
    pub fn apply(&self, config: &mut Config) {
        let scheduler = &mut config.scheduler;
        if let Some(n) = self.stations {
            scheduler.station_count = n;
        }
        if let Some(t) = self.txn_size {
            scheduler.transaction_size = t;
        }
        if let Some(m) = self.batches {
            scheduler.batch_count = m;
        }
        if let Some(max) = self.max_attempts {
            scheduler.max_attempts = max;
        }
        if self.audit {
            scheduler.audit = true;
        }
        if self.drain {
            scheduler.final_flush = FinalFlush::Drain;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        if let Some(path) = &self.trace {
            config.workload = WorkloadConfig::Replay {
                path: path.clone(),
                domain: None,
            };
        } else if self.hot_keys.is_some()
            || self.total_keys.is_some()
            || self.hot_probability.is_some()
        {
            let mut params = match &config.workload {
                WorkloadConfig::HotCold(params) => params.clone(),
                _ => HotColdParams::default(),
            };
            if let Some(hot) = self.hot_keys {
                params.hot_keys = hot;
            }
            if let Some(total) = self.total_keys {
                params.total_keys = total;
            }
            if let Some(p) = self.hot_probability {
                params.hot_probability = p;
            }
            config.workload = WorkloadConfig::HotCold(params);
        }
    }
}

/// Build a fresh scheduler and source from `config` and run it once
pub fn run_once(config: &Config) -> Result<(RunReport, BatchScheduler), CliError> {
    let mut source = config
        .workload
        .build(config.scheduler.transaction_size, config.seed)?;
    let mut scheduler =
        BatchScheduler::with_policy(config.scheduler.clone(), config.policy.build(config.seed))?;

    tracing::info!(
        "Workload {} with seed {}",
        config.workload.kind(),
        config.seed
    );
    let report = scheduler.run(&mut source)?;
    Ok((report, scheduler))
}
