//! Main scheduler implementation
//!
//! Pulls transactions from a [`KeySetGenerator`], places each one into the
//! first station that accepts it, and evicts a station chosen by the
//! [`EvictionPolicy`] when none does. Every eviction records one completed
//! batch; a run stops after the configured number of evictions.

use crate::audit::DisjointAudit;
use crate::error::{SchedulerError, SchedulerResult};
use crate::eviction::{EvictionPolicy, LeastCount};
use crate::generator::KeySetGenerator;
use crate::station::Station;
use crate::transaction::Transaction;
use keybatch_metrics::{
    BatchStats, Metrics, MetricsCollector, MetricsSnapshot, MERGES, STATIONS_ACTIVE,
    TRANSACTIONS_EXAMINED,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default per-step attempt budget
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// What to do with stations still accumulating when a run ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalFlush {
    /// Leave them alone; they never contribute a batch
    #[default]
    Off,
    /// Report their counts in [`RunReport::residual`] and reset them
    Drain,
}

/// Scheduler configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of stations in the pool
    #[serde(default = "default_station_count")]
    pub station_count: usize,
    /// Keys per transaction
    #[serde(default = "default_transaction_size")]
    pub transaction_size: usize,
    /// Evictions to record before a run stops
    #[serde(default = "default_batch_count")]
    pub batch_count: usize,
    /// Transactions examined per step before giving up on an eviction
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    /// Handling of stations left accumulating at the end of a run
    #[serde(default)]
    pub final_flush: FinalFlush,
    /// Keep a per-station contribution log and verify it after each run
    #[serde(default)]
    pub audit: bool,
}

fn default_station_count() -> usize {
    100
}

fn default_transaction_size() -> usize {
    10
}

fn default_batch_count() -> usize {
    1000
}

fn default_max_attempts() -> u64 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            station_count: default_station_count(),
            transaction_size: default_transaction_size(),
            batch_count: default_batch_count(),
            max_attempts: default_max_attempts(),
            final_flush: FinalFlush::Off,
            audit: false,
        }
    }
}

impl SchedulerConfig {
    /// Create a configuration with the default budget and no final flush
    pub fn new(station_count: usize, transaction_size: usize, batch_count: usize) -> Self {
        Self {
            station_count,
            transaction_size,
            batch_count,
            ..Self::default()
        }
    }

    /// Set the per-step attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the final flush mode
    pub fn with_final_flush(mut self, final_flush: FinalFlush) -> Self {
        self.final_flush = final_flush;
        self
    }

    /// Enable or disable the disjointness audit
    pub fn with_audit(mut self, audit: bool) -> Self {
        self.audit = audit;
        self
    }

    /// Check the configuration before any scheduling
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.station_count < 1 {
            return Err(SchedulerError::Configuration(
                "station_count must be at least 1".into(),
            ));
        }
        if self.transaction_size < 1 {
            return Err(SchedulerError::Configuration(
                "transaction_size must be at least 1".into(),
            ));
        }
        if self.batch_count < 1 {
            return Err(SchedulerError::Configuration(
                "batch_count must be at least 1".into(),
            ));
        }
        if self.max_attempts < 1 {
            return Err(SchedulerError::Configuration(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// A station flushed by eviction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedBatch {
    /// Station that was flushed
    pub station: usize,
    /// Transactions merged into it since its previous reset
    pub size: usize,
    /// Sequence number of the transaction that forced the eviction
    pub seq: u64,
}

/// Where a submitted transaction ended up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Merged into an accepting station during the first-fit scan
    Merged {
        /// Station index
        station: usize,
    },
    /// Merged into a station freshly flushed for it
    Evicted {
        /// Station index
        station: usize,
        /// The flushed batch
        batch: CompletedBatch,
    },
}

impl Placement {
    /// Station that received the transaction
    pub fn station(&self) -> usize {
        match self {
            Placement::Merged { station } | Placement::Evicted { station, .. } => *station,
        }
    }
}

/// Outcome of a scheduler run
///
/// `batches` holds only evicted stations. Work left in stations that were
/// still accumulating at the end is not part of it, which biases `mean`
/// low; see [`FinalFlush::Drain`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Completed batch sizes in eviction order
    pub batches: Vec<usize>,
    /// Mean completed batch size
    pub mean: f64,
    /// Sample standard deviation of completed batch sizes
    pub std_dev: f64,
    /// Counts drained from still-accumulating stations, in station order
    pub residual: Vec<usize>,
    /// Transactions pulled from the generator during the run
    pub transactions_examined: u64,
    /// Pool size
    pub station_count: usize,
    /// Eviction policy name
    pub policy: String,
}

impl RunReport {
    /// Statistics over the recorded batches
    pub fn stats(&self) -> BatchStats {
        BatchStats::from(self.batches.clone())
    }
}

/// Conflict-aware batch formation scheduler
///
/// Owns the station pool exclusively; callers only ever see `&[Station]`.
pub struct BatchScheduler {
    config: SchedulerConfig,
    stations: Vec<Station>,
    policy: Box<dyn EvictionPolicy>,
    collector: MetricsCollector,
    audit: Option<DisjointAudit>,
    /// Transactions submitted over the scheduler's lifetime
    examined: u64,
    /// Stations currently accumulating
    active: usize,
}

impl BatchScheduler {
    /// Create a scheduler with the least-count-first policy
    pub fn new(config: SchedulerConfig) -> SchedulerResult<Self> {
        Self::with_policy(config, Box::new(LeastCount))
    }

    /// Create a scheduler with a custom eviction policy
    pub fn with_policy(
        config: SchedulerConfig,
        policy: Box<dyn EvictionPolicy>,
    ) -> SchedulerResult<Self> {
        config.validate()?;
        let stations = (0..config.station_count).map(Station::new).collect();
        let audit = config
            .audit
            .then(|| DisjointAudit::new(config.station_count));

        Ok(Self {
            config,
            stations,
            policy,
            collector: MetricsCollector::new(),
            audit,
            examined: 0,
            active: 0,
        })
    }

    /// Report into a shared metrics store instead of a private one
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.collector = MetricsCollector::with_metrics(metrics);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Station pool, in scan order
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Name of the eviction policy
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Collector holding every batch recorded so far
    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    /// Transactions submitted over the scheduler's lifetime
    pub fn transactions_examined(&self) -> u64 {
        self.examined
    }

    /// Audit log, when audit mode is on
    pub fn audit(&self) -> Option<&DisjointAudit> {
        self.audit.as_ref()
    }

    /// Snapshot of batch statistics and counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::from_collector(&self.collector)
    }

    /// Place one transaction
    ///
    /// First-fit over the stations in index order; if every station
    /// conflicts, the policy's victim is recorded as a completed batch,
    /// reset, and receives the transaction.
    pub fn submit(&mut self, txn: Transaction) -> SchedulerResult<Placement> {
        self.examined += 1;
        let seq = self.examined;
        self.collector.metrics().counter(TRANSACTIONS_EXAMINED, 1);

        for (idx, station) in self.stations.iter_mut().enumerate() {
            let was_empty = station.is_empty();
            if station.try_merge(&txn) {
                if was_empty {
                    station.mark_opened(seq);
                    self.active += 1;
                    self.collector
                        .metrics()
                        .gauge(STATIONS_ACTIVE, self.active as i64);
                }
                self.collector.metrics().counter(MERGES, 1);
                if let Some(audit) = self.audit.as_mut() {
                    audit.record(idx, txn.keys());
                }
                return Ok(Placement::Merged { station: idx });
            }
        }

        let victim = self.policy.select_victim(&self.stations);
        let pool = self.stations.len();
        let policy = self.policy.name();
        let station = self.stations.get_mut(victim).ok_or_else(|| {
            SchedulerError::Internal(format!("policy {policy} chose station {victim} of {pool}"))
        })?;

        let size = station.count();
        station.reset();
        if !station.try_merge(&txn) {
            return Err(SchedulerError::Internal(format!(
                "transaction {seq} rejected by freshly reset station {victim}"
            )));
        }
        station.mark_opened(seq);

        self.collector.record_batch(size);
        if let Some(audit) = self.audit.as_mut() {
            audit.reset(victim);
            audit.record(victim, txn.keys());
        }
        tracing::debug!("Evicted station {} with {} transactions at txn {}", victim, size, seq);

        Ok(Placement::Evicted {
            station: victim,
            batch: CompletedBatch {
                station: victim,
                size,
                seq,
            },
        })
    }

    /// Pull transactions until one forces an eviction
    ///
    /// Fails with [`SchedulerError::SchedulingBudgetExceeded`] once
    /// `max_attempts` transactions were examined without an eviction.
    pub fn step<G>(&mut self, generator: &mut G) -> SchedulerResult<CompletedBatch>
    where
        G: KeySetGenerator + ?Sized,
    {
        let domain = generator.domain();
        if domain.is_empty() {
            return Err(SchedulerError::Configuration(
                "generator declares an empty key domain".into(),
            ));
        }

        let recorded = self.collector.batches().len();
        let mut attempts = 0u64;
        loop {
            if attempts >= self.config.max_attempts {
                tracing::warn!(
                    "No eviction after {} transactions; attempt budget exhausted",
                    attempts
                );
                return Err(SchedulerError::SchedulingBudgetExceeded { attempts, recorded });
            }

            let raw = generator
                .next_keys()
                .ok_or(SchedulerError::GeneratorExhausted { recorded })?;
            attempts += 1;

            if raw.len() != self.config.transaction_size {
                return Err(SchedulerError::TransactionSizeMismatch {
                    expected: self.config.transaction_size,
                    actual: raw.len(),
                });
            }
            let txn = Transaction::checked(raw, domain)?;

            if let Placement::Evicted { batch, .. } = self.submit(txn)? {
                return Ok(batch);
            }
        }
    }

    /// Record `batch_count` completed batches
    ///
    /// Statistics in the report cover only the batches recorded by this
    /// call. With audit mode on, the pool is verified before returning.
    pub fn run<G>(&mut self, generator: &mut G) -> SchedulerResult<RunReport>
    where
        G: KeySetGenerator + ?Sized,
    {
        let start_examined = self.examined;
        let start_recorded = self.collector.batches().len();

        tracing::info!(
            "Run starting: {} stations, {} keys/txn, {} batches, policy {}",
            self.config.station_count,
            self.config.transaction_size,
            self.config.batch_count,
            self.policy.name()
        );

        for _ in 0..self.config.batch_count {
            self.step(generator)?;
        }

        if self.audit.is_some() {
            self.verify_disjoint()?;
        }

        let stats = BatchStats::from(self.collector.batches().sizes()[start_recorded..].to_vec());
        let residual = match self.config.final_flush {
            FinalFlush::Off => Vec::new(),
            FinalFlush::Drain => self.drain(),
        };

        let report = RunReport {
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            batches: stats.into_sizes(),
            residual,
            transactions_examined: self.examined - start_examined,
            station_count: self.config.station_count,
            policy: self.policy.name().to_string(),
        };

        tracing::info!(
            "Run finished: mean {:.3}, std dev {:.3}, {} transactions examined",
            report.mean,
            report.std_dev,
            report.transactions_examined
        );

        Ok(report)
    }

    /// Reset every accumulating station, returning their counts
    ///
    /// Drained counts are not recorded as completed batches.
    pub fn drain(&mut self) -> Vec<usize> {
        let mut residual = Vec::new();
        for (idx, station) in self.stations.iter_mut().enumerate() {
            if station.is_empty() {
                continue;
            }
            residual.push(station.count());
            station.reset();
            if let Some(audit) = self.audit.as_mut() {
                audit.reset(idx);
            }
        }

        if !residual.is_empty() {
            tracing::warn!(
                "Final flush drained {} stations holding {} transactions; not included in batch statistics",
                residual.len(),
                residual.iter().sum::<usize>()
            );
        }
        self.active = 0;
        self.collector.metrics().gauge(STATIONS_ACTIVE, 0);
        residual
    }

    /// Check the disjointness invariant against the audit log
    pub fn verify_disjoint(&self) -> SchedulerResult<()> {
        match &self.audit {
            Some(audit) => audit.verify(&self.stations).map_err(SchedulerError::from),
            None => Err(SchedulerError::Configuration(
                "audit mode is disabled".into(),
            )),
        }
    }
}
