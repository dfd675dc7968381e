//! # keybatch-scheduler
//!
//! Conflict-aware batch formation for keybatch.
//!
//! Transactions are described only by the resource keys they touch. The
//! scheduler assigns each one to a fixed pool of stations so that every
//! station accumulates a batch of pairwise key-disjoint transactions, which
//! downstream executors can run without contention.
//!
//! Features:
//! - Atomic test-and-merge of a transaction into a station
//! - First-fit station scan in fixed index order
//! - Pluggable eviction policy (least-count-first by default)
//! - Per-step attempt budget
//! - Optional disjointness audit
//!
//! ## Measurement bias
//!
//! A run stops after a fixed number of *evictions*. Stations still
//! accumulating when the run ends never contribute a recorded batch, so the
//! recorded sizes undercount work that was never evicted. [`FinalFlush::Drain`]
//! reports those residual counts separately without touching the primary
//! sequence.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod audit;
mod error;
mod eviction;
mod generator;
mod key;
mod scheduler;
mod station;
mod transaction;

pub use audit::{AuditViolation, DisjointAudit};
pub use error::{SchedulerError, SchedulerResult};
pub use eviction::{
    EvictionPolicy, LargestKeySet, LeastCount, MostCount, Oldest, PolicyKind, RandomVictim,
};
pub use generator::KeySetGenerator;
pub use key::{KeyDomain, KeyId};
pub use scheduler::{
    BatchScheduler, CompletedBatch, FinalFlush, Placement, RunReport, SchedulerConfig,
    DEFAULT_MAX_ATTEMPTS,
};
pub use station::{Station, StationState};
pub use transaction::Transaction;
