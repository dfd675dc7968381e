//! Error types for the scheduler

use crate::audit::AuditViolation;
use crate::key::{KeyDomain, KeyId};
use thiserror::Error;

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Invalid configuration, detected before any scheduling
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Generator produced a key outside its declared domain
    #[error("generator contract violation: key {key} outside domain {domain}")]
    GeneratorContractViolation {
        /// Offending key
        key: KeyId,
        /// Domain the generator declared
        domain: KeyDomain,
    },

    /// Generator produced a transaction of the wrong length
    #[error("generator contract violation: expected {expected} keys per transaction, got {actual}")]
    TransactionSizeMismatch {
        /// Configured transaction size
        expected: usize,
        /// Length actually produced
        actual: usize,
    },

    /// Generator ran out of transactions before the run finished
    #[error("generator exhausted after {recorded} recorded batches")]
    GeneratorExhausted {
        /// Batches recorded by the scheduler so far
        recorded: usize,
    },

    /// No eviction happened within the per-step attempt budget
    #[error("scheduling budget exceeded: {attempts} transactions examined without an eviction ({recorded} batches recorded)")]
    SchedulingBudgetExceeded {
        /// Transactions examined in the failing step
        attempts: u64,
        /// Batches recorded by the scheduler so far
        recorded: usize,
    },

    /// Disjointness audit found a violation
    #[error("audit failed: {0}")]
    Audit(#[from] AuditViolation),

    /// Internal invariant breach
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
