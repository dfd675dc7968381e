//! Stations: batch accumulators holding a key-disjoint set of transactions

use crate::key::KeyId;
use crate::transaction::Transaction;
use std::collections::HashSet;

/// Lifecycle state of a station
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StationState {
    /// No transaction merged since creation or the last reset
    Empty,
    /// At least one transaction merged
    Accumulating,
}

/// A batch accumulator
///
/// Invariant: the key sets of the transactions merged since the last reset
/// are pairwise disjoint, and `count` is the number of those transactions.
#[derive(Clone, Debug)]
pub struct Station {
    id: usize,
    keys: HashSet<KeyId>,
    count: usize,
    opened_at: u64,
}

impl Station {
    /// Create an empty station
    pub fn new(id: usize) -> Self {
        Self {
            id,
            keys: HashSet::new(),
            count: 0,
            opened_at: 0,
        }
    }

    /// Test-and-merge a transaction
    ///
    /// Returns `false` without touching the station if any key of `txn` is
    /// already held. Otherwise unions the keys in, bumps the count and
    /// returns `true`.
    pub fn try_merge(&mut self, txn: &Transaction) -> bool {
        if !txn.is_disjoint(&self.keys) {
            return false;
        }
        self.keys.extend(txn.keys().iter().copied());
        self.count += 1;
        true
    }

    /// Clear keys and count
    pub fn reset(&mut self) {
        self.keys.clear();
        self.count = 0;
    }

    /// Read-only conflict probe, for diagnostics
    pub fn conflicts_with(&self, txn: &Transaction) -> bool {
        !txn.is_disjoint(&self.keys)
    }

    /// Position of the station in the pool
    pub fn id(&self) -> usize {
        self.id
    }

    /// Transactions merged since the last reset
    pub fn count(&self) -> usize {
        self.count
    }

    /// Keys held
    pub fn keys(&self) -> &HashSet<KeyId> {
        &self.keys
    }

    /// Number of keys held
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Sequence number of the transaction that opened the current batch
    pub fn opened_at(&self) -> u64 {
        self.opened_at
    }

    pub(crate) fn mark_opened(&mut self, seq: u64) {
        self.opened_at = seq;
    }

    /// Current lifecycle state
    pub fn state(&self) -> StationState {
        if self.count == 0 {
            StationState::Empty
        } else {
            StationState::Accumulating
        }
    }

    /// Check if the station holds nothing
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
