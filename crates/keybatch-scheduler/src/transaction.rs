//! Key sets of incoming transactions

use crate::error::{SchedulerError, SchedulerResult};
use crate::key::{KeyDomain, KeyId};
use std::collections::HashSet;

/// A transaction as seen by the scheduler
///
/// Keeps the raw key sequence as produced and its deduplicated set. Only the
/// set takes part in conflict tests, so a key repeated within one
/// transaction never conflicts with itself.
#[derive(Clone, Debug, Default)]
pub struct Transaction {
    raw: Vec<KeyId>,
    keys: HashSet<KeyId>,
}

impl Transaction {
    /// Create a transaction from its raw key sequence
    pub fn new(raw: Vec<KeyId>) -> Self {
        let keys = raw.iter().copied().collect();
        Self { raw, keys }
    }

    /// Create a transaction, rejecting keys outside `domain`
    pub fn checked(raw: Vec<KeyId>, domain: KeyDomain) -> SchedulerResult<Self> {
        if let Some(&key) = raw.iter().find(|k| !domain.contains(**k)) {
            return Err(SchedulerError::GeneratorContractViolation { key, domain });
        }
        Ok(Self::new(raw))
    }

    /// Deduplicated key set
    pub fn keys(&self) -> &HashSet<KeyId> {
        &self.keys
    }

    /// Raw key sequence as produced
    pub fn raw(&self) -> &[KeyId] {
        &self.raw
    }

    /// Length of the raw sequence
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Check if the transaction touches no keys
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of distinct keys
    pub fn distinct_len(&self) -> usize {
        self.keys.len()
    }

    /// Check if this transaction shares no key with `keys`
    pub fn is_disjoint(&self, keys: &HashSet<KeyId>) -> bool {
        // probe the smaller side
        if self.keys.len() <= keys.len() {
            self.keys.iter().all(|k| !keys.contains(k))
        } else {
            keys.iter().all(|k| !self.keys.contains(k))
        }
    }
}

impl From<Vec<u64>> for Transaction {
    fn from(raw: Vec<u64>) -> Self {
        Self::new(raw.into_iter().map(KeyId::new).collect())
    }
}

impl FromIterator<KeyId> for Transaction {
    fn from_iter<I: IntoIterator<Item = KeyId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Test shorthand for a transaction over raw key ids
#[cfg(test)]
pub(crate) fn txn(ids: &[u64]) -> Transaction {
    Transaction::from(ids.to_vec())
}
