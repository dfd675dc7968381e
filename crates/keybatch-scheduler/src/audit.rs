//! Disjointness audit
//!
//! Records, per station, the key set each accepted transaction contributed
//! since the station's last reset, so the disjointness invariant and the
//! station counts can be checked independently of the station's own state.

use crate::key::KeyId;
use crate::station::Station;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A broken station invariant found by [`DisjointAudit::verify`]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuditViolation {
    /// Two transactions in one station share a key
    #[error("station {station}: key {key} contributed by transactions {first} and {second}")]
    SharedKey {
        /// Station index
        station: usize,
        /// Shared key
        key: KeyId,
        /// Position of the first contributing transaction
        first: usize,
        /// Position of the second contributing transaction
        second: usize,
    },

    /// Station count differs from the number of recorded contributions
    #[error("station {station}: count {count} but {contributions} contributions recorded")]
    CountMismatch {
        /// Station index
        station: usize,
        /// Count held by the station
        count: usize,
        /// Contributions recorded by the audit
        contributions: usize,
    },

    /// Station key set differs from the union of contributions
    #[error("station {station}: held keys differ from recorded contributions")]
    KeySetMismatch {
        /// Station index
        station: usize,
    },

    /// Audit and pool sizes differ
    #[error("audit tracks {audit} stations, pool has {pool}")]
    PoolSizeMismatch {
        /// Stations tracked by the audit
        audit: usize,
        /// Stations in the pool
        pool: usize,
    },
}

/// Per-station log of accepted key sets
#[derive(Clone, Debug, Default)]
pub struct DisjointAudit {
    contributions: Vec<Vec<HashSet<KeyId>>>,
}

impl DisjointAudit {
    /// Create an audit for `stations` stations
    pub fn new(stations: usize) -> Self {
        Self {
            contributions: vec![Vec::new(); stations],
        }
    }

    /// Record that `keys` were merged into `station`
    pub fn record(&mut self, station: usize, keys: &HashSet<KeyId>) {
        if let Some(log) = self.contributions.get_mut(station) {
            log.push(keys.clone());
        }
    }

    /// Forget everything recorded for `station`
    pub fn reset(&mut self, station: usize) {
        if let Some(log) = self.contributions.get_mut(station) {
            log.clear();
        }
    }

    /// Contributions recorded for `station` since its last reset
    pub fn contributions(&self, station: usize) -> &[HashSet<KeyId>] {
        self.contributions
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check pairwise disjointness and agreement with the live pool
    pub fn verify(&self, stations: &[Station]) -> Result<(), AuditViolation> {
        if stations.len() != self.contributions.len() {
            return Err(AuditViolation::PoolSizeMismatch {
                audit: self.contributions.len(),
                pool: stations.len(),
            });
        }

        for (station, log) in stations.iter().zip(&self.contributions) {
            let mut seen: HashMap<KeyId, usize> = HashMap::new();
            for (pos, keys) in log.iter().enumerate() {
                for key in keys {
                    if let Some(&first) = seen.get(key) {
                        return Err(AuditViolation::SharedKey {
                            station: station.id(),
                            key: *key,
                            first,
                            second: pos,
                        });
                    }
                    seen.insert(*key, pos);
                }
            }

            if station.count() != log.len() {
                return Err(AuditViolation::CountMismatch {
                    station: station.id(),
                    count: station.count(),
                    contributions: log.len(),
                });
            }

            let held = station.keys();
            if held.len() != seen.len() || !seen.keys().all(|k| held.contains(k)) {
                return Err(AuditViolation::KeySetMismatch {
                    station: station.id(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;
    use crate::transaction::txn;

    fn set(ids: &[u64]) -> HashSet<KeyId> {
        ids.iter().copied().map(KeyId::new).collect()
    }

    #[test]
    fn test_clean_audit_passes() {
        let mut stations = vec![Station::new(0), Station::new(1)];
        let mut audit = DisjointAudit::new(2);

        for (idx, ids) in [(0usize, vec![1u64, 2]), (0, vec![3]), (1, vec![1])] {
            let txn = Transaction::from(ids);
            assert!(stations[idx].try_merge(&txn));
            audit.record(idx, txn.keys());
        }

        assert_eq!(audit.verify(&stations), Ok(()));
        assert_eq!(audit.contributions(0).len(), 2);
    }

    #[test]
    fn test_shared_key_detected() {
        let stations = vec![Station::new(0)];
        let mut audit = DisjointAudit::new(1);
        audit.record(0, &set(&[1, 2]));
        audit.record(0, &set(&[2]));

        match audit.verify(&stations) {
            Err(AuditViolation::SharedKey { key, first, second, .. }) => {
                assert_eq!(key, KeyId::new(2));
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_count_mismatch_detected() {
        let mut stations = vec![Station::new(0)];
        stations[0].try_merge(&txn(&[1]));
        let audit = DisjointAudit::new(1);

        assert!(matches!(
            audit.verify(&stations),
            Err(AuditViolation::CountMismatch { count: 1, contributions: 0, .. })
        ));
    }

    #[test]
    fn test_key_set_mismatch_detected() {
        let mut stations = vec![Station::new(0)];
        stations[0].try_merge(&txn(&[1]));
        let mut audit = DisjointAudit::new(1);
        audit.record(0, &set(&[2]));

        assert_eq!(
            audit.verify(&stations),
            Err(AuditViolation::KeySetMismatch { station: 0 })
        );
    }

    #[test]
    fn test_reset_clears_log() {
        let mut audit = DisjointAudit::new(1);
        audit.record(0, &set(&[1]));
        audit.reset(0);
        assert!(audit.contributions(0).is_empty());
        assert_eq!(audit.verify(&[Station::new(0)]), Ok(()));
    }

    #[test]
    fn test_pool_size_mismatch() {
        let audit = DisjointAudit::new(2);
        assert!(matches!(
            audit.verify(&[Station::new(0)]),
            Err(AuditViolation::PoolSizeMismatch { audit: 2, pool: 1 })
        ));
    }
}
