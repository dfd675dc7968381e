//! Fixed transaction list, repeated forever

use crate::error::{check_transactions, WorkloadResult};
use keybatch_scheduler::{KeyDomain, KeyId, KeySetGenerator};

/// Replays a fixed list of transactions in order, wrapping at the end
#[derive(Clone, Debug)]
pub struct CyclicGenerator {
    txns: Vec<Vec<KeyId>>,
    domain: KeyDomain,
    pos: usize,
}

impl CyclicGenerator {
    /// Create a generator over `txns`
    ///
    /// Every transaction must hold `transaction_size` keys below `domain`.
    pub fn new(txns: Vec<Vec<u64>>, transaction_size: usize, domain: u64) -> WorkloadResult<Self> {
        check_transactions(&txns, transaction_size, domain)?;
        Ok(Self {
            txns: txns
                .into_iter()
                .map(|keys| keys.into_iter().map(KeyId::new).collect())
                .collect(),
            domain: KeyDomain::new(domain),
            pos: 0,
        })
    }

    /// Single-key transactions cycling through `0..keys`
    pub fn round_robin(keys: u64) -> WorkloadResult<Self> {
        Self::new((0..keys).map(|k| vec![k]).collect(), 1, keys)
    }

    /// Length of one cycle
    pub fn period(&self) -> usize {
        self.txns.len()
    }
}

impl KeySetGenerator for CyclicGenerator {
    fn domain(&self) -> KeyDomain {
        self.domain
    }

    fn next_keys(&mut self) -> Option<Vec<KeyId>> {
        let keys = self.txns[self.pos].clone();
        self.pos = (self.pos + 1) % self.txns.len();
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkloadError;

    fn ids(keys: &[u64]) -> Vec<KeyId> {
        keys.iter().copied().map(KeyId::new).collect()
    }

    #[test]
    fn test_wraps_around() {
        let mut gen = CyclicGenerator::new(vec![vec![0, 1], vec![2, 3]], 2, 4).unwrap();
        assert_eq!(gen.period(), 2);
        assert_eq!(gen.next_keys(), Some(ids(&[0, 1])));
        assert_eq!(gen.next_keys(), Some(ids(&[2, 3])));
        assert_eq!(gen.next_keys(), Some(ids(&[0, 1])));
    }

    #[test]
    fn test_round_robin() {
        let mut gen = CyclicGenerator::round_robin(2).unwrap();
        let keys: Vec<u64> = (0..5)
            .map(|_| gen.next_keys().unwrap()[0].as_u64())
            .collect();
        assert_eq!(keys, vec![0, 1, 0, 1, 0]);
        assert_eq!(gen.domain().size(), 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            CyclicGenerator::new(vec![], 1, 1),
            Err(WorkloadError::Empty)
        ));
        assert!(CyclicGenerator::new(vec![vec![5]], 1, 5).is_err());
        assert!(CyclicGenerator::new(vec![vec![1, 2]], 1, 5).is_err());
        assert!(CyclicGenerator::round_robin(0).is_err());
    }
}
