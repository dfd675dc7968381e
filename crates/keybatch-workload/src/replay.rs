//! Transactions replayed from a text trace
//!
//! One transaction per line; keys are unsigned integers separated by
//! whitespace or commas. Blank lines and lines starting with `#` are
//! skipped. The source is finite and reports exhaustion after the last line.

use crate::error::{check_transactions, WorkloadError, WorkloadResult};
use keybatch_scheduler::{KeyDomain, KeyId, KeySetGenerator};
use std::collections::VecDeque;
use std::path::Path;

/// Finite trace-backed generator
#[derive(Clone, Debug)]
pub struct ReplayGenerator {
    txns: VecDeque<Vec<KeyId>>,
    domain: KeyDomain,
}

impl ReplayGenerator {
    /// Parse a trace
    ///
    /// Without an explicit `domain`, the domain is one past the largest key
    /// in the trace.
    pub fn parse(text: &str, transaction_size: usize, domain: Option<u64>) -> WorkloadResult<Self> {
        let mut txns = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let keys = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tok| !tok.is_empty())
                .map(|tok| {
                    tok.parse::<u64>().map_err(|e| WorkloadError::Parse {
                        line: idx + 1,
                        message: format!("bad key '{tok}': {e}"),
                    })
                })
                .collect::<WorkloadResult<Vec<u64>>>()?;
            txns.push(keys);
        }

        let domain = match domain {
            Some(domain) => domain,
            None => txns
                .iter()
                .flatten()
                .max()
                .map(|&k| k.saturating_add(1))
                .unwrap_or(0),
        };
        check_transactions(&txns, transaction_size, domain)?;

        Ok(Self {
            txns: txns
                .into_iter()
                .map(|keys| keys.into_iter().map(KeyId::new).collect())
                .collect(),
            domain: KeyDomain::new(domain),
        })
    }

    /// Read and parse a trace file
    pub fn from_file(
        path: impl AsRef<Path>,
        transaction_size: usize,
        domain: Option<u64>,
    ) -> WorkloadResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let replay = Self::parse(&text, transaction_size, domain)?;
        tracing::info!(
            "Loaded {} transactions from {}",
            replay.remaining(),
            path.display()
        );
        Ok(replay)
    }

    /// Transactions not yet replayed
    pub fn remaining(&self) -> usize {
        self.txns.len()
    }
}

impl KeySetGenerator for ReplayGenerator {
    fn domain(&self) -> KeyDomain {
        self.domain
    }

    fn next_keys(&mut self) -> Option<Vec<KeyId>> {
        self.txns.pop_front()
    }
}
