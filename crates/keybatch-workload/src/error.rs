//! Error types for workload sources

use thiserror::Error;

/// Workload errors
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// Generator parameters out of range
    #[error("invalid workload parameter: {0}")]
    InvalidParameter(String),

    /// Source holds no transactions
    #[error("workload has no transactions")]
    Empty,

    /// Transaction length differs from the configured size
    #[error("transaction {index} has {actual} keys, expected {expected}")]
    TransactionSize {
        /// Position of the transaction in the source
        index: usize,
        /// Configured size
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Key outside the declared domain
    #[error("key {key} in transaction {index} outside domain of {domain} keys")]
    KeyOutOfDomain {
        /// Position of the transaction in the source
        index: usize,
        /// Offending key
        key: u64,
        /// Declared domain size
        domain: u64,
    },

    /// Malformed trace line
    #[error("trace line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// I/O error reading a trace
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for workload operations
pub type WorkloadResult<T> = Result<T, WorkloadError>;

/// Check a list of transactions against a size and a domain
pub(crate) fn check_transactions(
    txns: &[Vec<u64>],
    transaction_size: usize,
    domain: u64,
) -> WorkloadResult<()> {
    if txns.is_empty() {
        return Err(WorkloadError::Empty);
    }
    for (index, keys) in txns.iter().enumerate() {
        if keys.len() != transaction_size {
            return Err(WorkloadError::TransactionSize {
                index,
                expected: transaction_size,
                actual: keys.len(),
            });
        }
        if let Some(&key) = keys.iter().find(|&&k| k >= domain) {
            return Err(WorkloadError::KeyOutOfDomain { index, key, domain });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_transactions() {
        assert!(check_transactions(&[vec![0, 1], vec![2, 3]], 2, 4).is_ok());
        assert!(matches!(
            check_transactions(&[], 2, 4),
            Err(WorkloadError::Empty)
        ));
        assert!(matches!(
            check_transactions(&[vec![0, 1], vec![2]], 2, 4),
            Err(WorkloadError::TransactionSize { index: 1, expected: 2, actual: 1 })
        ));
        assert!(matches!(
            check_transactions(&[vec![0, 4]], 2, 4),
            Err(WorkloadError::KeyOutOfDomain { index: 0, key: 4, domain: 4 })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = WorkloadError::Parse {
            line: 3,
            message: "bad key 'x'".into(),
        };
        assert_eq!(err.to_string(), "trace line 3: bad key 'x'");
    }
}
