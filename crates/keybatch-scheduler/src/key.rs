//! Resource key types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a resource a transaction touches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub u64);

impl KeyId {
    /// Create a new key ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for KeyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared key space of a generator: keys in `[0, size)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDomain {
    size: u64,
}

impl KeyDomain {
    /// Create a domain of `size` keys
    pub fn new(size: u64) -> Self {
        Self { size }
    }

    /// Number of keys in the domain
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check if the domain has no keys
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Check if a key belongs to the domain
    pub fn contains(&self, key: KeyId) -> bool {
        key.0 < self.size
    }
}

impl fmt::Display for KeyDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0, {})", self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_id() {
        let k1 = KeyId::new(1);
        let k2 = KeyId::from(2u64);

        assert_eq!(k1.as_u64(), 1);
        assert_eq!(k2.as_u64(), 2);
        assert!(k1 < k2);
        assert_eq!(k2.to_string(), "2");
    }

    #[test]
    fn test_key_id_hash_consistency() {
        let mut set: HashSet<KeyId> = HashSet::new();
        for i in 0..100 {
            set.insert(KeyId::new(i));
        }
        for i in 0..100 {
            set.insert(KeyId::new(i));
        }
        assert_eq!(set.len(), 100);
    }

    #[test]
    fn test_domain_bounds() {
        let domain = KeyDomain::new(3);
        assert!(domain.contains(KeyId::new(0)));
        assert!(domain.contains(KeyId::new(2)));
        assert!(!domain.contains(KeyId::new(3)));
        assert!(!domain.contains(KeyId::new(u64::MAX)));
        assert!(!domain.is_empty());
    }

    #[test]
    fn test_empty_domain_contains_nothing() {
        let domain = KeyDomain::new(0);
        assert!(domain.is_empty());
        assert!(!domain.contains(KeyId::new(0)));
    }

    #[test]
    fn test_key_id_serde_transparent() {
        let json = serde_json::to_string(&KeyId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
