//! Transaction source contract

use crate::key::{KeyDomain, KeyId};

/// Produces transactions as ordered key sequences
///
/// Every key returned by [`next_keys`](KeySetGenerator::next_keys) must lie
/// in [`domain`](KeySetGenerator::domain). The scheduler aborts the run on
/// the first key outside it.
pub trait KeySetGenerator {
    /// Declared key space
    fn domain(&self) -> KeyDomain;

    /// Next transaction, or `None` once a finite source is exhausted
    fn next_keys(&mut self) -> Option<Vec<KeyId>>;
}

impl<G: KeySetGenerator + ?Sized> KeySetGenerator for Box<G> {
    fn domain(&self) -> KeyDomain {
        (**self).domain()
    }

    fn next_keys(&mut self) -> Option<Vec<KeyId>> {
        (**self).next_keys()
    }
}

impl<G: KeySetGenerator + ?Sized> KeySetGenerator for &mut G {
    fn domain(&self) -> KeyDomain {
        (**self).domain()
    }

    fn next_keys(&mut self) -> Option<Vec<KeyId>> {
        (**self).next_keys()
    }
}
