use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a combat unit (threat owner or victim).
///
/// Opaque to this crate: the host simulation resolves it through
/// [`UnitDirectory`](crate::threat::UnitDirectory) whenever a live view is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Identity of an ability definition in the host's ability catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(pub u32);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability#{}", self.0)
    }
}

/// Monotonic sequence shared by every edge a registry creates.
/// Later insertions always receive larger numbers, which gives equal-threat
/// edges a deterministic order.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: u64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_seq(&mut self) -> u64 {
        let seq = self.next;
        self.next += 1;
        seq
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
