use slotmap::new_key_type;

use crate::id::UnitId;

new_key_type! {
    /// Stable handle of a [`ThreatEdge`] inside a registry's edge arena.
    pub struct EdgeId;
}

/// One weighted hostility link: `owner` is hostile to `victim`.
///
/// Exactly one of the owner table's two edge sets holds the handle at any
/// time; which one follows `reachable`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatEdge {
    pub(crate) owner: UnitId,
    pub(crate) victim: UnitId,
    pub(crate) threat: f32,
    pub(crate) temp_override: f32,
    pub(crate) reachable: bool,
    /// False once the victim stopped resolving; cleared by the next successful resolve.
    pub(crate) linked: bool,
    pub(crate) seq: u64,
}

impl ThreatEdge {
    /// A fresh edge always starts at zero threat; the first delta is applied separately.
    pub(crate) fn new(owner: UnitId, victim: UnitId, reachable: bool, seq: u64) -> Self {
        Self {
            owner,
            victim,
            threat: 0.0,
            temp_override: 0.0,
            reachable,
            linked: true,
            seq,
        }
    }

    pub fn owner(&self) -> UnitId {
        self.owner
    }

    pub fn victim(&self) -> UnitId {
        self.victim
    }

    /// Canonical accumulated threat, excluding any taunt override.
    pub fn threat(&self) -> f32 {
        self.threat
    }

    pub fn temp_threat_override(&self) -> f32 {
        self.temp_override
    }

    /// Threat as ordered, selected and reported: canonical threat plus taunt override.
    pub fn effective_threat(&self) -> f32 {
        self.threat + self.temp_override
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}
