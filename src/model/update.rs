use serde::{Deserialize, Serialize};

use crate::id::UnitId;

/// One row of a client-visible threat list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatListEntry {
    pub victim: UnitId,
    /// Effective threat (canonical plus taunt override).
    pub threat: f32,
}

/// Snapshot pushed to observers when an owner's throttled update is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatListUpdate {
    pub owner: UnitId,
    pub current_target: Option<UnitId>,
    /// Reachable edges, highest threat first.
    pub entries: Vec<ThreatListEntry>,
}
