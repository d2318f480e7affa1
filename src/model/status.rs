use super::edge::EdgeId;

/// A single change on one edge, delivered synchronously to the owning table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEvent {
    pub edge: EdgeId,
    pub kind: StatusEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusEventKind {
    /// Threat (canonical or override) moved by `delta`. Never raised for a zero delta.
    ThreatChanged { delta: f32 },
    /// The edge's reachability flipped; `reachable` is the new state.
    ReachabilityChanged { reachable: bool },
    /// The edge is about to be destroyed.
    Removed,
}

impl StatusEvent {
    pub fn threat_changed(edge: EdgeId, delta: f32) -> Self {
        Self {
            edge,
            kind: StatusEventKind::ThreatChanged { delta },
        }
    }

    pub fn reachability_changed(edge: EdgeId, reachable: bool) -> Self {
        Self {
            edge,
            kind: StatusEventKind::ReachabilityChanged { reachable },
        }
    }

    pub fn removed(edge: EdgeId) -> Self {
        Self {
            edge,
            kind: StatusEventKind::Removed,
        }
    }
}
