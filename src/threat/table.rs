use slotmap::SlotMap;
use tracing::debug;

use super::context::ThreatContext;
use super::edge_set::EdgeSet;
use crate::id::UnitId;
use crate::model::{EdgeId, StatusEvent, StatusEventKind, ThreatEdge};

/// Per-owner aggregate: reachable and unreachable edges, the cached current
/// target and the client notification countdown.
#[derive(Debug, Clone)]
pub struct ThreatTable {
    owner: UnitId,
    pub(crate) reachable: EdgeSet,
    pub(crate) unreachable: EdgeSet,
    current_target: Option<EdgeId>,
    notify_timer: u32,
}

impl ThreatTable {
    pub fn new(owner: UnitId, notify_interval_ms: u32) -> Self {
        Self {
            owner,
            reachable: EdgeSet::new(),
            unreachable: EdgeSet::new(),
            current_target: None,
            notify_timer: notify_interval_ms,
        }
    }

    pub fn owner(&self) -> UnitId {
        self.owner
    }

    pub fn current_target(&self) -> Option<EdgeId> {
        self.current_target
    }

    pub fn reachable(&self) -> &EdgeSet {
        &self.reachable
    }

    pub fn unreachable(&self) -> &EdgeSet {
        &self.unreachable
    }

    pub fn len(&self) -> usize {
        self.reachable.len() + self.unreachable.len()
    }

    /// No reachable edges. Unreachable ones do not count as aggro.
    pub fn is_threat_list_empty(&self) -> bool {
        self.reachable.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.reachable.is_dirty()
    }

    pub fn notify_timer(&self) -> u32 {
        self.notify_timer
    }

    pub fn find(
        &self,
        edges: &SlotMap<EdgeId, ThreatEdge>,
        victim: UnitId,
        include_unreachable: bool,
    ) -> Option<EdgeId> {
        self.reachable.find_by_victim(edges, victim).or_else(|| {
            if include_unreachable {
                self.unreachable.find_by_victim(edges, victim)
            } else {
                None
            }
        })
    }

    pub(crate) fn insert_edge(&mut self, id: EdgeId, reachable: bool) {
        if reachable {
            self.reachable.insert(id);
        } else {
            self.unreachable.insert(id);
        }
    }

    /// Cache the selection result; a new non-empty target is reported immediately.
    pub(crate) fn set_current_target(
        &mut self,
        next: Option<EdgeId>,
        edges: &SlotMap<EdgeId, ThreatEdge>,
        ctx: &mut ThreatContext<'_>,
    ) {
        if let Some(id) = next {
            if next != self.current_target {
                if let Some(edge) = edges.get(id) {
                    debug!(owner = %self.owner, victim = %edge.victim, threat = edge.effective_threat(), "current target changed");
                    ctx.observer.on_target_changed(self.owner, edge.victim);
                }
            }
        }
        self.current_target = next;
    }

    /// React to a change on one of this table's edges. The edge must still be
    /// present in `edges` (removal events arrive before destruction).
    pub(crate) fn process_event(
        &mut self,
        event: &StatusEvent,
        edges: &SlotMap<EdgeId, ThreatEdge>,
        ctx: &mut ThreatContext<'_>,
    ) {
        let Some(edge) = edges.get(event.edge) else {
            return;
        };
        let is_current = self.current_target == Some(event.edge);

        match event.kind {
            StatusEventKind::ThreatChanged { delta } => {
                // Only a drop on the leader or a rise elsewhere can reorder the list.
                if (is_current && delta < 0.0) || (!is_current && delta > 0.0) {
                    self.reachable.set_dirty(true);
                }
            }
            StatusEventKind::ReachabilityChanged { reachable: false } => {
                if is_current {
                    self.current_target = None;
                    self.reachable.set_dirty(true);
                }
                if ctx.units.exists(edge.victim) && ctx.spatial.same_context(self.owner, edge.victim)
                {
                    ctx.observer.on_edge_removed(self.owner, edge.victim);
                }
                self.reachable.remove(event.edge);
                self.unreachable.insert(event.edge);
            }
            StatusEventKind::ReachabilityChanged { reachable: true } => {
                // Inserting marks the reachable set dirty, so a returning edge is
                // always weighed against the current target on the next selection.
                self.unreachable.remove(event.edge);
                self.reachable.insert(event.edge);
            }
            StatusEventKind::Removed => {
                if is_current {
                    self.current_target = None;
                    self.reachable.set_dirty(true);
                }
                ctx.observer.on_edge_removed(self.owner, edge.victim);
                if !self.reachable.remove(event.edge) {
                    self.unreachable.remove(event.edge);
                }
            }
        }
    }

    /// Count down the notify timer. True when a throttled update is due.
    pub fn needs_client_update(&mut self, diff_ms: u32, interval_ms: u32) -> bool {
        if self.is_threat_list_empty() {
            return false;
        }
        if diff_ms >= self.notify_timer {
            self.notify_timer = interval_ms;
            return true;
        }
        self.notify_timer -= diff_ms;
        false
    }

    /// Drop every edge handle without raising events and reset transient state.
    /// Returns the handles so the caller can free them.
    pub(crate) fn clear(&mut self, interval_ms: u32) -> Vec<EdgeId> {
        let mut dropped = self.reachable.drain();
        dropped.extend(self.unreachable.drain());
        self.current_target = None;
        self.notify_timer = interval_ms;
        dropped
    }
}
