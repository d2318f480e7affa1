use std::cmp::Ordering;

use slotmap::SlotMap;

use crate::id::UnitId;
use crate::model::{EdgeId, ThreatEdge};

/// Descending effective threat, earlier insertion first on ties.
pub fn threat_order(a: &ThreatEdge, b: &ThreatEdge) -> Ordering {
    b.effective_threat()
        .total_cmp(&a.effective_threat())
        .then_with(|| a.seq.cmp(&b.seq))
}

/// One owner's edges in a single reachability state, lazily kept in threat order.
///
/// Any mutation that can change relative order marks the set dirty; the
/// re-sort happens once in [`EdgeSet::update`], right before order is needed.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    edges: Vec<EdgeId>,
    dirty: bool,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn contains(&self, id: EdgeId) -> bool {
        self.edges.contains(&id)
    }

    pub fn insert(&mut self, id: EdgeId) {
        debug_assert!(!self.contains(id), "edge inserted twice into one set");
        self.edges.push(id);
        self.dirty = true;
    }

    /// Remove a handle, returning whether it was present.
    pub fn remove(&mut self, id: EdgeId) -> bool {
        match self.edges.iter().position(|&e| e == id) {
            Some(idx) => {
                // Vec::remove keeps the remaining edges in order.
                self.edges.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn find_by_victim(
        &self,
        edges: &SlotMap<EdgeId, ThreatEdge>,
        victim: UnitId,
    ) -> Option<EdgeId> {
        self.edges
            .iter()
            .copied()
            .find(|&id| edges.get(id).is_some_and(|e| e.victim == victim))
    }

    /// Re-sort if dirty. Cheap no-op otherwise.
    pub fn update(&mut self, edges: &SlotMap<EdgeId, ThreatEdge>) {
        if self.dirty && self.edges.len() > 1 {
            self.edges.sort_by(|&a, &b| match (edges.get(a), edges.get(b)) {
                (Some(a), Some(b)) => threat_order(a, b),
                _ => Ordering::Equal,
            });
        }
        self.dirty = false;
    }

    /// First handle in current order. Only meaningful after [`EdgeSet::update`].
    pub fn most_hated(&self) -> Option<EdgeId> {
        self.edges.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    /// Empty the set and hand back every handle it held.
    pub fn drain(&mut self) -> Vec<EdgeId> {
        self.dirty = false;
        std::mem::take(&mut self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(threats: &[f32]) -> (SlotMap<EdgeId, ThreatEdge>, Vec<EdgeId>) {
        let mut arena = SlotMap::with_key();
        let ids = threats
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let mut edge = ThreatEdge::new(UnitId(1), UnitId(100 + i as u64), true, i as u64);
                edge.threat = t;
                arena.insert(edge)
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn update_sorts_descending_once() {
        let (arena, ids) = arena_with(&[10.0, 50.0, 30.0]);
        let mut set = EdgeSet::new();
        for &id in &ids {
            set.insert(id);
        }
        assert!(set.is_dirty());

        set.update(&arena);
        assert!(!set.is_dirty());
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
        assert_eq!(set.most_hated(), Some(ids[1]));
    }

    #[test]
    fn clean_set_is_not_resorted() {
        let (mut arena, ids) = arena_with(&[10.0, 50.0]);
        let mut set = EdgeSet::new();
        set.insert(ids[0]);
        set.insert(ids[1]);
        set.update(&arena);
        assert_eq!(set.most_hated(), Some(ids[1]));

        // Threat moved without marking dirty: order is left alone.
        arena[ids[0]].threat = 500.0;
        set.update(&arena);
        assert_eq!(set.most_hated(), Some(ids[1]));

        set.set_dirty(true);
        set.update(&arena);
        assert_eq!(set.most_hated(), Some(ids[0]));
    }

    #[test]
    fn ties_break_by_insertion() {
        let (arena, ids) = arena_with(&[20.0, 20.0, 20.0]);
        let mut set = EdgeSet::new();
        for &id in ids.iter().rev() {
            set.insert(id);
        }
        set.update(&arena);
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn override_counts_toward_order() {
        let (mut arena, ids) = arena_with(&[100.0, 5.0]);
        arena[ids[1]].temp_override = 100.0;
        let mut set = EdgeSet::new();
        set.insert(ids[0]);
        set.insert(ids[1]);
        set.update(&arena);
        assert_eq!(set.most_hated(), Some(ids[1]));
    }

    #[test]
    fn remove_and_find() {
        let (arena, ids) = arena_with(&[1.0, 2.0]);
        let mut set = EdgeSet::new();
        set.insert(ids[0]);
        set.insert(ids[1]);

        assert_eq!(set.find_by_victim(&arena, UnitId(101)), Some(ids[1]));
        assert!(set.remove(ids[1]));
        assert!(!set.remove(ids[1]));
        assert_eq!(set.find_by_victim(&arena, UnitId(101)), None);
        assert_eq!(set.len(), 1);

        let drained = set.drain();
        assert_eq!(drained, vec![ids[0]]);
        assert!(set.is_empty());
    }
}
