use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;
use slotmap::SlotMap;
use tracing::{debug, trace};

use super::calc::{ThreatCalculator, add_pct, calculate_pct};
use super::config::ThreatConfig;
use super::context::{ThreatContext, ThreatObserver};
use super::selection::select_next_victim;
use super::table::ThreatTable;
use crate::id::{SequenceGenerator, UnitId};
use crate::model::{
    Ability, EdgeId, SchoolMask, StatusEvent, ThreatEdge, ThreatListEntry, ThreatListUpdate,
};

/// Every threat table of one simulation shard plus the edge arena they share.
///
/// Edges are owned by the arena and addressed by [`EdgeId`]. Tables hold
/// handles in their two edge sets; `hated_by` is the reverse index from a
/// victim to every edge pointing at it. Owned and mutated by the single
/// thread that advances the shard.
#[derive(Resource, Debug)]
pub struct ThreatRegistry {
    config: ThreatConfig,
    edges: SlotMap<EdgeId, ThreatEdge>,
    /// BTreeMap for deterministic notification order.
    tables: BTreeMap<UnitId, ThreatTable>,
    hated_by: BTreeMap<UnitId, Vec<EdgeId>>,
    seq: SequenceGenerator,
}

impl Default for ThreatRegistry {
    fn default() -> Self {
        Self::new(ThreatConfig::default())
    }
}

impl ThreatRegistry {
    pub fn new(config: ThreatConfig) -> Self {
        Self {
            config,
            edges: SlotMap::with_key(),
            tables: BTreeMap::new(),
            hated_by: BTreeMap::new(),
            seq: SequenceGenerator::new(),
        }
    }

    pub fn config(&self) -> &ThreatConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Table lifecycle
    // -----------------------------------------------------------------------

    /// Give `owner` a table. Returns false if it already had one.
    pub fn create_table(&mut self, owner: UnitId) -> bool {
        if self.tables.contains_key(&owner) {
            return false;
        }
        self.tables
            .insert(owner, ThreatTable::new(owner, self.config.notify_interval_ms));
        true
    }

    pub fn has_table(&self, owner: UnitId) -> bool {
        self.tables.contains_key(&owner)
    }

    pub fn table(&self, owner: UnitId) -> Option<&ThreatTable> {
        self.tables.get(&owner)
    }

    /// Tear down and drop `owner`'s table (owner despawned).
    pub fn remove_table(&mut self, owner: UnitId) -> bool {
        self.reset(owner);
        self.tables.remove(&owner).is_some()
    }

    /// Bulk teardown: discard every edge without per-edge events, clear the
    /// current target and rewind the notify timer. The table itself survives.
    pub fn reset(&mut self, owner: UnitId) {
        let Some(table) = self.tables.get_mut(&owner) else {
            return;
        };
        let dropped = table.clear(self.config.notify_interval_ms);
        if !dropped.is_empty() {
            debug!(owner = %owner, edges = dropped.len(), "threat table reset");
        }
        for id in dropped {
            if let Some(edge) = self.edges.remove(id) {
                unindex(&mut self.hated_by, edge.victim, id);
            }
        }
    }

    /// Zero every edge's threat in place, keeping the roster of hostile units.
    pub fn reset_aggro_keep_list(&mut self, owner: UnitId) {
        let Some(table) = self.tables.get_mut(&owner) else {
            return;
        };
        if table.len() == 0 {
            return;
        }
        for id in table.reachable.iter().chain(table.unreachable.iter()) {
            if let Some(edge) = self.edges.get_mut(id) {
                edge.threat = 0.0;
                edge.temp_override = 0.0;
            }
        }
        table.reachable.set_dirty(true);
    }

    // -----------------------------------------------------------------------
    // Recording threat
    // -----------------------------------------------------------------------

    /// Record threat `victim` provoked in `owner`. Ineligible pairs are dropped silently.
    pub fn record_threat(
        &mut self,
        ctx: &mut ThreatContext<'_>,
        owner: UnitId,
        victim: UnitId,
        raw: f32,
        school: SchoolMask,
        ability: Option<&Ability>,
    ) {
        if !self.tables.contains_key(&owner) {
            trace!(owner = %owner, "threat recorded for unit without a threat table");
            return;
        }
        if !ThreatCalculator::is_eligible(ctx, victim, owner, ability) {
            trace!(owner = %owner, victim = %victim, "ineligible threat dropped");
            return;
        }
        let delta = ThreatCalculator::compute_delta(ctx, victim, owner, raw, school, ability);
        self.add_threat_with_redirect(ctx, owner, victim, delta);
    }

    /// Scale the canonical threat of `victim`'s reachable edge by `pct` percent.
    /// Non-positive threat is a deliberate suppression and is left alone.
    pub fn apply_percent_modifier(
        &mut self,
        ctx: &mut ThreatContext<'_>,
        owner: UnitId,
        victim: UnitId,
        pct: i32,
    ) {
        let Some(table) = self.tables.get(&owner) else {
            return;
        };
        let Some(id) = table.reachable.find_by_victim(&self.edges, victim) else {
            return;
        };
        let Some(threat) = self.edges.get(id).map(|e| e.threat) else {
            return;
        };
        if threat <= 0.0 {
            return;
        }
        let target = add_pct(threat, pct);
        self.add_threat_to_edge(ctx, id, target - threat, true);
    }

    /// Threat `helper` generates by assisting `assisted` (healing, buffs): computed
    /// once, split evenly across every owner hostile to `assisted`.
    pub fn assist_threat(
        &mut self,
        ctx: &mut ThreatContext<'_>,
        assisted: UnitId,
        helper: UnitId,
        raw: f32,
        school: SchoolMask,
        ability: Option<&Ability>,
    ) {
        let owners = self.hostile_owners(assisted);
        let Some(&first) = owners.first() else {
            return;
        };
        let threat = ThreatCalculator::compute_delta(ctx, helper, first, raw, school, ability)
            / owners.len() as f32;
        for owner in owners {
            if ThreatCalculator::is_eligible(ctx, helper, owner, ability) {
                self.add_threat_with_redirect(ctx, owner, helper, threat);
            }
        }
    }

    fn add_threat_with_redirect(
        &mut self,
        ctx: &mut ThreatContext<'_>,
        owner: UnitId,
        victim: UnitId,
        delta: f32,
    ) {
        let mut delta = delta;
        // Only positive threat is redirected; a non-positive split has no recipient.
        if delta > 0.0 {
            if let Some(redirect) = ctx.units.threat_redirect(victim) {
                if redirect.pct > 0 {
                    let redirected = calculate_pct(delta, redirect.pct.min(100) as i32);
                    delta -= redirected;
                    if ThreatCalculator::is_eligible(ctx, redirect.target, owner, None) {
                        // The substitute never redirects further.
                        self.add_threat_direct(ctx, owner, redirect.target, redirected, true);
                    }
                }
            }
        }
        self.add_threat_direct(ctx, owner, victim, delta, true);
    }

    /// Apply `delta` to the owner's edge for `victim`, creating it at zero first if needed.
    fn add_threat_direct(
        &mut self,
        ctx: &mut ThreatContext<'_>,
        owner: UnitId,
        victim: UnitId,
        delta: f32,
        follow_controller: bool,
    ) {
        let Some(table) = self.tables.get_mut(&owner) else {
            return;
        };
        let id = match table.find(&self.edges, victim, true) {
            Some(id) => id,
            None => {
                let reachable = !ctx.units.is_privileged_observer(victim);
                let id = self.edges.insert(ThreatEdge::new(
                    owner,
                    victim,
                    reachable,
                    self.seq.next_seq(),
                ));
                table.insert_edge(id, reachable);
                self.hated_by.entry(victim).or_default().push(id);
                debug!(owner = %owner, victim = %victim, reachable, "threat edge created");
                id
            }
        };
        self.add_threat_to_edge(ctx, id, delta, follow_controller);
    }

    fn add_threat_to_edge(
        &mut self,
        ctx: &mut ThreatContext<'_>,
        id: EdgeId,
        delta: f32,
        follow_controller: bool,
    ) {
        debug_assert!(delta.is_finite(), "non-finite threat delta {delta}");
        let Some(edge) = self.edges.get_mut(id) else {
            return;
        };
        edge.threat += delta;

        // An unreachable edge gets a fresh resolve before anything else.
        if !edge.reachable && !self.refresh_reachability(ctx, id) {
            return;
        }
        if delta != 0.0 {
            self.dispatch(ctx, StatusEvent::threat_changed(id, delta));
        }
        if follow_controller && delta >= 0.0 {
            self.link_controller(ctx, id);
        }
    }

    /// Hostility towards a controlled unit extends to its controller, at zero threat.
    fn link_controller(&mut self, ctx: &mut ThreatContext<'_>, id: EdgeId) {
        let Some(edge) = self.edges.get(id) else {
            return;
        };
        if !edge.linked {
            return;
        }
        let (owner, victim) = (edge.owner, edge.victim);
        let Some(controller) = ctx.units.controller(victim) else {
            return;
        };
        if ThreatCalculator::is_eligible(ctx, controller, owner, None) {
            self.add_threat_direct(ctx, owner, controller, 0.0, false);
        }
    }

    // -----------------------------------------------------------------------
    // Taunt
    // -----------------------------------------------------------------------

    /// Make `taunter`'s edge read at least as high as the current target's.
    /// Canonical threat is untouched; the override is tracked separately.
    pub fn apply_taunt(&mut self, ctx: &mut ThreatContext<'_>, owner: UnitId, taunter: UnitId) {
        let Some(table) = self.tables.get(&owner) else {
            return;
        };
        let Some(current) = table.current_target() else {
            return;
        };
        let Some(id) = table.reachable.find_by_victim(&self.edges, taunter) else {
            return;
        };
        let Some(bar) = self.edges.get(current).map(ThreatEdge::effective_threat) else {
            return;
        };
        let Some(edge) = self.edges.get_mut(id) else {
            return;
        };
        if bar <= 0.0 || edge.threat >= bar || edge.temp_override != 0.0 {
            return;
        }
        edge.temp_override = bar;
        debug!(owner = %owner, taunter = %taunter, override_threat = bar, "taunt applied");
        self.dispatch(ctx, StatusEvent::threat_changed(id, bar));
    }

    /// Remove `taunter`'s override, leaving canonical threat exactly as it was.
    pub fn clear_taunt(&mut self, ctx: &mut ThreatContext<'_>, owner: UnitId, taunter: UnitId) {
        let Some(table) = self.tables.get(&owner) else {
            return;
        };
        let Some(id) = table.find(&self.edges, taunter, true) else {
            return;
        };
        let Some(edge) = self.edges.get_mut(id) else {
            return;
        };
        let removed = std::mem::take(&mut edge.temp_override);
        if removed != 0.0 {
            self.dispatch(ctx, StatusEvent::threat_changed(id, -removed));
        }
    }

    // -----------------------------------------------------------------------
    // Target selection
    // -----------------------------------------------------------------------

    /// Decide whom `owner` attacks now. Sorts the reachable set first if dirty.
    pub fn select_target(&mut self, ctx: &mut ThreatContext<'_>, owner: UnitId) -> Option<UnitId> {
        let table = self.tables.get_mut(&owner)?;
        table.reachable.update(&self.edges);
        let next = select_next_victim(
            ctx,
            &self.config,
            owner,
            &table.reachable,
            &self.edges,
            table.current_target(),
        );
        table.set_current_target(next, &self.edges, ctx);
        next.and_then(|id| self.edges.get(id)).map(|e| e.victim)
    }

    // -----------------------------------------------------------------------
    // Reachability and victim lifecycle
    // -----------------------------------------------------------------------

    /// Re-evaluate reachability of every edge pointing at `victim`
    /// (teleport, phase shift, observer mode toggled).
    pub fn refresh_victim(&mut self, ctx: &mut ThreatContext<'_>, victim: UnitId) {
        for id in self.edges_to(victim) {
            self.refresh_reachability(ctx, id);
        }
    }

    /// `victim` temporarily stopped resolving (e.g. map transfer in progress).
    /// Its edges go unreachable and unlinked until the next threat event retries.
    pub fn detach_victim(&mut self, ctx: &mut ThreatContext<'_>, victim: UnitId) {
        for id in self.edges_to(victim) {
            if let Some(edge) = self.edges.get_mut(id) {
                edge.linked = false;
            }
            self.set_reachable(ctx, id, false);
        }
    }

    /// `victim` left the world for good: every edge to it is removed.
    pub fn remove_victim(&mut self, ctx: &mut ThreatContext<'_>, victim: UnitId) {
        for id in self.edges_to(victim) {
            self.destroy_edge(ctx, id);
        }
    }

    /// Drop `owner`'s edge to `victim`. Returns whether one existed.
    pub fn remove_edge(&mut self, ctx: &mut ThreatContext<'_>, owner: UnitId, victim: UnitId) -> bool {
        let Some(id) = self
            .tables
            .get(&owner)
            .and_then(|t| t.find(&self.edges, victim, true))
        else {
            return false;
        };
        self.destroy_edge(ctx, id);
        true
    }

    /// Owners whose tables hold an edge to `victim`, in either reachability state.
    pub fn hostile_owners(&self, victim: UnitId) -> Vec<UnitId> {
        self.hated_by
            .get(&victim)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.edges.get(id))
            .map(|e| e.owner)
            .collect()
    }

    fn edges_to(&self, victim: UnitId) -> Vec<EdgeId> {
        self.hated_by.get(&victim).cloned().unwrap_or_default()
    }

    /// Resolve the victim again and recompute reachability.
    /// Returns false when the victim is gone and the edge was destroyed.
    fn refresh_reachability(&mut self, ctx: &mut ThreatContext<'_>, id: EdgeId) -> bool {
        let Some(edge) = self.edges.get_mut(id) else {
            return false;
        };
        let (owner, victim) = (edge.owner, edge.victim);
        if !ctx.units.exists(victim) {
            self.destroy_edge(ctx, id);
            return false;
        }
        if !edge.linked {
            edge.linked = true;
            debug!(owner = %owner, victim = %victim, "threat edge relinked");
        }
        let reachable = self.evaluate_reachability(ctx, owner, victim);
        self.set_reachable(ctx, id, reachable);
        true
    }

    fn evaluate_reachability(&self, ctx: &ThreatContext<'_>, owner: UnitId, victim: UnitId) -> bool {
        if ctx.units.is_privileged_observer(victim) || ctx.units.is_in_transit(victim) {
            return false;
        }
        if !ctx.spatial.same_context(owner, victim) {
            return false;
        }
        // Grace: an adjacent victim stays reachable through brief losses of access.
        ctx.spatial.is_perceptually_accessible(owner, victim)
            || (self.config.engagement_grace && ctx.spatial.within_engagement_range(owner, victim))
    }

    fn set_reachable(&mut self, ctx: &mut ThreatContext<'_>, id: EdgeId, reachable: bool) {
        let Some(edge) = self.edges.get_mut(id) else {
            return;
        };
        if edge.reachable == reachable {
            return;
        }
        edge.reachable = reachable;
        debug!(owner = %edge.owner, victim = %edge.victim, reachable, "threat edge reachability changed");
        self.dispatch(ctx, StatusEvent::reachability_changed(id, reachable));
    }

    fn destroy_edge(&mut self, ctx: &mut ThreatContext<'_>, id: EdgeId) {
        self.dispatch(ctx, StatusEvent::removed(id));
        if let Some(edge) = self.edges.remove(id) {
            debug!(owner = %edge.owner, victim = %edge.victim, "threat edge removed");
            unindex(&mut self.hated_by, edge.victim, id);
        }
    }

    /// Deliver an edge's status event to its owning table.
    fn dispatch(&mut self, ctx: &mut ThreatContext<'_>, event: StatusEvent) {
        let Some(owner) = self.edges.get(event.edge).map(|e| e.owner) else {
            return;
        };
        if let Some(table) = self.tables.get_mut(&owner) {
            table.process_event(&event, &self.edges, ctx);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn edge(&self, owner: UnitId, victim: UnitId) -> Option<&ThreatEdge> {
        self.tables
            .get(&owner)
            .and_then(|t| t.find(&self.edges, victim, true))
            .and_then(|id| self.edges.get(id))
    }

    fn find_edge(&self, owner: UnitId, victim: UnitId, include_unreachable: bool) -> Option<&ThreatEdge> {
        self.tables
            .get(&owner)
            .and_then(|t| t.find(&self.edges, victim, include_unreachable))
            .and_then(|id| self.edges.get(id))
    }

    /// Effective threat (with taunt override), 0.0 if there is no edge.
    pub fn threat(&self, owner: UnitId, victim: UnitId, include_unreachable: bool) -> f32 {
        self.find_edge(owner, victim, include_unreachable)
            .map_or(0.0, ThreatEdge::effective_threat)
    }

    /// Canonical threat without the taunt override, 0.0 if there is no edge.
    pub fn threat_without_temp(&self, owner: UnitId, victim: UnitId, include_unreachable: bool) -> f32 {
        self.find_edge(owner, victim, include_unreachable)
            .map_or(0.0, ThreatEdge::threat)
    }

    pub fn current_target(&self, owner: UnitId) -> Option<UnitId> {
        let id = self.tables.get(&owner)?.current_target()?;
        self.edges.get(id).map(|e| e.victim)
    }

    /// Highest-threat reachable victim, regardless of attack validity.
    pub fn most_hated(&mut self, owner: UnitId) -> Option<UnitId> {
        let table = self.tables.get_mut(&owner)?;
        table.reachable.update(&self.edges);
        let id = table.reachable.most_hated()?;
        self.edges.get(id).map(|e| e.victim)
    }

    pub fn is_threat_list_empty(&self, owner: UnitId) -> bool {
        self.tables.get(&owner).is_none_or(ThreatTable::is_threat_list_empty)
    }

    pub fn is_dirty(&self, owner: UnitId) -> bool {
        self.tables.get(&owner).is_some_and(ThreatTable::is_dirty)
    }

    /// Edges in both sets.
    pub fn edge_count(&self, owner: UnitId) -> usize {
        self.tables.get(&owner).map_or(0, ThreatTable::len)
    }

    pub fn total_edges(&self) -> usize {
        self.edges.len()
    }

    /// Reachable entries, highest threat first.
    pub fn threat_list(&mut self, owner: UnitId) -> Vec<ThreatListEntry> {
        let Some(table) = self.tables.get_mut(&owner) else {
            return Vec::new();
        };
        table.reachable.update(&self.edges);
        entries(table.reachable.iter(), &self.edges)
    }

    /// Unreachable entries, in insertion order.
    pub fn unreachable_list(&self, owner: UnitId) -> Vec<ThreatListEntry> {
        self.tables
            .get(&owner)
            .map(|t| entries(t.unreachable.iter(), &self.edges))
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Client notification throttle
    // -----------------------------------------------------------------------

    pub fn needs_client_update(&mut self, owner: UnitId, diff_ms: u32) -> bool {
        let interval = self.config.notify_interval_ms;
        self.tables
            .get_mut(&owner)
            .is_some_and(|t| t.needs_client_update(diff_ms, interval))
    }

    /// Advance every table's notify timer by `diff_ms` and push a threat-list
    /// snapshot for each one that is due.
    pub fn tick_notifications(&mut self, diff_ms: u32, observer: &mut dyn ThreatObserver) {
        let interval = self.config.notify_interval_ms;
        for (owner, table) in self.tables.iter_mut() {
            if !table.needs_client_update(diff_ms, interval) {
                continue;
            }
            table.reachable.update(&self.edges);
            let update = ThreatListUpdate {
                owner: *owner,
                current_target: table
                    .current_target()
                    .and_then(|id| self.edges.get(id))
                    .map(|e| e.victim),
                entries: entries(table.reachable.iter(), &self.edges),
            };
            observer.on_threat_list_update(&update);
        }
    }
}

fn entries(
    ids: impl Iterator<Item = EdgeId>,
    edges: &SlotMap<EdgeId, ThreatEdge>,
) -> Vec<ThreatListEntry> {
    ids.filter_map(|id| edges.get(id))
        .map(|e| ThreatListEntry {
            victim: e.victim,
            threat: e.effective_threat(),
        })
        .collect()
}

fn unindex(hated_by: &mut BTreeMap<UnitId, Vec<EdgeId>>, victim: UnitId, id: EdgeId) {
    if let Some(list) = hated_by.get_mut(&victim) {
        list.retain(|&e| e != id);
        if list.is_empty() {
            hated_by.remove(&victim);
        }
    }
}
