use slotmap::SlotMap;

use super::config::ThreatConfig;
use super::context::ThreatContext;
use super::edge_set::EdgeSet;
use crate::id::UnitId;
use crate::model::{EdgeId, ThreatEdge};

/// Pick the edge `owner` should attack next from an already-sorted candidate set.
///
/// The current target, when still a sound choice, is kept unless a candidate
/// beats it by `ranged_switch_ratio`, or by `melee_switch_ratio` while in melee
/// range. Low-priority victims (immune, damage-breakable, ignoring the owner)
/// are only considered once a first pass without them comes up empty.
pub fn select_next_victim(
    ctx: &ThreatContext<'_>,
    config: &ThreatConfig,
    owner: UnitId,
    candidates: &EdgeSet,
    edges: &SlotMap<EdgeId, ThreatEdge>,
    current: Option<EdgeId>,
) -> Option<EdgeId> {
    let current = current
        .and_then(|id| edges.get(id).map(|edge| (id, edge)))
        .filter(|(_, edge)| {
            ctx.can_engage(owner, edge.victim) && !ctx.is_poor_target(owner, edge.victim)
        });

    scan(ctx, config, owner, candidates, edges, current, true)
        .or_else(|| scan(ctx, config, owner, candidates, edges, current, false))
}

fn scan(
    ctx: &ThreatContext<'_>,
    config: &ThreatConfig,
    owner: UnitId,
    candidates: &EdgeSet,
    edges: &SlotMap<EdgeId, ThreatEdge>,
    current: Option<(EdgeId, &ThreatEdge)>,
    priority_only: bool,
) -> Option<EdgeId> {
    for id in candidates.iter() {
        let Some(edge) = edges.get(id) else {
            continue;
        };
        if priority_only && ctx.is_low_priority(owner, edge.victim) {
            continue;
        }
        if !ctx.can_engage(owner, edge.victim) {
            continue;
        }

        // No sound current target: the list is sorted, first valid wins.
        let Some((current_id, current_edge)) = current else {
            return Some(id);
        };
        if id == current_id {
            return Some(id);
        }

        let threat = edge.effective_threat();
        let bar = current_edge.effective_threat();
        if threat > config.ranged_switch_ratio * bar {
            return Some(id);
        }
        if threat > config.melee_switch_ratio * bar {
            if ctx.spatial.within_melee_range(owner, edge.victim) {
                return Some(id);
            }
            continue;
        }
        // Everything from here down is below the melee bar.
        return Some(current_id);
    }
    None
}
