use super::context::ThreatContext;
use crate::id::UnitId;
use crate::model::{Ability, SchoolMask};

/// Turns a raw provoked amount into the delta applied to a threat edge.
pub struct ThreatCalculator;

impl ThreatCalculator {
    /// Final threat delta `victim` generates against `owner`.
    ///
    /// Order: ability percent modifier, caster-side ability modifiers, then the
    /// victim's own incoming-threat multiplier. Energize abilities skip all three.
    pub fn compute_delta(
        ctx: &ThreatContext<'_>,
        victim: UnitId,
        _owner: UnitId,
        raw: f32,
        school: SchoolMask,
        ability: Option<&Ability>,
    ) -> f32 {
        let mut threat = raw;

        if let Some(ability) = ability {
            if ability.is_energize() {
                return raw;
            }

            let pct_mod = ctx.abilities.threat_pct_mod(ability.id);
            debug_assert!(
                pct_mod.is_finite(),
                "threat percent modifier of {} is not finite",
                ability.id
            );
            threat *= pct_mod;
            threat = ctx
                .abilities
                .apply_caster_threat_mod(victim, ability.id, threat);
        }

        threat * ctx.units.threat_multiplier(victim, school)
    }

    /// Whether threat from `victim` against `owner` may be recorded at all.
    /// Must pass before any edge is created.
    pub fn is_eligible(
        ctx: &ThreatContext<'_>,
        victim: UnitId,
        owner: UnitId,
        ability: Option<&Ability>,
    ) -> bool {
        let units = ctx.units;
        if !units.exists(victim) || !units.exists(owner) {
            return false;
        }
        if victim == owner {
            return false;
        }
        if units.is_privileged_observer(victim) {
            return false;
        }
        if !units.is_alive(victim) || !units.is_alive(owner) {
            return false;
        }
        if !ctx.spatial.same_context(victim, owner) {
            return false;
        }
        !ability.is_some_and(|a| !a.generates_threat())
    }
}

/// `base` increased by `pct` percent (negative shrinks it).
pub fn add_pct(base: f32, pct: i32) -> f32 {
    base + calculate_pct(base, pct)
}

/// `pct` percent of `base`.
pub fn calculate_pct(base: f32, pct: i32) -> f32 {
    base * pct as f32 / 100.0
}
