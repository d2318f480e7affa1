use std::collections::{BTreeMap, BTreeSet};

use crate::ecs::ThreatOutbox;
use crate::id::{AbilityId, UnitId};
use crate::model::SchoolMask;
use crate::threat::{
    AbilityCatalog, AttackValidity, SpatialContext, ThreatContext, ThreatRedirect, UnitDirectory,
};

// ---------------------------------------------------------------------------
// Scripted units
// ---------------------------------------------------------------------------

/// Hand-set state of one unit. Relations to the owner (range, access,
/// detection) are scripted per unit rather than per pair.
#[derive(Debug, Clone)]
pub struct ScriptedUnit {
    pub alive: bool,
    pub privileged: bool,
    pub in_transit: bool,
    /// Map + phase key; units only share a context when these match.
    pub context: u32,
    pub accessible: bool,
    pub detectable: bool,
    pub attackable: bool,
    pub in_melee: bool,
    pub immune: SchoolMask,
    pub damage_breakable: bool,
    pub ignoring: BTreeSet<UnitId>,
    pub redirect: Option<ThreatRedirect>,
    pub threat_multiplier: f32,
    pub controller: Option<UnitId>,
}

impl Default for ScriptedUnit {
    fn default() -> Self {
        Self {
            alive: true,
            privileged: false,
            in_transit: false,
            context: 0,
            accessible: true,
            detectable: true,
            attackable: true,
            in_melee: false,
            immune: SchoolMask::empty(),
            damage_breakable: false,
            ignoring: BTreeSet::new(),
            redirect: None,
            threat_multiplier: 1.0,
            controller: None,
        }
    }
}

/// In-memory stand-in for the host simulation, implementing every
/// collaborator trait the registry queries.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWorld {
    pub units: BTreeMap<UnitId, ScriptedUnit>,
    pub ability_pct: BTreeMap<AbilityId, f32>,
    pub caster_mods: BTreeMap<(UnitId, AbilityId), f32>,
}

impl ScriptedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default unit (alive, reachable, attackable, context 0).
    pub fn spawn(&mut self, id: UnitId) -> &mut ScriptedUnit {
        self.units.entry(id).or_default()
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut ScriptedUnit {
        self.units.entry(id).or_default()
    }

    pub fn despawn(&mut self, id: UnitId) {
        self.units.remove(&id);
    }

    fn unit(&self, id: UnitId) -> Option<&ScriptedUnit> {
        self.units.get(&id)
    }
}

impl UnitDirectory for ScriptedWorld {
    fn exists(&self, unit: UnitId) -> bool {
        self.units.contains_key(&unit)
    }

    fn is_alive(&self, unit: UnitId) -> bool {
        self.unit(unit).is_some_and(|u| u.alive)
    }

    fn is_privileged_observer(&self, unit: UnitId) -> bool {
        self.unit(unit).is_some_and(|u| u.privileged)
    }

    fn is_in_transit(&self, unit: UnitId) -> bool {
        self.unit(unit).is_some_and(|u| u.in_transit)
    }

    fn threat_redirect(&self, unit: UnitId) -> Option<ThreatRedirect> {
        self.unit(unit).and_then(|u| u.redirect)
    }

    fn threat_multiplier(&self, unit: UnitId, _school: SchoolMask) -> f32 {
        self.unit(unit).map_or(1.0, |u| u.threat_multiplier)
    }

    fn is_immune_to(&self, unit: UnitId, school: SchoolMask) -> bool {
        self.unit(unit).is_some_and(|u| u.immune.contains(school))
    }

    fn has_damage_breakable_effect(&self, unit: UnitId) -> bool {
        self.unit(unit).is_some_and(|u| u.damage_breakable)
    }

    fn is_ignoring(&self, unit: UnitId, owner: UnitId) -> bool {
        self.unit(unit).is_some_and(|u| u.ignoring.contains(&owner))
    }

    fn controller(&self, unit: UnitId) -> Option<UnitId> {
        self.unit(unit).and_then(|u| u.controller)
    }
}

impl SpatialContext for ScriptedWorld {
    fn same_context(&self, a: UnitId, b: UnitId) -> bool {
        match (self.unit(a), self.unit(b)) {
            (Some(a), Some(b)) => a.context == b.context,
            _ => false,
        }
    }

    fn within_melee_range(&self, _owner: UnitId, victim: UnitId) -> bool {
        self.unit(victim).is_some_and(|u| u.in_melee)
    }

    fn is_perceptually_accessible(&self, _owner: UnitId, victim: UnitId) -> bool {
        self.unit(victim).is_some_and(|u| u.accessible)
    }

    fn is_detectable(&self, _owner: UnitId, victim: UnitId) -> bool {
        self.unit(victim).is_some_and(|u| u.detectable)
    }
}

impl AttackValidity for ScriptedWorld {
    fn can_attack(&self, _owner: UnitId, victim: UnitId) -> bool {
        self.unit(victim).is_some_and(|u| u.alive && u.attackable)
    }
}

impl AbilityCatalog for ScriptedWorld {
    fn threat_pct_mod(&self, ability: AbilityId) -> f32 {
        self.ability_pct.get(&ability).copied().unwrap_or(1.0)
    }

    fn apply_caster_threat_mod(&self, caster: UnitId, ability: AbilityId, amount: f32) -> f32 {
        self.caster_mods
            .get(&(caster, ability))
            .map_or(amount, |m| amount * m)
    }
}

/// Context over a scripted world, recording notifications into `outbox`.
pub fn context<'a>(world: &'a ScriptedWorld, outbox: &'a mut ThreatOutbox) -> ThreatContext<'a> {
    ThreatContext::new(world, outbox)
}
