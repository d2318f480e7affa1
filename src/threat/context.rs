use crate::id::{AbilityId, UnitId};
use crate::model::{SchoolMask, ThreatListUpdate};

/// Percentage of a unit's incoming threat diverted to a substitute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatRedirect {
    pub target: UnitId,
    /// Whole percent, 0..=100.
    pub pct: u32,
}

/// Live unit state the host simulation exposes to threat resolution.
pub trait UnitDirectory {
    /// True while the unit can be resolved from its id.
    fn exists(&self, unit: UnitId) -> bool;
    fn is_alive(&self, unit: UnitId) -> bool;
    /// Administrator/spectator currently in oversight mode.
    fn is_privileged_observer(&self, unit: UnitId) -> bool;
    /// Mid-transition (loading, flight path, map transfer).
    fn is_in_transit(&self, unit: UnitId) -> bool;

    fn threat_redirect(&self, unit: UnitId) -> Option<ThreatRedirect> {
        let _ = unit;
        None
    }

    /// Aggregate multiplier from the unit's own incoming-threat modifiers.
    fn threat_multiplier(&self, unit: UnitId, school: SchoolMask) -> f32 {
        let _ = (unit, school);
        1.0
    }

    /// School of the owner's basic attacks.
    fn melee_school(&self, owner: UnitId) -> SchoolMask {
        let _ = owner;
        SchoolMask::PHYSICAL
    }

    fn is_immune_to(&self, unit: UnitId, school: SchoolMask) -> bool {
        let _ = (unit, school);
        false
    }

    /// Holds a negative effect that breaks on damage (sheep, sap, ...).
    fn has_damage_breakable_effect(&self, unit: UnitId) -> bool {
        let _ = unit;
        false
    }

    /// `unit` carries an effect telling `owner` to disregard it.
    fn is_ignoring(&self, unit: UnitId, owner: UnitId) -> bool {
        let _ = (unit, owner);
        false
    }

    /// Summoner or charmer in control of `unit`.
    fn controller(&self, unit: UnitId) -> Option<UnitId> {
        let _ = unit;
        None
    }
}

pub trait SpatialContext {
    /// Same map and phase.
    fn same_context(&self, a: UnitId, b: UnitId) -> bool;
    fn within_melee_range(&self, owner: UnitId, victim: UnitId) -> bool;

    /// Range inside which an otherwise inaccessible victim stays reachable.
    fn within_engagement_range(&self, owner: UnitId, victim: UnitId) -> bool {
        self.within_melee_range(owner, victim)
    }

    fn is_perceptually_accessible(&self, owner: UnitId, victim: UnitId) -> bool;
    /// Accounts for stealth and feign-death style concealment.
    fn is_detectable(&self, owner: UnitId, victim: UnitId) -> bool;
}

pub trait AttackValidity {
    fn can_attack(&self, owner: UnitId, victim: UnitId) -> bool;
}

pub trait AbilityCatalog {
    /// Configured threat multiplier of an ability.
    fn threat_pct_mod(&self, ability: AbilityId) -> f32 {
        let _ = ability;
        1.0
    }

    /// Caster-side percentage modifiers keyed by ability ("spell mods").
    fn apply_caster_threat_mod(&self, caster: UnitId, ability: AbilityId, amount: f32) -> f32 {
        let _ = (caster, ability);
        amount
    }
}

/// Outbound sink for client-visible threat changes.
///
/// Target changes and removals fire immediately; list updates arrive
/// throttled by each table's notify timer.
pub trait ThreatObserver {
    fn on_target_changed(&mut self, owner: UnitId, victim: UnitId) {
        let _ = (owner, victim);
    }

    fn on_edge_removed(&mut self, owner: UnitId, victim: UnitId) {
        let _ = (owner, victim);
    }

    fn on_threat_list_update(&mut self, update: &ThreatListUpdate) {
        let _ = update;
    }
}

/// Observer that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ThreatObserver for NullObserver {}

/// Collaborators handed to every registry call.
///
/// Bundled so a call site passes one value and so collaborators can grow
/// without touching every operation signature.
pub struct ThreatContext<'a> {
    pub units: &'a dyn UnitDirectory,
    pub spatial: &'a dyn SpatialContext,
    pub validity: &'a dyn AttackValidity,
    pub abilities: &'a dyn AbilityCatalog,
    pub observer: &'a mut dyn ThreatObserver,
}

impl<'a> ThreatContext<'a> {
    /// Build a context from one host type that implements every query trait.
    pub fn new<W>(world: &'a W, observer: &'a mut dyn ThreatObserver) -> Self
    where
        W: UnitDirectory + SpatialContext + AttackValidity + AbilityCatalog,
    {
        Self {
            units: world,
            spatial: world,
            validity: world,
            abilities: world,
            observer,
        }
    }

    /// The owner's selection-time validity check: detectable and attackable.
    pub fn can_engage(&self, owner: UnitId, victim: UnitId) -> bool {
        self.spatial.is_detectable(owner, victim) && self.validity.can_attack(owner, victim)
    }

    /// Victims the owner should only fall back to: immune to its basic
    /// attacks, protected by a damage-breakable effect, or ignoring it.
    pub fn is_low_priority(&self, owner: UnitId, victim: UnitId) -> bool {
        self.is_poor_target(owner, victim) || self.units.is_ignoring(victim, owner)
    }

    /// Immune to the owner's basic attacks or protected by a damage-breakable effect.
    pub fn is_poor_target(&self, owner: UnitId, victim: UnitId) -> bool {
        self.units
            .is_immune_to(victim, self.units.melee_school(owner))
            || self.units.has_damage_breakable_effect(victim)
    }
}
