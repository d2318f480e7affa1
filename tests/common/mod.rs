#![allow(dead_code)]

use threat_table::ecs::ThreatOutbox;
use threat_table::testutil::{ScriptedUnit, ScriptedWorld, context};
use threat_table::{Ability, SchoolMask, ThreatConfig, ThreatRegistry, UnitId};

pub const OWNER: UnitId = UnitId(1);
pub const V1: UnitId = UnitId(11);
pub const V2: UnitId = UnitId(12);
pub const V3: UnitId = UnitId(13);
pub const SUB: UnitId = UnitId(20);

/// One owner with a table plus a scripted world around it.
pub struct Harness {
    pub world: ScriptedWorld,
    pub registry: ThreatRegistry,
    pub outbox: ThreatOutbox,
}

impl Harness {
    pub fn new(victims: &[UnitId]) -> Self {
        Self::with_config(victims, ThreatConfig::default())
    }

    pub fn with_config(victims: &[UnitId], config: ThreatConfig) -> Self {
        let mut world = ScriptedWorld::new();
        world.spawn(OWNER);
        for &v in victims {
            world.spawn(v);
        }
        let mut registry = ThreatRegistry::new(config);
        registry.create_table(OWNER);
        Self {
            world,
            registry,
            outbox: ThreatOutbox::new(),
        }
    }

    pub fn unit(&mut self, id: UnitId) -> &mut ScriptedUnit {
        self.world.unit_mut(id)
    }

    pub fn add_owner(&mut self, owner: UnitId) {
        self.world.spawn(owner);
        self.registry.create_table(owner);
    }

    pub fn record(&mut self, victim: UnitId, amount: f32) {
        self.record_for(OWNER, victim, amount);
    }

    pub fn record_for(&mut self, owner: UnitId, victim: UnitId, amount: f32) {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry
            .record_threat(&mut ctx, owner, victim, amount, SchoolMask::PHYSICAL, None);
    }

    pub fn record_ability(&mut self, victim: UnitId, amount: f32, ability: &Ability) {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry.record_threat(
            &mut ctx,
            OWNER,
            victim,
            amount,
            ability.school,
            Some(ability),
        );
    }

    pub fn modify_pct(&mut self, victim: UnitId, pct: i32) {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry
            .apply_percent_modifier(&mut ctx, OWNER, victim, pct);
    }

    pub fn select(&mut self) -> Option<UnitId> {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry.select_target(&mut ctx, OWNER)
    }

    pub fn refresh(&mut self, victim: UnitId) {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry.refresh_victim(&mut ctx, victim);
    }

    pub fn taunt(&mut self, taunter: UnitId) {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry.apply_taunt(&mut ctx, OWNER, taunter);
    }

    pub fn clear_taunt(&mut self, taunter: UnitId) {
        let mut ctx = context(&self.world, &mut self.outbox);
        self.registry.clear_taunt(&mut ctx, OWNER, taunter);
    }

    /// Canonical threat, searching both sets.
    pub fn threat(&self, victim: UnitId) -> f32 {
        self.registry.threat_without_temp(OWNER, victim, true)
    }

    pub fn has_edge(&self, victim: UnitId) -> bool {
        self.registry.edge(OWNER, victim).is_some()
    }

    pub fn is_reachable(&self, victim: UnitId) -> bool {
        self.registry
            .edge(OWNER, victim)
            .is_some_and(|e| e.is_reachable())
    }
}
