//! Per-owner threat tracking and target selection for hostile combat units.
//!
//! A [`ThreatRegistry`] holds one [`ThreatTable`] per owner. Threat recorded
//! against a victim lands on a [`ThreatEdge`]; the owner's next
//! [`ThreatRegistry::select_target`] call re-sorts lazily and picks whom to attack.

pub mod ecs;
pub mod id;
pub mod model;
pub mod testutil;
pub mod threat;

pub use id::{AbilityId, SequenceGenerator, UnitId};
pub use model::{
    Ability, AbilityFlags, EdgeId, SchoolMask, StatusEvent, StatusEventKind, ThreatEdge,
    ThreatListEntry, ThreatListUpdate,
};
pub use threat::{
    ConfigError, ThreatCalculator, ThreatConfig, ThreatContext, ThreatObserver, ThreatRegistry,
    ThreatTable,
};
