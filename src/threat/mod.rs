mod calc;
mod config;
mod context;
mod edge_set;
mod registry;
mod selection;
mod table;

pub use calc::{ThreatCalculator, add_pct, calculate_pct};
pub use config::{ConfigError, ThreatConfig};
pub use context::{
    AbilityCatalog, AttackValidity, NullObserver, SpatialContext, ThreatContext, ThreatObserver,
    ThreatRedirect, UnitDirectory,
};
pub use edge_set::{EdgeSet, threat_order};
pub use registry::ThreatRegistry;
pub use selection::select_next_victim;
pub use table::ThreatTable;
