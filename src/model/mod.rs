pub mod ability;
pub mod edge;
pub mod status;
pub mod update;

pub use ability::{Ability, AbilityFlags, SchoolMask};
pub use edge::{EdgeId, ThreatEdge};
pub use status::{StatusEvent, StatusEventKind};
pub use update::{ThreatListEntry, ThreatListUpdate};
