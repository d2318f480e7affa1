pub mod outbox;
pub mod plugin;
pub mod schedule;

pub use outbox::{ThreatNotification, ThreatOutbox, ThreatTickDelta, broadcast_threat_updates};
pub use plugin::{ThreatPlugin, build_threat_app};
pub use schedule::{ThreatTick, configure_threat_schedule};
