use bevy_ecs::schedule::{ExecutorKind, Schedule, ScheduleLabel};

use super::outbox::broadcast_threat_updates;

/// Schedule label for the per-tick threat maintenance pass.
/// Run manually each tick via `app.world_mut().run_schedule(ThreatTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreatTick;

/// Threat tables are mutated by a single owning thread, so the schedule
/// runs single-threaded.
pub fn configure_threat_schedule() -> Schedule {
    let mut schedule = Schedule::new(ThreatTick);
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(broadcast_threat_updates);
    schedule
}
