use bevy_app::{App, Plugin};

use super::outbox::{ThreatOutbox, ThreatTickDelta};
use super::schedule::configure_threat_schedule;
use crate::threat::{ThreatConfig, ThreatRegistry};

/// Installs the threat registry, the tick delta and outbox resources, and the
/// `ThreatTick` schedule.
#[derive(Debug, Clone, Default)]
pub struct ThreatPlugin {
    pub config: ThreatConfig,
}

impl Plugin for ThreatPlugin {
    fn build(&self, app: &mut App) {
        // A host may insert a pre-populated registry before adding the plugin.
        if !app.world().contains_resource::<ThreatRegistry>() {
            app.insert_resource(ThreatRegistry::new(self.config.clone()));
        }
        app.init_resource::<ThreatTickDelta>();
        app.init_resource::<ThreatOutbox>();
        app.add_schedule(configure_threat_schedule());
    }
}

/// Build a headless app carrying only the threat plugin.
///
/// ```no_run
/// # use threat_table::ecs::{build_threat_app, ThreatTick, ThreatTickDelta};
/// # use threat_table::threat::ThreatConfig;
/// let mut app = build_threat_app(ThreatConfig::default());
/// app.world_mut().resource_mut::<ThreatTickDelta>().0 = 100;
/// app.world_mut().run_schedule(ThreatTick);
/// ```
pub fn build_threat_app(config: ThreatConfig) -> App {
    let mut app = App::empty();
    app.add_plugins(ThreatPlugin { config });
    app
}
