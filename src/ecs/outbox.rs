use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use serde::{Deserialize, Serialize};

use crate::id::UnitId;
use crate::model::ThreatListUpdate;
use crate::threat::{ThreatObserver, ThreatRegistry};

/// Milliseconds of simulation time elapsed this tick. Set by the host before
/// running [`ThreatTick`](super::ThreatTick).
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ThreatTickDelta(pub u32);

/// A client-visible change queued for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreatNotification {
    TargetChanged { owner: UnitId, victim: UnitId },
    EdgeRemoved { owner: UnitId, victim: UnitId },
    ThreatListUpdate(ThreatListUpdate),
}

/// Collects outbound notifications until the host drains them.
#[derive(Resource, Debug, Default)]
pub struct ThreatOutbox {
    pub notifications: Vec<ThreatNotification>,
}

impl ThreatOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&mut self) -> Vec<ThreatNotification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn targets_changed(&self) -> Vec<(UnitId, UnitId)> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                ThreatNotification::TargetChanged { owner, victim } => Some((*owner, *victim)),
                _ => None,
            })
            .collect()
    }

    pub fn edges_removed(&self) -> Vec<(UnitId, UnitId)> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                ThreatNotification::EdgeRemoved { owner, victim } => Some((*owner, *victim)),
                _ => None,
            })
            .collect()
    }

    pub fn list_updates(&self) -> Vec<&ThreatListUpdate> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                ThreatNotification::ThreatListUpdate(update) => Some(update),
                _ => None,
            })
            .collect()
    }
}

impl ThreatObserver for ThreatOutbox {
    fn on_target_changed(&mut self, owner: UnitId, victim: UnitId) {
        self.notifications
            .push(ThreatNotification::TargetChanged { owner, victim });
    }

    fn on_edge_removed(&mut self, owner: UnitId, victim: UnitId) {
        self.notifications
            .push(ThreatNotification::EdgeRemoved { owner, victim });
    }

    fn on_threat_list_update(&mut self, update: &ThreatListUpdate) {
        self.notifications
            .push(ThreatNotification::ThreatListUpdate(update.clone()));
    }
}

/// Advance every table's notify timer and queue the throttled list updates that are due.
pub fn broadcast_threat_updates(
    delta: Res<ThreatTickDelta>,
    mut registry: ResMut<ThreatRegistry>,
    mut outbox: ResMut<ThreatOutbox>,
) {
    registry.tick_notifications(delta.0, &mut *outbox);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_serialize_with_type_tag() {
        let n = ThreatNotification::TargetChanged {
            owner: UnitId(1),
            victim: UnitId(2),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "target_changed");
        assert_eq!(json["owner"], 1);
        assert_eq!(json["victim"], 2);

        let update = ThreatNotification::ThreatListUpdate(ThreatListUpdate {
            owner: UnitId(1),
            current_target: None,
            entries: Vec::new(),
        });
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "threat_list_update");
        assert_eq!(json["owner"], 1);
    }

    #[test]
    fn outbox_records_and_drains() {
        let mut outbox = ThreatOutbox::new();
        outbox.on_target_changed(UnitId(1), UnitId(2));
        outbox.on_edge_removed(UnitId(1), UnitId(3));
        assert_eq!(outbox.targets_changed(), vec![(UnitId(1), UnitId(2))]);
        assert_eq!(outbox.edges_removed(), vec![(UnitId(1), UnitId(3))]);

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert!(outbox.is_empty());
    }
}
