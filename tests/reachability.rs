mod common;

use common::*;
use threat_table::ThreatConfig;
use threat_table::testutil::context;

#[test]
fn leaving_and_reentering_context_preserves_threat() {
    let mut h = Harness::new(&[V1]);
    h.record(V1, 75.0);
    assert_eq!(h.select(), Some(V1));

    h.unit(V1).context = 2;
    h.refresh(V1);
    assert!(!h.is_reachable(V1));
    assert_eq!(h.registry.current_target(OWNER), None);
    assert_eq!(h.registry.threat(OWNER, V1, false), 0.0);
    assert_eq!(h.registry.threat(OWNER, V1, true), 75.0);
    assert_eq!(h.registry.unreachable_list(OWNER).len(), 1);
    assert!(h.registry.is_threat_list_empty(OWNER));

    h.unit(V1).context = 0;
    h.refresh(V1);
    assert!(h.is_reachable(V1));
    assert_eq!(h.threat(V1), 75.0);
    assert_eq!(h.registry.threat_list(OWNER).len(), 1);
    assert!(h.registry.unreachable_list(OWNER).is_empty());
    assert_eq!(h.select(), Some(V1));
}

#[test]
fn in_range_grace_keeps_inaccessible_victim_reachable() {
    let mut h = Harness::new(&[V1, V2]);
    h.record(V1, 10.0);
    h.record(V2, 10.0);
    h.unit(V1).accessible = false;
    h.unit(V1).in_melee = true;
    h.unit(V2).accessible = false;

    h.refresh(V1);
    h.refresh(V2);

    assert!(h.is_reachable(V1));
    assert!(!h.is_reachable(V2));
}

#[test]
fn grace_can_be_disabled() {
    let config = ThreatConfig {
        engagement_grace: false,
        ..ThreatConfig::default()
    };
    let mut h = Harness::with_config(&[V1], config);
    h.record(V1, 10.0);
    h.unit(V1).accessible = false;
    h.unit(V1).in_melee = true;

    h.refresh(V1);
    assert!(!h.is_reachable(V1));
}

#[test]
fn victims_in_transit_or_observing_are_unreachable() {
    let mut h = Harness::new(&[V1, V2]);
    h.record(V1, 10.0);
    h.record(V2, 10.0);
    h.unit(V1).in_transit = true;
    h.unit(V2).privileged = true;

    h.refresh(V1);
    h.refresh(V2);

    assert!(!h.is_reachable(V1));
    assert!(!h.is_reachable(V2));
    assert_eq!(h.registry.edge_count(OWNER), 2);
}

#[test]
fn threat_on_unreachable_edge_rechecks_reachability() {
    let mut h = Harness::new(&[V1]);
    h.record(V1, 10.0);
    h.unit(V1).accessible = false;
    h.refresh(V1);
    assert!(!h.is_reachable(V1));

    h.unit(V1).accessible = true;
    h.record(V1, 5.0);
    assert!(h.is_reachable(V1));
    assert_eq!(h.threat(V1), 15.0);
}

#[test]
fn going_unreachable_in_context_notifies_removal() {
    let mut h = Harness::new(&[V1]);
    h.record(V1, 10.0);
    h.unit(V1).accessible = false;
    h.refresh(V1);
    assert_eq!(h.outbox.edges_removed(), vec![(OWNER, V1)]);
}

#[test]
fn going_unreachable_out_of_context_is_silent() {
    let mut h = Harness::new(&[V1]);
    h.record(V1, 10.0);
    h.unit(V1).context = 9;
    h.refresh(V1);
    assert!(h.outbox.edges_removed().is_empty());
}

#[test]
fn detached_victim_relinks_on_next_threat() {
    let mut h = Harness::new(&[V1]);
    h.record(V1, 20.0);
    {
        let mut ctx = context(&h.world, &mut h.outbox);
        h.registry.detach_victim(&mut ctx, V1);
    }
    let edge = h.registry.edge(OWNER, V1).unwrap();
    assert!(!edge.is_linked());
    assert!(!edge.is_reachable());

    h.record(V1, 5.0);
    let edge = h.registry.edge(OWNER, V1).unwrap();
    assert!(edge.is_linked());
    assert!(edge.is_reachable());
    assert_eq!(edge.threat(), 25.0);
}

#[test]
fn detached_victim_that_never_returns_is_removed_on_recheck() {
    let mut h = Harness::new(&[V1]);
    h.record(V1, 20.0);
    {
        let mut ctx = context(&h.world, &mut h.outbox);
        h.registry.detach_victim(&mut ctx, V1);
    }
    assert_eq!(h.outbox.drain().len(), 1);
    h.world.despawn(V1);
    h.refresh(V1);

    assert!(!h.has_edge(V1));
    assert_eq!(h.registry.total_edges(), 0);
    assert_eq!(h.outbox.edges_removed(), vec![(OWNER, V1)]);
    assert!(h.registry.hostile_owners(V1).is_empty());
}

#[test]
fn returning_edge_competes_on_next_selection() {
    let mut h = Harness::new(&[V1, V2]);
    h.record(V1, 50.0);
    h.record(V2, 500.0);
    h.unit(V2).context = 4;
    h.refresh(V2);
    assert_eq!(h.select(), Some(V1));

    h.unit(V2).context = 0;
    h.refresh(V2);
    assert!(h.registry.is_dirty(OWNER));
    assert_eq!(h.select(), Some(V2));
}
