use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::inventory::{DeployTarget, InventoryDeployRequest, InventoryItem};
use crate::notifications::NetworkNotification;
use crate::test_harness::TestNetwork;

const TRIANGLE_TOWN: &str = r#"{
    "name": "triangle town",
    "maps": [{
        "name": "town",
        "stations": [
            { "at_tick": 0, "position": [0.0, 0.0], "kind": "circle" },
            { "at_tick": 0, "position": [20.0, 0.0], "kind": "square" },
            { "at_tick": 0, "position": [40.0, 0.0], "kind": "triangle" },
            { "at_tick": 50, "position": [40.0, 30.0], "kind": "circle" }
        ],
        "water": [[[28.0, -5.0], [32.0, -5.0], [32.0, 5.0], [28.0, 5.0]]],
        "lines": [[0, 1, 2]]
    }]
}"#;

fn town() -> TestNetwork {
    TestNetwork::with_config(SimulationConfig {
        passenger_spawn_interval: 10,
        ..Default::default()
    })
    .with_scenario(TRIANGLE_TOWN)
}

#[test]
fn stations_appear_on_schedule() {
    let mut sim = town();
    sim.tick(1);
    assert_eq!(sim.network().station_count(), 3);
    assert_eq!(sim.network().lines().count(), 1);
    sim.tick(48);
    assert_eq!(sim.network().station_count(), 3);
    sim.tick(1);
    assert_eq!(sim.network().station_count(), 4);
}

#[test]
fn scenario_water_makes_a_tunnel() {
    let mut sim = town();
    sim.tick(1);
    let line = sim.network().lines().next().cloned().unwrap();
    assert_eq!(sim.network().section_has_tunnel(line.sections[0]), Some(false));
    assert_eq!(sim.network().section_has_tunnel(line.sections[1]), Some(true));
}

#[test]
fn deployed_train_serves_spawned_demand() {
    let mut sim = town();
    sim.tick(1);
    let line = sim.network().lines().next().map(|l| l.id).unwrap();
    sim.deploy(InventoryDeployRequest {
        item: InventoryItem::Train,
        target: DeployTarget::Line(line),
        position: Vec2::new(21.0, 1.0),
    });
    sim.clear_notifications();
    sim.tick(1);
    assert!(sim.notifications().iter().any(|n| matches!(
        n,
        NetworkNotification::InventoryDeployed {
            item: InventoryItem::Train,
            position,
            ..
        } if *position == Vec2::new(20.0, 0.0)
    )));

    sim.tick(600);
    let stats = sim.network().stats();
    assert!(stats.passengers_spawned >= 60);
    assert!(stats.passengers_delivered > 0);
    assert!(sim.game_over_events().is_empty());
}

#[test]
fn demand_is_deterministic_for_a_seed() {
    let run = || {
        let mut sim = town();
        sim.tick(200);
        sim.network()
            .stations()
            .map(|s| s.passengers().iter().map(|p| p.desired).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
