use std::time::Duration;

use bevy::prelude::*;

use crate::clock::ClockSignal;
use crate::station::StationKind;
use crate::test_harness::TestNetwork;

const TWO_STOPS: &str = r#"{
    "name": "clock",
    "maps": [{
        "name": "line",
        "stations": [
            { "at_tick": 0, "position": [0.0, 0.0], "kind": "circle" },
            { "at_tick": 0, "position": [10.0, 0.0], "kind": "square" }
        ],
        "lines": [[0, 1]]
    }]
}"#;

#[test]
fn pause_freezes_ticks_and_start_resumes() {
    let mut sim = TestNetwork::new();
    sim.tick(3);
    sim.send_clock(ClockSignal::Pause);
    sim.tick(5);
    assert_eq!(sim.clock().ticks, 3);
    assert!(!sim.clock().running);

    sim.send_clock(ClockSignal::Start);
    sim.tick(2);
    assert_eq!(sim.clock().ticks, 5);
}

#[test]
fn paused_session_still_publishes_edits() {
    let mut sim = TestNetwork::new();
    sim.send_clock(ClockSignal::Pause);
    sim.tick(1);
    sim.station(0.0, 0.0, StationKind::Star);
    sim.tick(1);
    assert_eq!(sim.notifications().len(), 1);
}

#[test]
fn speed_change_scales_fixed_timestep() {
    let mut sim = TestNetwork::new();
    sim.send_clock(ClockSignal::SpeedChange(4.0));
    sim.tick(1);
    sim.world_mut().run_schedule(Update);
    let timestep = sim.resource::<Time<Fixed>>().timestep();
    assert_eq!(timestep, Duration::from_millis(100).div_f32(4.0));
}

#[test]
fn reset_rebuilds_session_from_scenario() {
    let mut sim = TestNetwork::new().with_scenario(TWO_STOPS);
    sim.tick(3);
    let line = sim.network().lines().next().map(|l| l.id).unwrap();
    sim.train(line, Vec2::ZERO);
    assert_eq!(sim.network().trains().count(), 1);

    sim.send_clock(ClockSignal::Reset);
    sim.tick(1);
    assert_eq!(sim.clock().ticks, 1);
    assert_eq!(sim.network().station_count(), 2);
    assert_eq!(sim.network().lines().count(), 1);
    assert_eq!(sim.network().trains().count(), 0);
    assert_eq!(sim.tracker().overcrowded_count(), 0);
}
