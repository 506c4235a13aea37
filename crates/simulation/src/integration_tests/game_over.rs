use crate::config::SimulationConfig;
use crate::station::StationKind;
use crate::test_harness::TestNetwork;

fn crowded(delay: u32) -> TestNetwork {
    TestNetwork::with_config(SimulationConfig {
        station_capacity: 1,
        overcrowding_delay_ticks: delay,
        passenger_spawn_interval: 0,
        ..Default::default()
    })
}

#[test]
fn station_over_capacity_past_delay_ends_session() {
    let mut sim = crowded(5);
    let station = sim.station(0.0, 0.0, StationKind::Circle);
    sim.passenger(station, StationKind::Square);
    sim.passenger(station, StationKind::Square);

    sim.tick(4);
    assert!(sim.game_over_events().is_empty());
    assert_eq!(sim.tracker().ticks_overcrowded(station), Some(4));

    sim.tick(1);
    let events = sim.game_over_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].station, station);
    assert!(!sim.clock().running, "game over stops the clock");

    sim.tick(10);
    assert_eq!(sim.game_over_events().len(), 1);
    assert_eq!(sim.clock().ticks, 5);
}

#[test]
fn relieved_station_does_not_end_session() {
    let mut sim = crowded(5);
    let station = sim.station(0.0, 0.0, StationKind::Circle);
    sim.passenger(station, StationKind::Square);
    let extra = sim.passenger(station, StationKind::Square);
    sim.tick(3);
    sim.network_mut().remove_passenger(station, extra);
    sim.tick(10);
    assert!(sim.game_over_events().is_empty());
    assert!(sim.clock().running);
}
