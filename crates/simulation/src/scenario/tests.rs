//! Unit tests for scenario loading and release.

use crate::config::SimulationConfig;
use crate::error::ScenarioError;
use crate::geometry::WaterMap;
use crate::network::SubwayNetwork;
use crate::station::StationKind;

use super::*;

const SCENARIO: &str = r#"{
    "name": "harbour",
    "maps": [{
        "name": "bay",
        "stations": [
            { "at_tick": 0, "position": [0.0, 0.0], "kind": "circle" },
            { "at_tick": 0, "position": [10.0, 0.0], "kind": "square" },
            { "at_tick": 5, "position": [20.0, 0.0], "kind": "triangle" }
        ],
        "water": [[[4.0, -5.0], [6.0, -5.0], [6.0, 5.0], [4.0, 5.0]]],
        "lines": [[0, 1, 2]]
    }]
}"#;

#[test]
fn test_load_first_map() {
    let map = load_scenario(SCENARIO).unwrap();
    assert_eq!(map.name, "bay");
    assert_eq!(map.stations.len(), 3);
    assert_eq!(map.stations[2].kind, StationKind::Triangle);
    assert_eq!(map.water.len(), 1);
}

#[test]
fn test_missing_optional_fields_default() {
    let json = r#"{"name": "x", "maps": [{"name": "m", "stations": [{"position": [1.0, 2.0], "kind": "star"}]}]}"#;
    let map = load_scenario(json).unwrap();
    assert_eq!(map.stations[0].at_tick, 0);
    assert!(map.water.is_empty());
    assert!(map.lines.is_empty());
}

#[test]
fn test_rejects_bad_input() {
    assert!(matches!(load_scenario("{"), Err(ScenarioError::Parse(_))));
    assert!(matches!(
        load_scenario(r#"{"name": "x", "maps": []}"#),
        Err(ScenarioError::NoMaps)
    ));
    let json = r#"{"name": "x", "maps": [{"name": "m", "stations": [], "lines": [[0, 3]]}]}"#;
    assert!(matches!(
        load_scenario(json),
        Err(ScenarioError::UnknownStationIndex { index: 0, .. })
    ));
}

#[test]
fn test_stations_released_when_due() {
    let mut schedule = ScenarioSchedule::new(load_scenario(SCENARIO).unwrap());
    let water = schedule.water_map();
    let mut net = SubwayNetwork::new(&SimulationConfig::default());

    let first = schedule.release_due(1, &mut net, &water);
    assert_eq!(first.len(), 2);
    assert_eq!(net.station_count(), 2);
    assert!(net.lines().next().is_none(), "line waits for all its stations");

    assert!(schedule.release_due(3, &mut net, &water).is_empty());
    let later = schedule.release_due(5, &mut net, &water);
    assert_eq!(later, vec![schedule.station_id(2).unwrap()]);
    assert!(schedule.is_complete());

    let line = net.lines().next().unwrap();
    assert_eq!(line.stations.len(), 3);
    // The first section runs through the water polygon.
    assert_eq!(net.section_has_tunnel(line.sections[0]), Some(true));
    assert_eq!(net.section_has_tunnel(line.sections[1]), Some(false));
}

#[test]
fn test_rewind_replays_map() {
    let mut schedule = ScenarioSchedule::new(load_scenario(SCENARIO).unwrap());
    let mut net = SubwayNetwork::new(&SimulationConfig::default());
    schedule.release_due(10, &mut net, &WaterMap::default());
    assert!(schedule.is_complete());

    schedule.rewind();
    assert!(!schedule.is_complete());
    assert_eq!(schedule.station_id(0), None);
    let mut fresh = SubwayNetwork::new(&SimulationConfig::default());
    assert_eq!(schedule.release_due(10, &mut fresh, &WaterMap::default()).len(), 3);
}
