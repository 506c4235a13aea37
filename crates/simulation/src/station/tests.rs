//! Unit tests for station capacity and connection slots.

use bevy::prelude::*;

use crate::config::MAX_STATION_CONNECTIONS;
use crate::error::TopologyError;
use crate::ids::{ConnectionId, PassengerId, StationId};
use crate::passenger::Passenger;

use super::*;

fn make_station(capacity: usize) -> Station {
    Station::new(StationId(1), Vec2::ZERO, StationKind::Circle, capacity)
}

fn passenger(n: u32) -> Passenger {
    Passenger::new(PassengerId(n), StationId(1), StationKind::Square)
}

#[test]
fn test_eleventh_passenger_raises_overcrowding() {
    let mut station = make_station(10);
    for n in 0..10 {
        assert_eq!(station.add_passenger(passenger(n)), None);
    }
    assert!(!station.is_overcrowded());

    let change = station.add_passenger(passenger(10));
    assert_eq!(change, Some(CapacityChange::BecameOvercrowded));
    assert!(station.is_overcrowded());
}

#[test]
fn test_removing_back_to_capacity_clears_overcrowding() {
    let mut station = make_station(10);
    for n in 0..11 {
        station.add_passenger(passenger(n));
    }
    let (removed, change) = station.remove_passenger(PassengerId(4)).unwrap();
    assert_eq!(removed.id, PassengerId(4));
    assert_eq!(change, Some(CapacityChange::Relieved));
    assert!(!station.is_overcrowded());
    assert_eq!(station.occupancy(), 10);
}

#[test]
fn test_overcrowding_is_edge_triggered() {
    let mut station = make_station(2);
    station.add_passenger(passenger(0));
    station.add_passenger(passenger(1));
    assert_eq!(
        station.add_passenger(passenger(2)),
        Some(CapacityChange::BecameOvercrowded)
    );
    // Further additions keep the flag but do not signal again
    assert_eq!(station.add_passenger(passenger(3)), None);
    assert!(station.is_overcrowded());
    // Dropping from 4 to 3 is still over capacity
    let (_, change) = station.remove_passenger(PassengerId(3)).unwrap();
    assert_eq!(change, None);
    assert!(station.is_overcrowded());
}

#[test]
fn test_add_then_remove_restores_occupancy() {
    let mut station = make_station(3);
    for n in 0..3 {
        station.add_passenger(passenger(n));
    }
    let before = station.occupancy();
    station.add_passenger(passenger(99));
    station.remove_passenger(PassengerId(99));
    assert_eq!(station.occupancy(), before);
    assert!(!station.is_overcrowded());
}

#[test]
fn test_remove_missing_passenger_returns_none() {
    let mut station = make_station(3);
    station.add_passenger(passenger(0));
    assert!(station.remove_passenger(PassengerId(5)).is_none());
    assert_eq!(station.occupancy(), 1);
}

#[test]
fn test_take_passenger_where_keeps_arrival_order() {
    let mut station = make_station(5);
    let mut triangle = passenger(0);
    triangle.desired = StationKind::Triangle;
    station.add_passenger(triangle);
    station.add_passenger(passenger(1));
    station.add_passenger(passenger(2));

    let (taken, _) = station
        .take_passenger_where(|p| p.desired == StationKind::Square)
        .unwrap();
    assert_eq!(taken.id, PassengerId(1));
    let ids: Vec<PassengerId> = station.passengers().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PassengerId(0), PassengerId(2)]);
}

#[test]
fn test_upgrade_capacity_relieves_station() {
    let mut station = make_station(1);
    station.add_passenger(passenger(0));
    station.add_passenger(passenger(1));
    assert!(station.is_overcrowded());
    assert_eq!(station.set_capacity(4), Some(CapacityChange::Relieved));
    assert!(!station.is_overcrowded());
}

#[test]
fn test_connection_slots_are_bounded() {
    let mut station = make_station(3);
    for n in 0..MAX_STATION_CONNECTIONS as u32 {
        station.attach_connection(ConnectionId(n)).unwrap();
    }
    assert!(!station.has_free_slot());
    assert_eq!(
        station.attach_connection(ConnectionId(100)),
        Err(TopologyError::StationSaturated(StationId(1)))
    );
    assert!(station.detach_connection(ConnectionId(0)));
    assert!(!station.detach_connection(ConnectionId(0)));
    assert!(station.has_free_slot());
}
