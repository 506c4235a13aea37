//! Registry operations: add/remove entities, adjacency queries, passenger queues.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::config::SimulationConfig;
use crate::ids::{ConnectionId, IdAllocator, LineId, PassengerId, SectionId, StationId, SubSectionId, TrainId};
use crate::notifications::NetworkNotification;
use crate::passenger::Passenger;
use crate::station::{CapacityChange, Station, StationKind};
use crate::train::Train;

use super::types::*;

/// A station reachable from another one through a single section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub station: StationId,
    pub section: SectionId,
    /// Departure connection in the origin station.
    pub connection: ConnectionId,
    pub length: f32,
}

impl SubwayNetwork {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            stations: BTreeMap::new(),
            connections: BTreeMap::new(),
            subsections: BTreeMap::new(),
            sections: BTreeMap::new(),
            lines: BTreeMap::new(),
            trains: BTreeMap::new(),
            ids: IdAllocator::default(),
            topology_version: 0,
            overcrowding_delay_ticks: config.overcrowding_delay_ticks,
            station_capacity: config.station_capacity,
            car_capacity: config.car_capacity,
            train_speed: config.train_speed,
            stats: NetworkStats::default(),
            outbox: Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Stations
    // -------------------------------------------------------------------------

    /// Allocate an id for a station built by the caller.
    pub fn next_station_id(&mut self) -> StationId {
        self.ids.station()
    }

    /// Register a station. Returns `false` if a station with that id exists.
    pub fn add_station(&mut self, station: Station) -> bool {
        if self.stations.contains_key(&station.id) {
            return false;
        }
        self.ids.reserve_station(station.id);
        self.outbox.push(NetworkNotification::StationAdded {
            station: station.id,
            position: station.position,
            kind: station.kind,
        });
        self.stations.insert(station.id, station);
        true
    }

    /// Allocate, build and register a station with the default capacity.
    pub fn spawn_station(&mut self, position: Vec2, kind: StationKind) -> StationId {
        let id = self.ids.station();
        self.add_station(Station::new(id, position, kind, self.station_capacity));
        id
    }

    /// Unregister a station. Refused while any connection still anchors it,
    /// so no section is ever left pointing at a missing station.
    pub fn remove_station(&mut self, id: StationId) -> bool {
        let Some(station) = self.stations.get_mut(&id) else {
            return false;
        };
        if !station.connections.is_empty() {
            warn!("refusing to remove {id}: still anchored by {} connections", station.connections.len());
            return false;
        }
        let dropped = station.drain_passengers();
        if !dropped.is_empty() {
            debug!("{id} removed with {} waiting passengers", dropped.len());
        }
        for passenger in dropped {
            self.outbox.push(NetworkNotification::PassengerRemoved {
                station: id,
                passenger: passenger.id,
            });
        }
        self.stations.remove(&id);
        self.topology_version += 1;
        true
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Distinct station kinds currently on the map, in kind order.
    pub fn present_kinds(&self) -> Vec<StationKind> {
        let mut kinds: Vec<StationKind> = self.stations.values().map(|s| s.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn is_station_on_line(&self, line: LineId, station: StationId) -> bool {
        self.lines.get(&line).is_some_and(|l| l.contains(station))
    }

    // -------------------------------------------------------------------------
    // Sections, connections, subsections
    // -------------------------------------------------------------------------

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(&id)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn subsection(&self, id: SubSectionId) -> Option<&SubSection> {
        self.subsections.get(&id)
    }

    pub fn section_metrics(&self, id: SectionId) -> Option<SectionMetrics> {
        self.sections.get(&id).map(|s| s.metrics(&self.subsections))
    }

    pub fn section_length(&self, id: SectionId) -> Option<f32> {
        self.section_metrics(id).map(|m| m.length)
    }

    pub fn section_has_tunnel(&self, id: SectionId) -> Option<bool> {
        self.section_metrics(id).map(|m| m.has_tunnel)
    }

    /// Whether a connection id is still registered (i.e. anchored in the graph).
    pub fn is_anchored(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Points of a section in travel order starting at `from`.
    pub fn section_points(&self, id: SectionId, from: StationId) -> Option<Vec<Vec2>> {
        let section = self.sections.get(&id)?;
        let mut points: Vec<Vec2> = section
            .connections
            .iter()
            .filter_map(|c| self.connections.get(c).map(|c| c.position))
            .collect();
        if section.stations.second == from {
            points.reverse();
        } else if section.stations.first != from {
            return None;
        }
        Some(points)
    }

    /// Stations one section away from `station`, in connection order.
    pub fn neighbors(&self, station: StationId) -> Vec<Neighbor> {
        let Some(origin) = self.stations.get(&station) else {
            return Vec::new();
        };
        origin
            .connections
            .iter()
            .filter_map(|&connection| {
                let section_id = self.connections.get(&connection)?.section?;
                let section = self.sections.get(&section_id)?;
                let &other = section.stations.other(&station)?;
                Some(Neighbor {
                    station: other,
                    section: section_id,
                    connection,
                    length: section.metrics(&self.subsections).length,
                })
            })
            .collect()
    }

    pub fn topology_version(&self) -> u64 {
        self.topology_version
    }

    pub fn stats(&self) -> NetworkStats {
        self.stats
    }

    pub fn overcrowding_delay_ticks(&self) -> u32 {
        self.overcrowding_delay_ticks
    }

    // -------------------------------------------------------------------------
    // Trains
    // -------------------------------------------------------------------------

    pub fn next_train_id(&mut self) -> TrainId {
        self.ids.train()
    }

    /// Register a train. Returns `false` for a duplicate id or an unknown line.
    pub fn add_train(&mut self, train: Train) -> bool {
        if self.trains.contains_key(&train.id) {
            return false;
        }
        if !self.lines.contains_key(&train.line) {
            warn!("{} references unknown {}", train.id, train.line);
            return false;
        }
        self.ids.reserve_train(train.id);
        self.outbox.push(NetworkNotification::TrainAdded {
            train: train.id,
            line: train.line,
            position: train.position,
        });
        self.trains.insert(train.id, train);
        true
    }

    /// Unregister a train. Passengers aboard go back to the station the train
    /// last served.
    pub fn remove_train(&mut self, id: TrainId) -> bool {
        let Some(mut train) = self.trains.remove(&id) else {
            return false;
        };
        let station = train.last_station();
        for passenger in train.drain_passengers() {
            let passenger_id = passenger.id;
            if !self.add_passenger(station, passenger) {
                warn!("{id} removed: {passenger_id} dropped, {station} no longer exists");
                self.outbox.push(NetworkNotification::PassengerRemoved {
                    station,
                    passenger: passenger_id,
                });
            }
        }
        self.outbox.push(NetworkNotification::TrainRemoved { train: id });
        true
    }

    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(&id)
    }

    pub fn train_mut(&mut self, id: TrainId) -> Option<&mut Train> {
        self.trains.get_mut(&id)
    }

    pub fn trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.values()
    }

    // -------------------------------------------------------------------------
    // Passengers
    // -------------------------------------------------------------------------

    /// Queue a passenger at a station. Returns `false` if the station is unknown.
    pub fn add_passenger(&mut self, station: StationId, passenger: Passenger) -> bool {
        let Some(target) = self.stations.get_mut(&station) else {
            return false;
        };
        let id = passenger.id;
        let change = target.add_passenger(passenger);
        self.outbox.push(NetworkNotification::PassengerAdded {
            station,
            passenger: id,
        });
        push_capacity_change(&mut self.outbox, station, change, self.overcrowding_delay_ticks);
        true
    }

    /// Remove a waiting passenger by identity.
    pub fn remove_passenger(&mut self, station: StationId, id: PassengerId) -> Option<Passenger> {
        let (passenger, change) = self.stations.get_mut(&station)?.remove_passenger(id)?;
        self.outbox.push(NetworkNotification::PassengerRemoved {
            station,
            passenger: id,
        });
        push_capacity_change(&mut self.outbox, station, change, self.overcrowding_delay_ticks);
        Some(passenger)
    }

    /// Create a passenger at `station` wanting `desired`.
    pub fn spawn_passenger(&mut self, station: StationId, desired: StationKind) -> Option<PassengerId> {
        if !self.stations.contains_key(&station) {
            return None;
        }
        let id = self.ids.passenger();
        self.add_passenger(station, Passenger::new(id, station, desired));
        self.stats.passengers_spawned += 1;
        Some(id)
    }

    /// Change a station's capacity, reporting any overcrowding transition.
    pub fn set_station_capacity(&mut self, station: StationId, capacity: usize) -> bool {
        let Some(target) = self.stations.get_mut(&station) else {
            return false;
        };
        let change = target.set_capacity(capacity);
        push_capacity_change(&mut self.outbox, station, change, self.overcrowding_delay_ticks);
        true
    }

    // -------------------------------------------------------------------------
    // Notifications
    // -------------------------------------------------------------------------

    /// Take every pending notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<NetworkNotification> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_notifications(&self) -> &[NetworkNotification] {
        &self.outbox
    }
}

/// Translate a station's edge-triggered capacity change into a notification.
pub(crate) fn push_capacity_change(
    outbox: &mut Vec<NetworkNotification>,
    station: StationId,
    change: Option<CapacityChange>,
    delay_ticks: u32,
) {
    match change {
        Some(CapacityChange::BecameOvercrowded) => {
            debug!("{station} is overcrowded");
            outbox.push(NetworkNotification::StationOvercrowded {
                station,
                delay_ticks,
            });
        }
        Some(CapacityChange::Relieved) => {
            outbox.push(NetworkNotification::StationRelieved { station });
        }
        None => {}
    }
}
