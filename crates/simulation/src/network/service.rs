//! Per-tick service: passenger demand, routing and train operation.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::TopologyError;
use crate::ids::{LineId, PassengerId, StationId, TrainId};
use crate::notifications::NetworkNotification;
use crate::passenger::{choose_desired_kind, Passenger};
use crate::routing::{find_route, Route};
use crate::station::StationKind;
use crate::train::{Direction, MotionEvent, PassengerCar, Train};

use super::graph::push_capacity_change;
use super::types::*;

/// Next stop after `at` travelling in `direction`, reversing at the line ends.
pub fn upcoming_stop(line: &Line, at: StationId, direction: Direction) -> Option<(StationId, Direction)> {
    let i = line.position_of(at)?;
    let forward = line.stations.get(i + 1).map(|&s| (s, Direction::Forward));
    let backward = i
        .checked_sub(1)
        .and_then(|j| line.stations.get(j))
        .map(|&s| (s, Direction::Backward));
    match direction {
        Direction::Forward => forward.or(backward),
        Direction::Backward => backward.or(forward),
    }
}

/// Whether a rider stays aboard a train leaving `station` for `next`.
fn rides_on(passenger: &Passenger, station: StationId, next: StationId, version: u64) -> bool {
    !passenger.needs_route(version)
        && passenger
            .next_hop()
            .is_some_and(|hop| hop.from == station && hop.to == next)
}

impl SubwayNetwork {
    // -------------------------------------------------------------------------
    // Demand
    // -------------------------------------------------------------------------

    /// Spawn one passenger at a random station, wanting a random other kind.
    pub fn spawn_random_passenger<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PassengerId> {
        let ids: Vec<StationId> = self.stations.keys().copied().collect();
        let &station = ids.choose(rng)?;
        let origin = self.stations.get(&station)?.kind;
        let desired = choose_desired_kind(rng, origin, &self.present_kinds());
        self.spawn_passenger(station, desired)
    }

    /// Route every waiting passenger without a current route.
    ///
    /// Returns how many passengers received a route. Passengers with no
    /// reachable destination stay queued and are retried next tick.
    pub fn route_waiting_passengers(&mut self) -> usize {
        let version = self.topology_version;
        let mut requests: Vec<(StationId, StationKind)> = self
            .stations
            .values()
            .flat_map(move |s| {
                s.passengers()
                    .iter()
                    .filter(move |p| p.needs_route(version))
                    .map(move |p| (s.id, p.desired))
            })
            .collect();
        if requests.is_empty() {
            return 0;
        }
        requests.sort();
        requests.dedup();
        let routes: HashMap<(StationId, StationKind), Option<Route>> = requests
            .into_iter()
            .map(|key| (key, find_route(self, key.0, key.1)))
            .collect();

        let mut routed = 0;
        for station in self.stations.values_mut() {
            let id = station.id;
            for passenger in station.passengers_mut() {
                if !passenger.needs_route(version) {
                    continue;
                }
                if let Some(Some(route)) = routes.get(&(id, passenger.desired)) {
                    passenger.route = Some(route.clone());
                    routed += 1;
                }
            }
        }
        routed
    }

    // -------------------------------------------------------------------------
    // Fleet
    // -------------------------------------------------------------------------

    /// Put a new train on `line` at the line station nearest to `near`.
    pub fn deploy_train(&mut self, line: LineId, near: Vec2) -> Result<TrainId, TopologyError> {
        let target = self.lines.get(&line).ok_or(TopologyError::UnknownLine(line))?;
        let (station, position) = target
            .stations
            .iter()
            .filter_map(|id| self.stations.get(id))
            .min_by(|a, b| {
                a.position
                    .distance_squared(near)
                    .total_cmp(&b.position.distance_squared(near))
            })
            .map(|s| (s.id, s.position))
            .ok_or(TopologyError::TooFewStations(0))?;

        let id = self.ids.train();
        let train = Train::new(id, line, station, position, self.car_capacity, self.train_speed);
        self.add_train(train);
        info!("{id} deployed on {line} at {station}");
        Ok(id)
    }

    /// Append an optional passenger car to a train.
    pub fn attach_car(&mut self, train: TrainId) -> Result<usize, TopologyError> {
        let capacity = self.car_capacity;
        let target = self
            .trains
            .get_mut(&train)
            .ok_or(TopologyError::UnknownTrain(train))?;
        target.add_car(PassengerCar::new(capacity));
        Ok(target.car_count())
    }

    /// Raise a station's capacity by `extra`.
    pub fn upgrade_station(&mut self, station: StationId, extra: usize) -> Result<usize, TopologyError> {
        let capacity = self
            .stations
            .get(&station)
            .ok_or(TopologyError::UnknownStation(station))?
            .max_capacity
            + extra;
        self.set_station_capacity(station, capacity);
        Ok(capacity)
    }

    /// Run one tick of every train.
    pub fn advance_trains(&mut self, boarding_ticks: u32) {
        let ids: Vec<TrainId> = self.trains.keys().copied().collect();
        for id in ids {
            self.advance_train(id, boarding_ticks);
        }
    }

    fn advance_train(&mut self, id: TrainId, boarding_ticks: u32) {
        let Some(train) = self.trains.get_mut(&id) else {
            return;
        };
        if train.live() == Some(MotionEvent::ReachedStation) {
            let station = train.stop;
            for passenger in train.passengers_mut() {
                passenger.arrive_at(station);
            }
            debug!("{id} reached {station}");
            self.reroute_riders(id, station);
        }

        let Some(train) = self.trains.get(&id) else {
            return;
        };
        if !train.is_ready_for_action() {
            return;
        }
        let (station, line, direction) = (train.stop, train.line, train.direction);
        let Some((next, heading)) = self
            .lines
            .get(&line)
            .and_then(|l| upcoming_stop(l, station, direction))
        else {
            return;
        };

        if self.dwell_action(id, station, next) {
            if let Some(train) = self.trains.get_mut(&id) {
                train.start_action_cooldown(boarding_ticks);
            }
            return;
        }

        let points = self
            .lines
            .get(&line)
            .and_then(|l| l.section_between(station, next))
            .and_then(|s| self.section_points(s, station))
            .unwrap_or_default();
        if let Some(train) = self.trains.get_mut(&id) {
            train.depart(next, heading, points);
            debug!("{id} leaving {station} for {next}");
        }
    }

    /// Recompute stale routes of the passengers aboard a train at `station`.
    fn reroute_riders(&mut self, id: TrainId, station: StationId) {
        let version = self.topology_version;
        let Some(train) = self.trains.get(&id) else {
            return;
        };
        let stale: Vec<(PassengerId, StationKind)> = train
            .passengers()
            .filter(|p| p.needs_route(version) && !self.station_is(station, p.desired))
            .map(|p| (p.id, p.desired))
            .collect();
        if stale.is_empty() {
            return;
        }
        let routes: HashMap<PassengerId, Option<Route>> = stale
            .into_iter()
            .map(|(p, kind)| (p, find_route(self, station, kind)))
            .collect();
        if let Some(train) = self.trains.get_mut(&id) {
            for passenger in train.passengers_mut() {
                if let Some(route) = routes.get(&passenger.id) {
                    passenger.route = route.clone();
                }
            }
        }
    }

    fn station_is(&self, station: StationId, kind: StationKind) -> bool {
        self.stations.get(&station).is_some_and(|s| s.kind == kind)
    }

    /// Perform at most one boarding/alighting action. `false` once the dwell
    /// has nothing left to do.
    ///
    /// Priority: deliver a rider who wanted this kind of station, then let
    /// off a rider whose next leg is not toward `next`, then board a waiting
    /// passenger whose next leg is.
    fn dwell_action(&mut self, id: TrainId, station: StationId, next: StationId) -> bool {
        let version = self.topology_version;
        let Some(kind) = self.stations.get(&station).map(|s| s.kind) else {
            return false;
        };
        let Some(train) = self.trains.get_mut(&id) else {
            return false;
        };

        if let Some(passenger) = train.alight_where(|p| p.wants(kind)) {
            self.stats.passengers_delivered += 1;
            debug!("{} delivered at {station}", passenger.id);
            self.outbox.push(NetworkNotification::PassengerDelivered {
                station,
                passenger: passenger.id,
            });
            return true;
        }

        if let Some(passenger) = train.alight_where(|p| !rides_on(p, station, next, version)) {
            self.add_passenger(station, passenger);
            return true;
        }

        if !train.has_room() {
            return false;
        }
        let Some(platform) = self.stations.get_mut(&station) else {
            return false;
        };
        let Some((passenger, change)) =
            platform.take_passenger_where(|p| rides_on(p, station, next, version))
        else {
            return false;
        };
        let passenger_id = passenger.id;
        self.outbox.push(NetworkNotification::PassengerRemoved {
            station,
            passenger: passenger_id,
        });
        push_capacity_change(&mut self.outbox, station, change, self.overcrowding_delay_ticks);
        if let Err(passenger) = train.board(passenger) {
            warn!("{id} refused {passenger_id} despite free seats");
            self.add_passenger(station, passenger);
        }
        true
    }
}
