//! `Train` methods: loading order and the motion state machine.

use bevy::prelude::*;

use crate::config::DEFAULT_TRAIN_SPEED;
use crate::ids::{LineId, PassengerId, StationId, TrainId};
use crate::passenger::Passenger;

use super::types::*;

impl TrainState {
    /// Pure transition function. Events that do not apply leave the state as is.
    pub fn next(self, event: MotionEvent) -> TrainState {
        match (self, event) {
            (TrainState::Moving, MotionEvent::ReachedStation) => TrainState::AtStation,
            (TrainState::AtStation, MotionEvent::DwellComplete) => TrainState::Moving,
            (state, _) => state,
        }
    }
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl Train {
    /// A train dwelling at `station` with an empty mandatory car.
    ///
    /// A `max_speed` that is not a positive finite number falls back to
    /// `DEFAULT_TRAIN_SPEED`.
    pub fn new(
        id: TrainId,
        line: LineId,
        station: StationId,
        position: Vec2,
        car_capacity: usize,
        max_speed: f32,
    ) -> Self {
        Self {
            id,
            line,
            mandatory: PassengerCar::new(car_capacity),
            optional: Vec::new(),
            max_speed: if max_speed.is_finite() && max_speed > 0.0 {
                max_speed
            } else {
                DEFAULT_TRAIN_SPEED
            },
            position,
            state: TrainState::AtStation,
            direction: Direction::Forward,
            stop: station,
            last_station: station,
            waypoints: Vec::new(),
            waypoint: 0,
            action_cooldown: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Cars
    // -------------------------------------------------------------------------

    pub fn add_car(&mut self, car: PassengerCar) {
        self.optional.push(car);
    }

    pub fn car_count(&self) -> usize {
        1 + self.optional.len()
    }

    pub fn mandatory_car(&self) -> &PassengerCar {
        &self.mandatory
    }

    pub fn optional_cars(&self) -> &[PassengerCar] {
        &self.optional
    }

    pub fn capacity(&self) -> usize {
        self.mandatory.capacity() + self.optional.iter().map(PassengerCar::capacity).sum::<usize>()
    }

    pub fn occupancy(&self) -> usize {
        self.passengers().count()
    }

    pub fn has_room(&self) -> bool {
        !self.mandatory.is_full() || self.optional.iter().any(|c| !c.is_full())
    }

    /// Every passenger aboard, mandatory car first.
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.mandatory
            .passengers()
            .iter()
            .chain(self.optional.iter().flat_map(|c| c.passengers().iter()))
    }

    pub(crate) fn passengers_mut(&mut self) -> impl Iterator<Item = &mut Passenger> {
        self.mandatory
            .passengers
            .iter_mut()
            .chain(self.optional.iter_mut().flat_map(|c| c.passengers.iter_mut()))
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Seat a passenger in the mandatory car, else the first optional car with
    /// room. Hands the passenger back when the whole train is full.
    pub fn board(&mut self, passenger: Passenger) -> Result<(), Passenger> {
        let passenger = match self.mandatory.add_passenger(passenger) {
            Ok(()) => return Ok(()),
            Err(p) => p,
        };
        match self.optional.iter_mut().find(|c| !c.is_full()) {
            Some(car) => car.add_passenger(passenger),
            None => Err(passenger),
        }
    }

    /// Remove the first passenger matching `pred`, scanning optional cars from
    /// the last deployed backward and the mandatory car last.
    pub fn alight_where(&mut self, pred: impl Fn(&Passenger) -> bool) -> Option<Passenger> {
        for car in self.optional.iter_mut().rev() {
            if let Some(passenger) = car.take_passenger_where(&pred) {
                return Some(passenger);
            }
        }
        self.mandatory.take_passenger_where(&pred)
    }

    /// Remove any passenger, back to front.
    pub fn pop_passenger(&mut self) -> Option<Passenger> {
        self.alight_where(|_| true)
    }

    pub fn remove_passenger(&mut self, id: PassengerId) -> Option<Passenger> {
        self.optional
            .iter_mut()
            .rev()
            .find_map(|c| c.remove_passenger(id))
            .or_else(|| self.mandatory.remove_passenger(id))
    }

    pub(crate) fn drain_passengers(&mut self) -> Vec<Passenger> {
        let mut all: Vec<Passenger> = self.mandatory.drain().collect();
        for car in &mut self.optional {
            all.extend(car.drain());
        }
        all
    }

    // -------------------------------------------------------------------------
    // Motion
    // -------------------------------------------------------------------------

    /// Station the train last stopped at.
    pub fn last_station(&self) -> StationId {
        self.last_station
    }

    /// Whether the train is dwelling and may perform its next action.
    pub fn is_ready_for_action(&self) -> bool {
        self.state == TrainState::AtStation && self.action_cooldown == 0
    }

    pub(crate) fn start_action_cooldown(&mut self, ticks: u32) {
        self.action_cooldown = ticks;
    }

    /// End the dwell and set off toward `stop` along `points` (the leg's
    /// polyline starting at the current station).
    pub fn depart(&mut self, stop: StationId, direction: Direction, points: Vec<Vec2>) -> MotionEvent {
        self.stop = stop;
        self.direction = direction;
        self.waypoints = points;
        self.waypoint = 0;
        self.state = self.state.next(MotionEvent::DwellComplete);
        MotionEvent::DwellComplete
    }

    /// One simulation tick.
    ///
    /// While moving, advance up to `max_speed` along the leg and report
    /// `ReachedStation` on arrival. While dwelling, count the action cooldown
    /// down; the dwell itself is ended by [`Train::depart`].
    pub fn live(&mut self) -> Option<MotionEvent> {
        match self.state {
            TrainState::AtStation => {
                self.action_cooldown = self.action_cooldown.saturating_sub(1);
                None
            }
            TrainState::Moving => {
                let mut budget = self.max_speed.max(0.0);
                while let Some(&target) = self.waypoints.get(self.waypoint) {
                    let gap = self.position.distance(target);
                    if gap > budget {
                        self.position += (target - self.position) * (budget / gap);
                        return None;
                    }
                    budget -= gap;
                    self.position = target;
                    self.waypoint += 1;
                }
                self.waypoints.clear();
                self.waypoint = 0;
                self.last_station = self.stop;
                self.state = self.state.next(MotionEvent::ReachedStation);
                Some(MotionEvent::ReachedStation)
            }
        }
    }
}
