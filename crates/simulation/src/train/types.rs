//! Data types for trains and passenger cars.

use bevy::prelude::*;

use crate::ids::{LineId, StationId, TrainId};
use crate::passenger::Passenger;

/// Motion state of a train in service. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainState {
    /// Travelling along a section toward `Train::stop`.
    Moving,
    /// Dwelling at `Train::stop`, boarding and alighting.
    #[default]
    AtStation,
}

/// Input to the motion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    ReachedStation,
    DwellComplete,
}

/// Travel direction along the line's station order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward the line tail.
    #[default]
    Forward,
    /// Toward the line head.
    Backward,
}

/// A bounded passenger container.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerCar {
    pub(crate) capacity: usize,
    pub(crate) passengers: Vec<Passenger>,
}

/// A train running along one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    pub id: TrainId,
    pub line: LineId,
    pub(crate) mandatory: PassengerCar,
    /// Cars in deployment order.
    pub(crate) optional: Vec<PassengerCar>,
    /// World units per tick.
    pub max_speed: f32,
    pub position: Vec2,
    pub state: TrainState,
    pub direction: Direction,
    /// Next station while moving, current station while dwelling.
    pub stop: StationId,
    pub(crate) last_station: StationId,
    /// Remaining points of the current leg.
    pub(crate) waypoints: Vec<Vec2>,
    pub(crate) waypoint: usize,
    /// Ticks until the next boarding/alighting action.
    pub(crate) action_cooldown: u32,
}
