//! Data types for stations.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ids::{ConnectionId, StationId};
use crate::passenger::Passenger;

/// Shape of a station. Passengers want to reach a station of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    Circle,
    Triangle,
    Square,
    Pentagon,
    Star,
}

impl StationKind {
    pub const ALL: [StationKind; 5] = [
        StationKind::Circle,
        StationKind::Triangle,
        StationKind::Square,
        StationKind::Pentagon,
        StationKind::Star,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StationKind::Circle => "circle",
            StationKind::Triangle => "triangle",
            StationKind::Square => "square",
            StationKind::Pentagon => "pentagon",
            StationKind::Star => "star",
        }
    }
}

/// Edge-triggered overcrowding transition reported by a passenger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityChange {
    /// Occupancy just went above `max_capacity`.
    BecameOvercrowded,
    /// Occupancy just came back to `max_capacity` or below.
    Relieved,
}

/// A station node.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub position: Vec2,
    pub kind: StationKind,
    /// Waiting passengers allowed before the station is overcrowded.
    pub max_capacity: usize,
    pub(crate) passengers: Vec<Passenger>,
    pub(crate) connections: Vec<ConnectionId>,
    pub(crate) overcrowded: bool,
}
