//! Data types for the network graph.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use bevy::prelude::*;

use crate::ids::{ConnectionId, IdAllocator, LineId, SectionId, StationId, SubSectionId, TrainId};
use crate::notifications::NetworkNotification;
use crate::pair::Pair;
use crate::station::Station;
use crate::train::Train;

/// An anchor point joining two subsections.
///
/// `station` and `section` are non-owning back-references resolved through the
/// network registries.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub position: Vec2,
    /// Subsections on either side. Degenerate for a dead end.
    pub subsections: Pair<SubSectionId>,
    /// Station this connection sits in, if any.
    pub station: Option<StationId>,
    /// Section this connection is a line-facing extremity of, if any.
    pub section: Option<SectionId>,
}

impl Connection {
    pub fn is_dead_end(&self) -> bool {
        self.subsections.is_degenerate()
    }
}

/// Atomic edge between two connections. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SubSection {
    pub id: SubSectionId,
    pub ends: Pair<ConnectionId>,
    pub tunnel: bool,
    pub length: f32,
}

/// Values derived from a section's subsection chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionMetrics {
    pub length: f32,
    pub has_tunnel: bool,
}

/// Chain of subsections between two stations.
///
/// `connections` runs from `stations.first` to `stations.second`. Length and
/// tunnel presence are cached and recomputed on the next read after the chain
/// changes.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: SectionId,
    /// Owning line. `None` until the section is registered with a line.
    pub line: Option<LineId>,
    pub stations: Pair<StationId>,
    pub(crate) connections: Vec<ConnectionId>,
    pub(crate) subsections: Vec<SubSectionId>,
    pub(crate) metrics: OnceLock<SectionMetrics>,
}

/// Which end of a line an extension attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnd {
    Head,
    Tail,
}

/// An ordered sequence of stations; `sections[i]` joins `stations[i]` and `stations[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub id: LineId,
    pub stations: Vec<StationId>,
    pub sections: Vec<SectionId>,
}

/// Session-wide passenger counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub passengers_spawned: u64,
    pub passengers_delivered: u64,
}

/// The network graph: sole owner of every station, line, section and train.
///
/// All topology mutation goes through its methods. Registries are keyed by
/// monotonically allocated ids, so iteration order is creation order.
#[derive(Resource, Debug, Clone)]
pub struct SubwayNetwork {
    pub(crate) stations: BTreeMap<StationId, Station>,
    pub(crate) connections: BTreeMap<ConnectionId, Connection>,
    pub(crate) subsections: BTreeMap<SubSectionId, SubSection>,
    pub(crate) sections: BTreeMap<SectionId, Section>,
    pub(crate) lines: BTreeMap<LineId, Line>,
    pub(crate) trains: BTreeMap<TrainId, Train>,
    pub(crate) ids: IdAllocator,
    /// Bumped on every change that can alter a route.
    pub(crate) topology_version: u64,
    pub(crate) overcrowding_delay_ticks: u32,
    pub(crate) station_capacity: usize,
    pub(crate) car_capacity: usize,
    pub(crate) train_speed: f32,
    pub(crate) stats: NetworkStats,
    pub(crate) outbox: Vec<NetworkNotification>,
}
