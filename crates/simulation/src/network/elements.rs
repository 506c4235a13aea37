//! Methods on the graph elements: subsections, sections and lines.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use bevy::prelude::*;

use crate::ids::{ConnectionId, LineId, SectionId, StationId, SubSectionId};
use crate::pair::Pair;

use super::types::*;

impl SubSection {
    pub fn new(id: SubSectionId, ends: Pair<ConnectionId>, from: Vec2, to: Vec2, tunnel: bool) -> Self {
        Self {
            id,
            ends,
            tunnel,
            length: from.distance(to),
        }
    }
}

impl Section {
    pub fn new(
        id: SectionId,
        stations: Pair<StationId>,
        connections: Vec<ConnectionId>,
        subsections: Vec<SubSectionId>,
    ) -> Self {
        Self {
            id,
            line: None,
            stations,
            connections,
            subsections,
            metrics: OnceLock::new(),
        }
    }

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn subsections(&self) -> &[SubSectionId] {
        &self.subsections
    }

    /// Connection of this section sitting in `station`, if `station` is an end.
    pub fn connection_at(&self, station: StationId) -> Option<ConnectionId> {
        if self.stations.first == station {
            self.connections.first().copied()
        } else if self.stations.second == station {
            self.connections.last().copied()
        } else {
            None
        }
    }

    /// Cached length and tunnel flag, recomputed after the chain changed.
    pub fn metrics(&self, subsections: &BTreeMap<SubSectionId, SubSection>) -> SectionMetrics {
        *self.metrics.get_or_init(|| {
            let mut metrics = SectionMetrics {
                length: 0.0,
                has_tunnel: false,
            };
            for sub in self.subsections.iter().filter_map(|id| subsections.get(id)) {
                metrics.length += sub.length;
                metrics.has_tunnel |= sub.tunnel;
            }
            metrics
        })
    }

    pub fn is_cached(&self) -> bool {
        self.metrics.get().is_some()
    }

    /// Swap in a new connection/subsection chain and drop the cached metrics.
    pub(crate) fn replace_chain(
        &mut self,
        connections: Vec<ConnectionId>,
        subsections: Vec<SubSectionId>,
    ) -> (Vec<ConnectionId>, Vec<SubSectionId>) {
        self.metrics = OnceLock::new();
        (
            std::mem::replace(&mut self.connections, connections),
            std::mem::replace(&mut self.subsections, subsections),
        )
    }
}

impl Line {
    pub fn new(id: LineId, stations: Vec<StationId>, sections: Vec<SectionId>) -> Self {
        Self {
            id,
            stations,
            sections,
        }
    }

    pub fn contains(&self, station: StationId) -> bool {
        self.stations.contains(&station)
    }

    pub fn position_of(&self, station: StationId) -> Option<usize> {
        self.stations.iter().position(|&s| s == station)
    }

    pub fn section_index(&self, section: SectionId) -> Option<usize> {
        self.sections.iter().position(|&s| s == section)
    }

    pub fn end(&self, end: LineEnd) -> Option<StationId> {
        match end {
            LineEnd::Head => self.stations.first().copied(),
            LineEnd::Tail => self.stations.last().copied(),
        }
    }

    /// Section joining two consecutive stations, in either order.
    pub fn section_between(&self, a: StationId, b: StationId) -> Option<SectionId> {
        let i = self.position_of(a)?;
        let j = self.position_of(b)?;
        match i.abs_diff(j) {
            1 => self.sections.get(i.min(j)).copied(),
            _ => None,
        }
    }
}
