//! Typed identifiers for network entities and the allocator that hands them out.
//!
//! Every entity kind gets its own newtype so a `StationId` can never be passed
//! where a `SectionId` is expected. Identifiers are allocated from monotonically
//! increasing counters and never reused within a session, so iterating a
//! `BTreeMap` keyed by an id visits entities in creation order.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a station node.
    StationId,
    "station"
);
entity_id!(
    /// Identifies a connection anchor between two subsections.
    ConnectionId,
    "connection"
);
entity_id!(
    /// Identifies an atomic edge between two connections.
    SubSectionId,
    "subsection"
);
entity_id!(
    /// Identifies a chain of subsections between two stations.
    SectionId,
    "section"
);
entity_id!(
    /// Identifies a line (ordered sequence of stations).
    LineId,
    "line"
);
entity_id!(
    /// Identifies a train.
    TrainId,
    "train"
);
entity_id!(
    /// Identifies a passenger.
    PassengerId,
    "passenger"
);

/// Per-kind counters for identifier allocation.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    station: u32,
    connection: u32,
    subsection: u32,
    section: u32,
    line: u32,
    train: u32,
    passenger: u32,
}

impl IdAllocator {
    pub fn station(&mut self) -> StationId {
        StationId(bump(&mut self.station))
    }

    pub fn connection(&mut self) -> ConnectionId {
        ConnectionId(bump(&mut self.connection))
    }

    pub fn subsection(&mut self) -> SubSectionId {
        SubSectionId(bump(&mut self.subsection))
    }

    pub fn section(&mut self) -> SectionId {
        SectionId(bump(&mut self.section))
    }

    pub fn line(&mut self) -> LineId {
        LineId(bump(&mut self.line))
    }

    pub fn train(&mut self) -> TrainId {
        TrainId(bump(&mut self.train))
    }

    pub fn passenger(&mut self) -> PassengerId {
        PassengerId(bump(&mut self.passenger))
    }

    /// Make sure future station ids are strictly greater than `id`.
    ///
    /// Needed when a caller registers a pre-built station whose id was not
    /// handed out by this allocator.
    pub fn reserve_station(&mut self, id: StationId) {
        self.station = self.station.max(id.0.saturating_add(1));
    }

    /// Same as [`IdAllocator::reserve_station`] for lines.
    pub fn reserve_line(&mut self, id: LineId) {
        self.line = self.line.max(id.0.saturating_add(1));
    }

    /// Same as [`IdAllocator::reserve_station`] for trains.
    pub fn reserve_train(&mut self, id: TrainId) {
        self.train = self.train.max(id.0.saturating_add(1));
    }
}

fn bump(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter = counter.saturating_add(1);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential_per_kind() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.station(), StationId(0));
        assert_eq!(ids.station(), StationId(1));
        // Independent counter for lines
        assert_eq!(ids.line(), LineId(0));
        assert_eq!(ids.station(), StationId(2));
    }

    #[test]
    fn test_reserve_skips_past_external_id() {
        let mut ids = IdAllocator::default();
        ids.reserve_station(StationId(41));
        assert_eq!(ids.station(), StationId(42));
        // Reserving a lower id never moves the counter backwards
        ids.reserve_station(StationId(3));
        assert_eq!(ids.station(), StationId(43));
    }

    #[test]
    fn test_reserve_at_max_id_does_not_overflow() {
        let mut ids = IdAllocator::default();
        ids.reserve_station(StationId(u32::MAX));
        ids.reserve_line(LineId(u32::MAX));
        ids.reserve_train(TrainId(u32::MAX));
        assert_eq!(ids.station(), StationId(u32::MAX));
        assert_eq!(ids.line(), LineId(u32::MAX));
        assert_eq!(ids.train(), TrainId(u32::MAX));
    }

    #[test]
    fn test_display_includes_kind() {
        assert_eq!(StationId(7).to_string(), "station#7");
        assert_eq!(SectionId(2).to_string(), "section#2");
    }
}
