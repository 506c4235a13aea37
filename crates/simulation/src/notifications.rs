//! Topology, capacity and passenger notifications produced by the network.
//!
//! Core mutations push a [`NetworkNotification`] into the network's outbox
//! synchronously. `publish_notifications` drains the outbox once per tick into
//! Bevy `Events<NetworkNotification>` for observers (view layer, logging,
//! tests); the core never waits on them.

use bevy::prelude::*;

use crate::ids::{LineId, PassengerId, SectionId, StationId, TrainId};
use crate::inventory::{DeployTarget, InventoryItem};
use crate::network::SubwayNetwork;
use crate::pair::Pair;
use crate::station::StationKind;

/// Every change a view layer needs to mirror the network without re-querying it.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum NetworkNotification {
    StationAdded {
        station: StationId,
        position: Vec2,
        kind: StationKind,
    },
    PassengerAdded {
        station: StationId,
        passenger: PassengerId,
    },
    PassengerRemoved {
        station: StationId,
        passenger: PassengerId,
    },
    /// A passenger reached a station of the kind they wanted.
    PassengerDelivered {
        station: StationId,
        passenger: PassengerId,
    },
    /// Occupancy went above capacity; the station is lost after `delay_ticks`.
    StationOvercrowded {
        station: StationId,
        delay_ticks: u32,
    },
    StationRelieved {
        station: StationId,
    },
    LineCreated {
        line: LineId,
        section: SectionId,
        stations: Pair<StationId>,
        midpoint: Vec2,
    },
    /// `old_section` was split in two around `inserted`.
    LineInnerExtended {
        line: LineId,
        old_section: SectionId,
        inserted: StationId,
        sections: Pair<SectionId>,
        midpoints: Pair<Vec2>,
    },
    /// `added` was attached beyond the line end at `anchor`.
    LineExtended {
        line: LineId,
        section: SectionId,
        added: StationId,
        anchor: StationId,
    },
    SectionReshaped {
        section: SectionId,
        midpoint: Vec2,
    },
    LineRemoved {
        line: LineId,
    },
    TrainAdded {
        train: TrainId,
        line: LineId,
        position: Vec2,
    },
    TrainRemoved {
        train: TrainId,
    },
    InventoryDeployed {
        item: InventoryItem,
        target: DeployTarget,
        position: Vec2,
    },
}

/// Forward the network outbox to Bevy observers.
pub fn publish_notifications(
    mut network: ResMut<SubwayNetwork>,
    mut writer: EventWriter<NetworkNotification>,
) {
    let pending = network.drain_notifications();
    if pending.is_empty() {
        return;
    }
    debug!("publishing {} network notifications", pending.len());
    writer.send_batch(pending);
}
