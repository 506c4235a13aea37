//! Inventory deployment: trains, extra cars and station upgrades moving from
//! the player's pool onto the map.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{DeployError, TopologyError};
use crate::ids::{LineId, SectionId, StationId, TrainId};
use crate::network::SubwayNetwork;
use crate::notifications::NetworkNotification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryItem {
    Train,
    PassengerCar,
    StationUpgrade,
}

/// Map element an inventory item is dropped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployTarget {
    Line(LineId),
    /// A section; resolved to its owning line for trains.
    Section(SectionId),
    Train(TrainId),
    Station(StationId),
}

/// Request to move an item from the inventory onto the map at `position`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct InventoryDeployRequest {
    pub item: InventoryItem,
    pub target: DeployTarget,
    pub position: Vec2,
}

impl SubwayNetwork {
    /// Apply an inventory deployment and notify observers.
    ///
    /// Returns the spawn position reported in the `InventoryDeployed`
    /// notification.
    pub fn deploy_inventory(
        &mut self,
        request: &InventoryDeployRequest,
        upgrade_capacity: usize,
    ) -> Result<Vec2, DeployError> {
        let position = match (request.item, request.target) {
            (InventoryItem::Train, DeployTarget::Line(line)) => {
                self.deploy_train_at(line, request.position)?
            }
            (InventoryItem::Train, DeployTarget::Section(section)) => {
                let line = self
                    .section(section)
                    .ok_or(TopologyError::UnknownSection(section))?
                    .line
                    .ok_or(TopologyError::UnknownSection(section))?;
                self.deploy_train_at(line, request.position)?
            }
            (InventoryItem::PassengerCar, DeployTarget::Train(train)) => {
                self.attach_car(train)?;
                self.train(train)
                    .map(|t| t.position)
                    .ok_or(TopologyError::UnknownTrain(train))?
            }
            (InventoryItem::StationUpgrade, DeployTarget::Station(station)) => {
                self.upgrade_station(station, upgrade_capacity)?;
                self.station(station)
                    .map(|s| s.position)
                    .ok_or(TopologyError::UnknownStation(station))?
            }
            (item, target) => return Err(DeployError::Mismatch { item, target }),
        };
        self.outbox.push(NetworkNotification::InventoryDeployed {
            item: request.item,
            target: request.target,
            position,
        });
        Ok(position)
    }

    fn deploy_train_at(&mut self, line: LineId, near: Vec2) -> Result<Vec2, TopologyError> {
        let train = self.deploy_train(line, near)?;
        self.train(train)
            .map(|t| t.position)
            .ok_or(TopologyError::UnknownTrain(train))
    }
}

pub fn handle_inventory_requests(
    mut requests: EventReader<InventoryDeployRequest>,
    mut network: ResMut<SubwayNetwork>,
    config: Res<SimulationConfig>,
) {
    for request in requests.read() {
        if let Err(e) = network.deploy_inventory(request, config.station_upgrade_capacity) {
            warn!("inventory deployment of {:?} rejected: {e}", request.item);
        }
    }
}

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<InventoryDeployRequest>().add_systems(
            FixedUpdate,
            handle_inventory_requests.in_set(crate::SimulationSet::Control),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::WaterMap;
    use crate::station::StationKind;

    fn network_with_line() -> (SubwayNetwork, LineId, [StationId; 2]) {
        let mut net = SubwayNetwork::new(&SimulationConfig::default());
        let a = net.spawn_station(Vec2::new(0.0, 0.0), StationKind::Circle);
        let b = net.spawn_station(Vec2::new(20.0, 0.0), StationKind::Square);
        let line = net.create_line(a, b, &WaterMap::default()).unwrap();
        net.drain_notifications();
        (net, line, [a, b])
    }

    #[test]
    fn test_train_spawns_at_nearest_line_station() {
        let (mut net, line, [_, b]) = network_with_line();
        let request = InventoryDeployRequest {
            item: InventoryItem::Train,
            target: DeployTarget::Line(line),
            position: Vec2::new(18.0, 3.0),
        };
        let position = net.deploy_inventory(&request, 6).unwrap();
        assert_eq!(position, Vec2::new(20.0, 0.0));
        let train = net.trains().next().unwrap();
        assert_eq!(train.stop, b);
        assert!(net.pending_notifications().iter().any(|n| matches!(
            n,
            NetworkNotification::InventoryDeployed {
                item: InventoryItem::Train,
                ..
            }
        )));
    }

    #[test]
    fn test_train_onto_section_resolves_line() {
        let (mut net, line, _) = network_with_line();
        let section = net.line(line).unwrap().sections[0];
        let request = InventoryDeployRequest {
            item: InventoryItem::Train,
            target: DeployTarget::Section(section),
            position: Vec2::ZERO,
        };
        net.deploy_inventory(&request, 6).unwrap();
        assert_eq!(net.trains().next().map(|t| t.line), Some(line));
    }

    #[test]
    fn test_car_and_upgrade() {
        let (mut net, line, [a, _]) = network_with_line();
        let train = net.deploy_train(line, Vec2::ZERO).unwrap();
        let car = InventoryDeployRequest {
            item: InventoryItem::PassengerCar,
            target: DeployTarget::Train(train),
            position: Vec2::ZERO,
        };
        net.deploy_inventory(&car, 6).unwrap();
        assert_eq!(net.train(train).unwrap().car_count(), 2);

        let upgrade = InventoryDeployRequest {
            item: InventoryItem::StationUpgrade,
            target: DeployTarget::Station(a),
            position: Vec2::ZERO,
        };
        net.deploy_inventory(&upgrade, 6).unwrap();
        assert_eq!(net.station(a).unwrap().max_capacity, 16);
    }

    #[test]
    fn test_mismatched_target_is_rejected() {
        let (mut net, _, [a, _]) = network_with_line();
        let request = InventoryDeployRequest {
            item: InventoryItem::Train,
            target: DeployTarget::Station(a),
            position: Vec2::ZERO,
        };
        assert!(matches!(
            net.deploy_inventory(&request, 6),
            Err(DeployError::Mismatch { .. })
        ));
        assert!(net.pending_notifications().is_empty());
    }

    #[test]
    fn test_unknown_line_is_rejected() {
        let (mut net, _, _) = network_with_line();
        let request = InventoryDeployRequest {
            item: InventoryItem::Train,
            target: DeployTarget::Line(LineId(42)),
            position: Vec2::ZERO,
        };
        assert_eq!(
            net.deploy_inventory(&request, 6),
            Err(DeployError::Topology(TopologyError::UnknownLine(LineId(42))))
        );
    }
}
