// ---------------------------------------------------------------------------
// Error types for topology construction and scenario loading
// ---------------------------------------------------------------------------

use std::fmt;

use crate::ids::{LineId, SectionId, StationId, TrainId};
use crate::inventory::{DeployTarget, InventoryItem};

/// A topology edit that would break a network invariant.
///
/// Returned at the point of construction; the network is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The station is not registered in the network.
    UnknownStation(StationId),
    /// The line is not registered in the network.
    UnknownLine(LineId),
    /// The section is not registered in the network.
    UnknownSection(SectionId),
    /// The train is not registered in the network.
    UnknownTrain(TrainId),
    /// Both extremities of a section would be bound to the same station.
    SameStation(StationId),
    /// The station already holds the maximum number of connections.
    StationSaturated(StationId),
    /// The station already appears on the line.
    DuplicateStation { line: LineId, station: StationId },
    /// A line needs at least two stations.
    TooFewStations(usize),
    /// Consecutive line stations are not joined by exactly one section.
    BrokenChain {
        from: StationId,
        to: StationId,
        sections: usize,
    },
    /// The section does not belong to the line.
    SectionNotOnLine { line: LineId, section: SectionId },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::UnknownStation(id) => write!(f, "Unknown station: {id}"),
            TopologyError::UnknownLine(id) => write!(f, "Unknown line: {id}"),
            TopologyError::UnknownSection(id) => write!(f, "Unknown section: {id}"),
            TopologyError::UnknownTrain(id) => write!(f, "Unknown train: {id}"),
            TopologyError::SameStation(id) => {
                write!(f, "A section cannot start and end at {id}")
            }
            TopologyError::StationSaturated(id) => {
                write!(f, "{id} has no free connection slot")
            }
            TopologyError::DuplicateStation { line, station } => {
                write!(f, "{station} is already on {line}")
            }
            TopologyError::TooFewStations(n) => {
                write!(f, "A line needs at least 2 stations, got {n}")
            }
            TopologyError::BrokenChain { from, to, sections } => write!(
                f,
                "{from} and {to} must be joined by exactly one section, found {sections}"
            ),
            TopologyError::SectionNotOnLine { line, section } => {
                write!(f, "{section} does not belong to {line}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

/// An inventory item could not be placed on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// The item cannot be dropped onto that kind of target.
    Mismatch {
        item: InventoryItem,
        target: DeployTarget,
    },
    Topology(TopologyError),
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::Mismatch { item, target } => {
                write!(f, "{item:?} cannot be deployed onto {target:?}")
            }
            DeployError::Topology(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::Topology(e) => Some(e),
            DeployError::Mismatch { .. } => None,
        }
    }
}

impl From<TopologyError> for DeployError {
    fn from(e: TopologyError) -> Self {
        DeployError::Topology(e)
    }
}

/// Errors raised while reading a scenario descriptor.
#[derive(Debug)]
pub enum ScenarioError {
    /// The descriptor is not valid JSON for the expected shape.
    Parse(serde_json::Error),
    /// The descriptor holds no map.
    NoMaps,
    /// A seeded line references a station index outside the map's list.
    UnknownStationIndex { map: String, index: usize },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Parse(e) => write!(f, "Scenario parse error: {e}"),
            ScenarioError::NoMaps => write!(f, "Scenario declares no map"),
            ScenarioError::UnknownStationIndex { map, index } => {
                write!(f, "Map '{map}' has no station at index {index}")
            }
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        ScenarioError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_error_display() {
        let err = TopologyError::BrokenChain {
            from: StationId(1),
            to: StationId(2),
            sections: 0,
        };
        assert_eq!(
            err.to_string(),
            "station#1 and station#2 must be joined by exactly one section, found 0"
        );
    }

    #[test]
    fn test_scenario_error_source_is_parse_error() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ScenarioError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&ScenarioError::NoMaps).is_none());
    }
}
