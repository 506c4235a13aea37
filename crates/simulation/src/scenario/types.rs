//! Serde types for scenario descriptors.

use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::station::StationKind;

/// One station appearing on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAppearance {
    /// Tick at which the station appears.
    #[serde(default)]
    pub at_tick: u64,
    pub position: [f32; 2],
    pub kind: StationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    pub name: String,
    pub stations: Vec<StationAppearance>,
    /// Water polygons, passed through to the view layer.
    #[serde(default)]
    pub water: Vec<Vec<[f32; 2]>>,
    /// Lines to build up front, as indices into `stations`.
    #[serde(default)]
    pub lines: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub name: String,
    pub maps: Vec<MapDescriptor>,
}

impl ScenarioDescriptor {
    /// Parse and validate a JSON descriptor.
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let descriptor: ScenarioDescriptor = serde_json::from_str(json)?;
        if descriptor.maps.is_empty() {
            return Err(ScenarioError::NoMaps);
        }
        for map in &descriptor.maps {
            if let Some(&index) = map
                .lines
                .iter()
                .flatten()
                .find(|&&i| i >= map.stations.len())
            {
                return Err(ScenarioError::UnknownStationIndex {
                    map: map.name.clone(),
                    index,
                });
            }
        }
        Ok(descriptor)
    }
}

/// Parse a scenario and return its first map, which the simulation plays.
pub fn load_scenario(json: &str) -> Result<MapDescriptor, ScenarioError> {
    let descriptor = ScenarioDescriptor::from_json_str(json)?;
    descriptor
        .maps
        .into_iter()
        .next()
        .ok_or(ScenarioError::NoMaps)
}
