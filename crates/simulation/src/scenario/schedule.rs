use bevy::prelude::*;

use crate::geometry::WaterMap;
use crate::ids::StationId;
use crate::network::SubwayNetwork;

use super::types::MapDescriptor;

/// Release state of the active map.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ScenarioSchedule {
    map: MapDescriptor,
    /// Network id of each released station, by descriptor index.
    released: Vec<Option<StationId>>,
    /// Seeded lines already built or abandoned.
    lines_done: Vec<bool>,
}

impl ScenarioSchedule {
    pub fn new(map: MapDescriptor) -> Self {
        let released = vec![None; map.stations.len()];
        let lines_done = vec![false; map.lines.len()];
        Self {
            map,
            released,
            lines_done,
        }
    }

    pub fn map(&self) -> &MapDescriptor {
        &self.map
    }

    pub fn water_map(&self) -> WaterMap {
        WaterMap::new(self.map.water.clone())
    }

    /// Network id of a released station.
    pub fn station_id(&self, index: usize) -> Option<StationId> {
        self.released.get(index).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.released.iter().all(Option::is_some) && self.lines_done.iter().all(|&d| d)
    }

    /// Forget every release so the map plays again from tick 0.
    pub fn rewind(&mut self) {
        self.released.iter_mut().for_each(|r| *r = None);
        self.lines_done.iter_mut().for_each(|d| *d = false);
    }

    /// Spawn every station due at `tick`, then build the seeded lines whose
    /// stations all exist. Returns the stations spawned.
    pub fn release_due(&mut self, tick: u64, network: &mut SubwayNetwork, water: &WaterMap) -> Vec<StationId> {
        let mut spawned = Vec::new();
        for (appearance, slot) in self.map.stations.iter().zip(&mut self.released) {
            if slot.is_some() || appearance.at_tick > tick {
                continue;
            }
            let [x, y] = appearance.position;
            let id = network.spawn_station(Vec2::new(x, y), appearance.kind);
            *slot = Some(id);
            spawned.push(id);
        }

        for (indices, done) in self.map.lines.iter().zip(&mut self.lines_done) {
            if *done {
                continue;
            }
            let Some(stations) = indices
                .iter()
                .map(|&i| self.released.get(i).copied().flatten())
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            *done = true;
            match network.build_line(&stations, water) {
                Ok(line) => info!("scenario {line} built through {} stations", stations.len()),
                Err(e) => warn!("scenario line {indices:?} skipped: {e}"),
            }
        }
        spawned
    }
}
