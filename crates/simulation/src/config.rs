//! Default constants and the data-driven `SimulationConfig` resource.
//!
//! Systems read tunables from `Res<SimulationConfig>`; the constants below
//! are only the defaults it starts from.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Waiting passengers a station holds before it counts as overcrowded.
pub const DEFAULT_STATION_CAPACITY: usize = 10;

/// Hard limit on connections incident to one station (two per line passing through).
pub const MAX_STATION_CONNECTIONS: usize = 8;

/// Seats per passenger car.
pub const CAR_CAPACITY: usize = 6;

/// Ticks a station may stay overcrowded before the session is lost.
/// 450 ticks = 45 s at the 10 Hz base rate.
pub const DEFAULT_OVERCROWDING_DELAY_TICKS: u32 = 450;

/// Ticks between two passenger spawns.
pub const DEFAULT_PASSENGER_SPAWN_INTERVAL: u32 = 30;

/// Train speed in world units per tick.
pub const DEFAULT_TRAIN_SPEED: f32 = 4.0;

/// Ticks one boarding or alighting takes during a dwell.
pub const DEFAULT_BOARDING_TICKS: u32 = 2;

/// Extra capacity granted by a station upgrade from the inventory.
pub const DEFAULT_STATION_UPGRADE_CAPACITY: usize = 6;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Base fixed-update period; clock speed scales it.
pub const BASE_TICK_MILLIS: u64 = 100;

/// Runtime tunables for the simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Capacity given to newly spawned stations.
    pub station_capacity: usize,
    /// Seats in every passenger car.
    pub car_capacity: usize,
    /// Ticks a station may stay overcrowded before game over.
    pub overcrowding_delay_ticks: u32,
    /// Ticks between passenger spawns. 0 disables spawning.
    pub passenger_spawn_interval: u32,
    /// Train speed in world units per tick.
    pub train_speed: f32,
    /// Ticks per boarding/alighting action.
    pub boarding_ticks: u32,
    /// Capacity added by a station upgrade.
    pub station_upgrade_capacity: usize,
    /// Seed for `SimRng`.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            station_capacity: DEFAULT_STATION_CAPACITY,
            car_capacity: CAR_CAPACITY,
            overcrowding_delay_ticks: DEFAULT_OVERCROWDING_DELAY_TICKS,
            passenger_spawn_interval: DEFAULT_PASSENGER_SPAWN_INTERVAL,
            train_speed: DEFAULT_TRAIN_SPEED,
            boarding_ticks: DEFAULT_BOARDING_TICKS,
            station_upgrade_capacity: DEFAULT_STATION_UPGRADE_CAPACITY,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimulationConfig::from_json_str(r#"{ "station_capacity": 3 }"#).unwrap();
        assert_eq!(config.station_capacity, 3);
        assert_eq!(config.car_capacity, CAR_CAPACITY);
        assert_eq!(
            config.overcrowding_delay_ticks,
            DEFAULT_OVERCROWDING_DELAY_TICKS
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(SimulationConfig::from_json_str("{ station_capacity: }").is_err());
    }
}
