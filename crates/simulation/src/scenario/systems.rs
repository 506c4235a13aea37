use bevy::prelude::*;

use crate::clock::SimClock;
use crate::geometry::WaterMap;
use crate::network::SubwayNetwork;

use super::schedule::ScenarioSchedule;

pub fn release_scenario_stations(
    clock: Res<SimClock>,
    schedule: Option<ResMut<ScenarioSchedule>>,
    water: Res<WaterMap>,
    mut network: ResMut<SubwayNetwork>,
) {
    let Some(mut schedule) = schedule else {
        return;
    };
    if schedule.is_complete() {
        return;
    }
    let spawned = schedule.release_due(clock.ticks, &mut network, &water);
    if !spawned.is_empty() {
        debug!("tick {}: {} stations appeared", clock.ticks, spawned.len());
    }
}

pub struct ScenarioPlugin;

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaterMap>().add_systems(
            FixedUpdate,
            release_scenario_stations
                .after(crate::clock::tick_clock)
                .in_set(crate::SimulationSet::PreSim),
        );
    }
}
