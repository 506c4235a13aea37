use bevy::prelude::*;

use crate::clock::SimClock;
use crate::config::SimulationConfig;
use crate::notifications::{publish_notifications, NetworkNotification};
use crate::sim_rng::SimRng;

use super::types::SubwayNetwork;

impl FromWorld for SubwayNetwork {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();
        SubwayNetwork::new(&config)
    }
}

/// Spawn one passenger every `passenger_spawn_interval` ticks.
pub fn spawn_passengers(
    clock: Res<SimClock>,
    config: Res<SimulationConfig>,
    mut network: ResMut<SubwayNetwork>,
    mut rng: ResMut<SimRng>,
) {
    let interval = u64::from(config.passenger_spawn_interval);
    if interval == 0 || !clock.ticks.is_multiple_of(interval) {
        return;
    }
    if let Some(passenger) = network.spawn_random_passenger(&mut rng.0) {
        debug!("tick {}: {passenger} spawned", clock.ticks);
    }
}

pub fn route_passengers(mut network: ResMut<SubwayNetwork>) {
    let routed = network.route_waiting_passengers();
    if routed > 0 {
        debug!("routed {routed} waiting passengers");
    }
}

pub fn run_trains(mut network: ResMut<SubwayNetwork>, config: Res<SimulationConfig>) {
    network.advance_trains(config.boarding_ticks);
}

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SubwayNetwork>()
            .add_event::<NetworkNotification>()
            .add_systems(
                FixedUpdate,
                spawn_passengers
                    .after(crate::scenario::release_scenario_stations)
                    .in_set(crate::SimulationSet::PreSim),
            )
            .add_systems(
                FixedUpdate,
                (route_passengers, run_trains)
                    .chain()
                    .in_set(crate::SimulationSet::Simulation),
            )
            .add_systems(
                FixedUpdate,
                publish_notifications.in_set(crate::SimulationSet::PostSim),
            );
    }
}
