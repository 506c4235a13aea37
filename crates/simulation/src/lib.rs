use bevy::prelude::*;

pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod inventory;
pub mod network;
pub mod notifications;
pub mod overcrowding;
pub mod pair;
pub mod passenger;
pub mod routing;
pub mod scenario;
pub mod sim_rng;
pub mod simulation_sets;
pub mod station;
pub mod train;

#[cfg(test)]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::SimulationConfig>()
            .init_resource::<sim_rng::SimRng>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Control,
                    SimulationSet::PreSim,
                    SimulationSet::Simulation,
                    SimulationSet::PostSim,
                )
                    .chain(),
            )
            .configure_sets(
                FixedUpdate,
                (SimulationSet::PreSim, SimulationSet::Simulation)
                    .run_if(clock::simulation_running),
            );

        app.add_plugins((
            clock::ClockPlugin,
            network::NetworkPlugin,
            scenario::ScenarioPlugin,
            inventory::InventoryPlugin,
            overcrowding::OvercrowdingPlugin,
        ));
    }
}
