//! # TestNetwork — headless integration test harness
//!
//! Wraps `bevy::app::App` + `SimulationPlugin` for running integration tests
//! without a window or renderer. Ticks run the `FixedUpdate` schedule
//! directly, so every `tick(1)` is exactly one simulation step.

use bevy::app::App;
use bevy::prelude::*;

use crate::clock::{ClockSignal, SimClock};
use crate::config::SimulationConfig;
use crate::geometry::WaterMap;
use crate::ids::{LineId, PassengerId, StationId, TrainId};
use crate::inventory::InventoryDeployRequest;
use crate::network::SubwayNetwork;
use crate::notifications::NetworkNotification;
use crate::overcrowding::{GameOverEvent, OvercrowdingTracker};
use crate::scenario::{load_scenario, ScenarioSchedule};
use crate::station::StationKind;
use crate::SimulationPlugin;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use the builder methods to set up the network, then call `tick()` to
/// advance the simulation and assert on the resulting resources and events.
pub struct TestNetwork {
    app: App,
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TestNetwork {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// An empty network with passenger spawning disabled.
    pub fn new() -> Self {
        Self::with_config(SimulationConfig {
            passenger_spawn_interval: 0,
            ..Default::default()
        })
    }

    /// An empty network using `config`.
    pub fn with_config(config: SimulationConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        // Before SimulationPlugin so the network and RNG are built from it.
        app.insert_resource(config);
        app.add_plugins(SimulationPlugin);
        app.update();
        Self { app }
    }

    /// Install the first map of a JSON scenario.
    pub fn with_scenario(mut self, json: &str) -> Self {
        let map = load_scenario(json).unwrap_or_else(|e| panic!("bad test scenario: {e}"));
        let schedule = ScenarioSchedule::new(map);
        self.app.insert_resource(schedule.water_map());
        self.app.insert_resource(schedule);
        self
    }

    // -----------------------------------------------------------------------
    // Network setup
    // -----------------------------------------------------------------------

    pub fn station(&mut self, x: f32, y: f32, kind: StationKind) -> StationId {
        self.network_mut().spawn_station(Vec2::new(x, y), kind)
    }

    pub fn line(&mut self, stations: &[StationId]) -> LineId {
        let water = self.resource::<WaterMap>().clone();
        self.network_mut()
            .build_line(stations, &water)
            .unwrap_or_else(|e| panic!("bad test line: {e}"))
    }

    pub fn train(&mut self, line: LineId, near: Vec2) -> TrainId {
        self.network_mut()
            .deploy_train(line, near)
            .unwrap_or_else(|e| panic!("bad test train: {e}"))
    }

    pub fn passenger(&mut self, station: StationId, desired: StationKind) -> PassengerId {
        self.network_mut()
            .spawn_passenger(station, desired)
            .unwrap_or_else(|| panic!("no {station} for test passenger"))
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Run `n` fixed-update ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn send_clock(&mut self, signal: ClockSignal) {
        self.app.world_mut().send_event(signal);
    }

    pub fn deploy(&mut self, request: InventoryDeployRequest) {
        self.app.world_mut().send_event(request);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn network(&self) -> &SubwayNetwork {
        self.resource::<SubwayNetwork>()
    }

    pub fn network_mut(&mut self) -> Mut<'_, SubwayNetwork> {
        self.app.world_mut().resource_mut::<SubwayNetwork>()
    }

    pub fn clock(&self) -> &SimClock {
        self.resource::<SimClock>()
    }

    pub fn tracker(&self) -> &OvercrowdingTracker {
        self.resource::<OvercrowdingTracker>()
    }

    /// Every notification published since the last `clear_notifications`.
    pub fn notifications(&self) -> Vec<NetworkNotification> {
        self.resource::<Events<NetworkNotification>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    pub fn clear_notifications(&mut self) {
        self.app
            .world_mut()
            .resource_mut::<Events<NetworkNotification>>()
            .clear();
    }

    pub fn game_over_events(&self) -> Vec<GameOverEvent> {
        self.resource::<Events<GameOverEvent>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }

    pub fn delivered(&self) -> u64 {
        self.network().stats().passengers_delivered
    }
}
