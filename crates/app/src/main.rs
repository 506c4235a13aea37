//! Headless runner: plays one scenario map with logging and exits on game over.
//!
//! Environment:
//! - `METROLINE_CONFIG`: path to a JSON `SimulationConfig` (defaults otherwise).
//! - `METROLINE_SCENARIO`: path to a JSON scenario (built-in map otherwise).
//! - `METROLINE_MAX_TICKS`: stop after this many simulated ticks.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::clock::SimClock;
use simulation::config::SimulationConfig;
use simulation::inventory::{DeployTarget, InventoryDeployRequest, InventoryItem};
use simulation::notifications::NetworkNotification;
use simulation::overcrowding::GameOverEvent;
use simulation::scenario::{load_scenario, ScenarioSchedule};
use simulation::SimulationSet;

const DEFAULT_SCENARIO: &str = include_str!("../assets/default_scenario.json");

/// Tick limit from `METROLINE_MAX_TICKS`, if any.
#[derive(Resource)]
struct TickLimit(u64);

fn main() {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
        LogPlugin::default(),
    ));

    // Inserted before SimulationPlugin so the network and RNG are built from it.
    app.insert_resource(load_config());
    app.add_plugins(simulation::SimulationPlugin);

    let scenario = match std::env::var("METROLINE_SCENARIO") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                error!("Cannot read scenario {path}: {e}");
                return;
            }
        },
        Err(_) => DEFAULT_SCENARIO.to_string(),
    };
    let map = match load_scenario(&scenario) {
        Ok(map) => map,
        Err(e) => {
            error!("Invalid scenario: {e}");
            return;
        }
    };
    info!(
        "Playing map '{}' with {} stations",
        map.name,
        map.stations.len()
    );
    let schedule = ScenarioSchedule::new(map);
    app.insert_resource(schedule.water_map());
    app.insert_resource(schedule);

    if let Some(limit) = std::env::var("METROLINE_MAX_TICKS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        app.insert_resource(TickLimit(limit));
    }

    app.add_systems(
        FixedUpdate,
        (
            deploy_trains_on_new_lines,
            log_notifications,
            exit_on_game_over,
            exit_on_tick_limit,
        )
            .after(SimulationSet::PostSim),
    );
    app.run();
}

fn load_config() -> SimulationConfig {
    let Ok(path) = std::env::var("METROLINE_CONFIG") else {
        return SimulationConfig::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| SimulationConfig::from_json_str(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => {
            info!("Loaded config from {path}");
            config
        }
        Err(e) => {
            warn!("Ignoring config {path}: {e}");
            SimulationConfig::default()
        }
    }
}

/// Every new line gets one train from the inventory.
fn deploy_trains_on_new_lines(
    mut notifications: EventReader<NetworkNotification>,
    mut requests: EventWriter<InventoryDeployRequest>,
) {
    for notification in notifications.read() {
        if let NetworkNotification::LineCreated { line, midpoint, .. } = notification {
            requests.send(InventoryDeployRequest {
                item: InventoryItem::Train,
                target: DeployTarget::Line(*line),
                position: *midpoint,
            });
        }
    }
}

fn log_notifications(mut notifications: EventReader<NetworkNotification>) {
    for notification in notifications.read() {
        match notification {
            NetworkNotification::PassengerAdded { .. }
            | NetworkNotification::PassengerRemoved { .. } => trace!("{notification:?}"),
            NetworkNotification::StationOvercrowded { .. } => warn!("{notification:?}"),
            _ => info!("{notification:?}"),
        }
    }
}

fn exit_on_game_over(mut game_over: EventReader<GameOverEvent>, mut exit: EventWriter<AppExit>) {
    if let Some(event) = game_over.read().next() {
        info!(
            "Game over: station {:?} overcrowded for {} ticks",
            event.station, event.ticks_overcrowded
        );
        exit.send(AppExit::Success);
    }
}

fn exit_on_tick_limit(
    clock: Res<SimClock>,
    limit: Option<Res<TickLimit>>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(limit) = limit {
        if clock.ticks >= limit.0 {
            info!("Stopping after {} ticks", clock.ticks);
            exit.send(AppExit::Success);
        }
    }
}
