//! Overcrowding escalation: how long each station has been over capacity.
//!
//! Stations only report edge-triggered overcrowding. The tracker observes the
//! network once per tick, counts ticks spent overcrowded per station and ends
//! the session when any station stays over capacity for the configured delay.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::clock::SimClock;
use crate::ids::StationId;
use crate::network::SubwayNetwork;

/// A station stayed overcrowded for the whole delay budget.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverEvent {
    pub station: StationId,
    pub ticks_overcrowded: u32,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct OvercrowdingTracker {
    /// Ticks spent overcrowded, for currently overcrowded stations only.
    overcrowded: BTreeMap<StationId, u32>,
    /// Station that ended the session, once latched.
    game_over: Option<StationId>,
}

impl OvercrowdingTracker {
    /// Count one tick for every overcrowded station and forget relieved ones.
    ///
    /// Returns the game-over event the first time a station reaches the
    /// network's delay; later calls return `None`.
    pub fn observe(&mut self, network: &SubwayNetwork) -> Option<GameOverEvent> {
        if self.game_over.is_some() {
            return None;
        }
        self.overcrowded
            .retain(|&id, _| network.station(id).is_some_and(|s| s.is_overcrowded()));
        for station in network.stations().filter(|s| s.is_overcrowded()) {
            *self.overcrowded.entry(station.id).or_insert(0) += 1;
        }

        let limit = network.overcrowding_delay_ticks();
        let (&station, &ticks) = self.overcrowded.iter().find(|(_, t)| **t >= limit)?;
        self.game_over = Some(station);
        Some(GameOverEvent {
            station,
            ticks_overcrowded: ticks,
        })
    }

    pub fn ticks_overcrowded(&self, station: StationId) -> Option<u32> {
        self.overcrowded.get(&station).copied()
    }

    pub fn overcrowded_count(&self) -> usize {
        self.overcrowded.len()
    }

    pub fn game_over(&self) -> Option<StationId> {
        self.game_over
    }
}

/// Advance the tracker and stop the clock on game over.
pub fn track_overcrowding(
    network: Res<SubwayNetwork>,
    mut tracker: ResMut<OvercrowdingTracker>,
    mut clock: ResMut<SimClock>,
    mut game_over: EventWriter<GameOverEvent>,
) {
    let Some(event) = tracker.observe(&network) else {
        return;
    };
    info!(
        "{} overcrowded for {} ticks: game over",
        event.station, event.ticks_overcrowded
    );
    clock.running = false;
    game_over.send(event);
}

pub struct OvercrowdingPlugin;

impl Plugin for OvercrowdingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OvercrowdingTracker>()
            .add_event::<GameOverEvent>()
            .add_systems(
                FixedUpdate,
                track_overcrowding
                    .after(crate::network::run_trains)
                    .in_set(crate::SimulationSet::Simulation),
            );
    }
}
