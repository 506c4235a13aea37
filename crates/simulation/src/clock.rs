//! Simulation clock: start/pause/reset/speed signals and the tick counter.
//!
//! Speed is applied by scaling the `FixedUpdate` timestep, so each tick always
//! advances the network by the same amount of simulated time.

use std::time::Duration;

use bevy::prelude::*;

use crate::config::{SimulationConfig, BASE_TICK_MILLIS};
use crate::network::SubwayNetwork;
use crate::overcrowding::OvercrowdingTracker;
use crate::scenario::ScenarioSchedule;
use crate::sim_rng::SimRng;

/// Control signal from the clock owner (UI, script, test).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum ClockSignal {
    Start,
    Pause,
    /// Rebuild the session from scratch and restart the tick count.
    Reset,
    SpeedChange(f32),
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimClock {
    pub running: bool,
    pub speed: f32,
    /// Ticks simulated since the session started.
    pub ticks: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            running: true,
            speed: 1.0,
            ticks: 0,
        }
    }
}

impl SimClock {
    pub const MIN_SPEED: f32 = 0.25;
    pub const MAX_SPEED: f32 = 16.0;

    /// Apply a signal. Returns `true` when the session must be reset.
    pub fn apply(&mut self, signal: ClockSignal) -> bool {
        match signal {
            ClockSignal::Start => self.running = true,
            ClockSignal::Pause => self.running = false,
            ClockSignal::SpeedChange(speed) => self.speed = speed,
            ClockSignal::Reset => {
                self.ticks = 0;
                return true;
            }
        }
        false
    }

    pub fn tick(&mut self) {
        if self.running {
            self.ticks += 1;
        }
    }

    /// `FixedUpdate` period for the current speed. Base rate is 10 Hz; at 2x
    /// it becomes 50 ms, at 4x 25 ms.
    pub fn timestep(&self) -> Duration {
        let base = Duration::from_millis(BASE_TICK_MILLIS);
        if self.speed <= 0.0 || !self.speed.is_finite() {
            return base;
        }
        base.div_f32(self.speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED))
    }
}

/// Run condition for the gated simulation phases.
pub fn simulation_running(clock: Res<SimClock>) -> bool {
    clock.running
}

pub fn tick_clock(mut clock: ResMut<SimClock>) {
    clock.tick();
}

pub fn apply_clock_signals(
    mut signals: EventReader<ClockSignal>,
    mut clock: ResMut<SimClock>,
    config: Res<SimulationConfig>,
    mut network: ResMut<SubwayNetwork>,
    mut tracker: ResMut<OvercrowdingTracker>,
    mut rng: ResMut<SimRng>,
    schedule: Option<ResMut<ScenarioSchedule>>,
) {
    let mut reset = false;
    for signal in signals.read() {
        debug!("clock signal {signal:?}");
        reset |= clock.apply(*signal);
    }
    if !reset {
        return;
    }
    *network = SubwayNetwork::new(&config);
    *tracker = OvercrowdingTracker::default();
    *rng = SimRng::from_seed_u64(config.seed);
    if let Some(mut schedule) = schedule {
        schedule.rewind();
    }
    info!("session reset");
}

/// Scales the `FixedUpdate` timestep based on `SimClock` speed.
pub fn sync_fixed_timestep(clock: Res<SimClock>, mut time: ResMut<Time<Fixed>>) {
    time.set_timestep(clock.timestep());
}

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .add_event::<ClockSignal>()
            .add_systems(
                FixedUpdate,
                apply_clock_signals.in_set(crate::SimulationSet::Control),
            )
            .add_systems(FixedUpdate, tick_clock.in_set(crate::SimulationSet::PreSim))
            .add_systems(Update, sync_fixed_timestep);
    }
}
