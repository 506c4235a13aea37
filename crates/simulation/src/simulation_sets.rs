//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! ```text
//! Control  →  PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **Control** – Clock signals and inventory requests. Always runs, so a
//!   paused session can still be resumed, reset or edited.
//! * **PreSim** – Tick counter, scenario station releases, passenger
//!   spawning. Gated on the clock running.
//! * **Simulation** – Passenger routing, train movement and dwell,
//!   overcrowding escalation. Gated on the clock running.
//! * **PostSim** – Publishing the network notification outbox. Always runs,
//!   and only reads simulation state.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain by `SimulationPlugin`; individual plugins use
/// `.in_set(SimulationSet::X)` and fine-grained `.after()` within a phase.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Control,
    PreSim,
    Simulation,
    PostSim,
}
