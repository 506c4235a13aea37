//! Scenario input: which stations appear, when and where, plus water
//! obstacles and optional pre-built lines.
//!
//! A scenario is a JSON [`ScenarioDescriptor`]. The [`ScenarioSchedule`]
//! resource releases the stations of the active map as their appearance tick
//! comes due and builds seeded lines once all of their stations exist.

mod schedule;
mod systems;
mod types;

#[cfg(test)]
mod tests;

pub use schedule::*;
pub use systems::*;
pub use types::*;
