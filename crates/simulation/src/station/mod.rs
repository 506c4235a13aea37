//! Stations: demand/supply nodes with a bounded passenger queue.
//!
//! A station holds the passengers waiting on its platform and the ordered list
//! of connections anchoring sections to it. Capacity changes are reported as
//! edge-triggered [`CapacityChange`] values: the station flips its
//! overcrowding flag when occupancy crosses `max_capacity` and tells the caller
//! exactly once per crossing.

mod state;
mod types;

#[cfg(test)]
mod tests;

pub use types::*;
