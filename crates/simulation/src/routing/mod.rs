//! Shortest-path routing to the nearest station of a desired kind.
//!
//! A Dijkstra sweep over stations, with section lengths as edge weights,
//! followed by a scan of candidate stations in id order. Both steps are pure
//! reads of the network.

mod router;


pub use router::*;
