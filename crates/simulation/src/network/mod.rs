//! The subway network graph.
//!
//! [`SubwayNetwork`] owns every station, connection, subsection, section, line
//! and train of the session and is the only place topology changes. Elements
//! refer to each other by id; a back-reference is live exactly when its id is
//! still registered.
//!
//! ## Shape
//! - A `Section` is a chain `connection - subsection - connection - ...`
//!   between two stations. Its end connections are dead ends bound to the
//!   stations; interior connections are bends.
//! - A `Line` is an ordered list of stations with one section between each
//!   consecutive pair.
//!
//! Mutations push [`NetworkNotification`](crate::notifications::NetworkNotification)s
//! into an outbox drained once per tick.

mod elements;
mod graph;
mod service;
mod systems;
mod topology;
mod types;


pub use graph::Neighbor;
pub use service::upcoming_stop;
pub use systems::{route_passengers, run_trains, spawn_passengers, NetworkPlugin};
pub use types::*;
