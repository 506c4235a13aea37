//! Trains and passenger cars.
//!
//! A train carries one mandatory car plus optional cars deployed from the
//! inventory. Boarding fills cars front to back (mandatory first); alighting
//! drains them back to front (last optional car first), so late cars empty
//! first. Motion is a two-state machine driven once per tick by
//! [`Train::live`].

mod car;
mod state;
mod types;


pub use types::*;
