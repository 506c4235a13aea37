//! `Station` methods: passenger queue, capacity and connection slots.

use bevy::prelude::*;

use crate::config::MAX_STATION_CONNECTIONS;
use crate::error::TopologyError;
use crate::ids::{ConnectionId, PassengerId, StationId};
use crate::passenger::Passenger;

use super::types::*;

impl Station {
    pub fn new(id: StationId, position: Vec2, kind: StationKind, max_capacity: usize) -> Self {
        Self {
            id,
            position,
            kind,
            max_capacity,
            passengers: Vec::new(),
            connections: Vec::new(),
            overcrowded: false,
        }
    }

    // -------------------------------------------------------------------------
    // Passenger queue
    // -------------------------------------------------------------------------

    pub fn occupancy(&self) -> usize {
        self.passengers.len()
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn is_overcrowded(&self) -> bool {
        self.overcrowded
    }

    /// Queue a passenger on the platform.
    ///
    /// Never refused: a station may go arbitrarily far over capacity. Returns
    /// `BecameOvercrowded` only on the addition that crosses `max_capacity`.
    pub fn add_passenger(&mut self, passenger: Passenger) -> Option<CapacityChange> {
        self.passengers.push(passenger);
        self.refresh_overcrowding()
    }

    /// Remove a passenger by identity.
    pub fn remove_passenger(
        &mut self,
        id: PassengerId,
    ) -> Option<(Passenger, Option<CapacityChange>)> {
        let index = self.passengers.iter().position(|p| p.id == id)?;
        Some(self.remove_at(index))
    }

    /// Remove the first waiting passenger (in arrival order) matching `pred`.
    pub fn take_passenger_where(
        &mut self,
        pred: impl Fn(&Passenger) -> bool,
    ) -> Option<(Passenger, Option<CapacityChange>)> {
        let index = self.passengers.iter().position(pred)?;
        Some(self.remove_at(index))
    }

    fn remove_at(&mut self, index: usize) -> (Passenger, Option<CapacityChange>) {
        // Keep arrival order so the longest-waiting passenger boards first.
        let passenger = self.passengers.remove(index);
        (passenger, self.refresh_overcrowding())
    }

    /// Change the capacity (station upgrade).
    pub fn set_capacity(&mut self, max_capacity: usize) -> Option<CapacityChange> {
        self.max_capacity = max_capacity;
        self.refresh_overcrowding()
    }

    pub(crate) fn passengers_mut(&mut self) -> impl Iterator<Item = &mut Passenger> {
        self.passengers.iter_mut()
    }

    pub(crate) fn drain_passengers(&mut self) -> Vec<Passenger> {
        self.overcrowded = false;
        std::mem::take(&mut self.passengers)
    }

    fn refresh_overcrowding(&mut self) -> Option<CapacityChange> {
        let over = self.passengers.len() > self.max_capacity;
        match (self.overcrowded, over) {
            (false, true) => {
                self.overcrowded = true;
                Some(CapacityChange::BecameOvercrowded)
            }
            (true, false) => {
                self.overcrowded = false;
                Some(CapacityChange::Relieved)
            }
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Connections
    // -------------------------------------------------------------------------

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn has_free_slot(&self) -> bool {
        self.connections.len() < MAX_STATION_CONNECTIONS
    }

    pub(crate) fn attach_connection(&mut self, id: ConnectionId) -> Result<(), TopologyError> {
        if !self.has_free_slot() {
            return Err(TopologyError::StationSaturated(self.id));
        }
        self.connections.push(id);
        Ok(())
    }

    pub(crate) fn detach_connection(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|&c| c != id);
        self.connections.len() < before
    }
}
