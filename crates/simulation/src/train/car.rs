use crate::ids::PassengerId;
use crate::passenger::Passenger;

use super::types::PassengerCar;

impl PassengerCar {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            passengers: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn occupancy(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_full(&self) -> bool {
        self.passengers.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    /// Seat a passenger. A full car hands the passenger back untouched.
    pub fn add_passenger(&mut self, passenger: Passenger) -> Result<(), Passenger> {
        if self.is_full() {
            return Err(passenger);
        }
        self.passengers.push(passenger);
        Ok(())
    }

    pub fn remove_passenger(&mut self, id: PassengerId) -> Option<Passenger> {
        let index = self.passengers.iter().position(|p| p.id == id)?;
        Some(self.passengers.remove(index))
    }

    /// Remove the first passenger matching `pred`, in boarding order.
    pub fn take_passenger_where(&mut self, pred: impl Fn(&Passenger) -> bool) -> Option<Passenger> {
        let index = self.passengers.iter().position(pred)?;
        Some(self.passengers.remove(index))
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Passenger> {
        self.passengers.drain(..)
    }
}
