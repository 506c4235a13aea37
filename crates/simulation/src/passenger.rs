//! Passengers: demand units travelling toward a station of a desired kind.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ids::{PassengerId, StationId};
use crate::routing::{Route, RouteHop};
use crate::station::StationKind;

/// A passenger waiting at a station or riding a train.
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub id: PassengerId,
    /// Station the passenger spawned at.
    pub origin: StationId,
    /// Kind of station the passenger wants to reach.
    pub desired: StationKind,
    /// Route from the passenger's current station, if one exists.
    pub route: Option<Route>,
}

impl Passenger {
    pub fn new(id: PassengerId, origin: StationId, desired: StationKind) -> Self {
        Self {
            id,
            origin,
            desired,
            route: None,
        }
    }

    /// Next leg the passenger wants to travel, if routed.
    pub fn next_hop(&self) -> Option<&RouteHop> {
        self.route.as_ref().and_then(Route::next_hop)
    }

    /// Whether the route must be (re)computed against `topology_version`.
    pub fn needs_route(&self, topology_version: u64) -> bool {
        match &self.route {
            None => true,
            Some(route) => route.computed_at != topology_version || route.is_finished(),
        }
    }

    /// Record arrival at `station`, consuming the leg that ends there.
    pub fn arrive_at(&mut self, station: StationId) {
        if let Some(route) = self.route.as_mut() {
            route.advance_to(station);
        }
    }

    pub fn wants(&self, kind: StationKind) -> bool {
        self.desired == kind
    }
}

/// Pick a desired kind uniformly among `present` kinds other than `origin`.
///
/// Falls back to every other kind when the map only holds the origin's kind.
pub fn choose_desired_kind<R: Rng + ?Sized>(
    rng: &mut R,
    origin: StationKind,
    present: &[StationKind],
) -> StationKind {
    let candidates: Vec<StationKind> = present.iter().copied().filter(|&k| k != origin).collect();
    if let Some(&kind) = candidates.choose(rng) {
        return kind;
    }
    let fallback: Vec<StationKind> = StationKind::ALL
        .iter()
        .copied()
        .filter(|&k| k != origin)
        .collect();
    fallback.choose(rng).copied().unwrap_or(origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim_rng::SimRng;

    #[test]
    fn test_desired_kind_never_origin() {
        let mut rng = SimRng::from_seed_u64(7);
        let present = [StationKind::Circle, StationKind::Square, StationKind::Triangle];
        for _ in 0..200 {
            let kind = choose_desired_kind(&mut rng.0, StationKind::Circle, &present);
            assert_ne!(kind, StationKind::Circle);
            assert!(present.contains(&kind));
        }
    }

    #[test]
    fn test_desired_kind_covers_all_candidates() {
        let mut rng = SimRng::from_seed_u64(11);
        let present = [StationKind::Circle, StationKind::Square, StationKind::Triangle];
        let picks: Vec<StationKind> = (0..200)
            .map(|_| choose_desired_kind(&mut rng.0, StationKind::Circle, &present))
            .collect();
        assert!(picks.contains(&StationKind::Square));
        assert!(picks.contains(&StationKind::Triangle));
    }

    #[test]
    fn test_single_kind_map_falls_back_to_other_kinds() {
        let mut rng = SimRng::from_seed_u64(3);
        let kind = choose_desired_kind(&mut rng.0, StationKind::Star, &[StationKind::Star]);
        assert_ne!(kind, StationKind::Star);
    }

    #[test]
    fn test_new_passenger_needs_route() {
        let passenger = Passenger::new(PassengerId(0), StationId(0), StationKind::Square);
        assert!(passenger.needs_route(0));
        assert!(passenger.next_hop().is_none());
    }
}
