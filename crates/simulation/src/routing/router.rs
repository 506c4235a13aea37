use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Add;

use pathfinding::num_traits::Zero;
use pathfinding::prelude::dijkstra_all;

use crate::ids::{ConnectionId, SectionId, StationId};
use crate::network::SubwayNetwork;
use crate::station::StationKind;

/// Path length used as the search cost, totally ordered with `f32::total_cmp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(pub f32);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        Distance(self.0 + rhs.0)
    }
}

impl Zero for Distance {
    fn zero() -> Self {
        Distance(0.0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

fn cost_of(length: f32) -> Distance {
    Distance(length.max(0.0))
}

/// One leg of a route: travel from `from` to `to` over `section`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteHop {
    pub from: StationId,
    pub to: StationId,
    pub section: SectionId,
    /// Connection of `section` in `from`.
    pub connection: ConnectionId,
    pub length: f32,
}

/// Path from an origin to the nearest station of a desired kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub target: StationId,
    /// Sum of hop lengths.
    pub distance: f32,
    pub hops: Vec<RouteHop>,
    /// Network topology version the route was computed against.
    pub computed_at: u64,
    next: usize,
}

impl Route {
    pub fn new(target: StationId, hops: Vec<RouteHop>, computed_at: u64) -> Self {
        Self {
            target,
            distance: hops.iter().map(|h| h.length).sum(),
            hops,
            computed_at,
            next: 0,
        }
    }

    /// Leg still to travel next.
    pub fn next_hop(&self) -> Option<&RouteHop> {
        self.hops.get(self.next)
    }

    /// Legs not travelled yet.
    pub fn remaining(&self) -> &[RouteHop] {
        self.hops.get(self.next..).unwrap_or_default()
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.hops.len()
    }

    /// Consume the next leg if it ends at `station`.
    pub fn advance_to(&mut self, station: StationId) -> bool {
        match self.hops.get(self.next) {
            Some(hop) if hop.to == station => {
                self.next += 1;
                true
            }
            _ => false,
        }
    }

    /// Departure connection of each leg, in travel order.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.hops.iter().map(|h| h.connection)
    }
}

/// Result of a full Dijkstra sweep from one origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub origin: StationId,
    /// Predecessor and distance of every reachable station.
    parents: HashMap<StationId, (StationId, Distance)>,
}

impl ShortestPaths {
    pub fn is_reachable(&self, station: StationId) -> bool {
        station == self.origin || self.parents.contains_key(&station)
    }

    /// Distance from the origin, in world units.
    pub fn distance(&self, station: StationId) -> Option<f32> {
        self.cost(station).map(|c| c.0)
    }

    pub fn predecessor(&self, station: StationId) -> Option<StationId> {
        self.parents.get(&station).map(|&(p, _)| p)
    }

    /// Stations reachable from the origin, origin excluded.
    pub fn reachable_count(&self) -> usize {
        self.parents.len()
    }

    fn cost(&self, station: StationId) -> Option<Distance> {
        if station == self.origin {
            return Some(Distance::zero());
        }
        self.parents.get(&station).map(|&(_, c)| c)
    }

    /// Stations from the origin to `station`, both included.
    pub fn path_to(&self, station: StationId) -> Option<Vec<StationId>> {
        if !self.is_reachable(station) {
            return None;
        }
        let mut path = vec![station];
        let mut current = station;
        while current != self.origin {
            current = self.predecessor(current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Dijkstra sweep over the station graph from `origin`.
pub fn shortest_paths(network: &SubwayNetwork, origin: StationId) -> ShortestPaths {
    let parents = dijkstra_all(&origin, |&station| {
        network
            .neighbors(station)
            .into_iter()
            .map(|n| (n.station, cost_of(n.length)))
    });
    ShortestPaths { origin, parents }
}

/// Route from `origin` to the nearest other station of kind `desired`.
///
/// `None` when the origin is unknown or isolated, or when no station of that
/// kind is reachable. Equidistant candidates resolve to the lowest station id.
pub fn find_route(network: &SubwayNetwork, origin: StationId, desired: StationKind) -> Option<Route> {
    network.station(origin)?;
    let sweep = shortest_paths(network, origin);
    if sweep.reachable_count() == 0 {
        return None;
    }

    let mut best: Option<(StationId, Distance)> = None;
    for station in network.stations() {
        if station.id == origin || station.kind != desired {
            continue;
        }
        let Some(cost) = sweep.cost(station.id) else {
            continue;
        };
        if best.is_none_or(|(_, c)| cost < c) {
            best = Some((station.id, cost));
        }
    }
    let (target, _) = best?;

    let stations = sweep.path_to(target)?;
    let hops = stations
        .windows(2)
        .map(|w| hop_between(network, w[0], w[1]))
        .collect::<Option<Vec<_>>>()?;
    Some(Route::new(target, hops, network.topology_version()))
}

/// Shortest section joining two adjacent stations.
fn hop_between(network: &SubwayNetwork, from: StationId, to: StationId) -> Option<RouteHop> {
    network
        .neighbors(from)
        .into_iter()
        .filter(|n| n.station == to)
        .min_by_key(|n| cost_of(n.length))
        .map(|n| RouteHop {
            from,
            to,
            section: n.section,
            connection: n.connection,
            length: n.length,
        })
}
