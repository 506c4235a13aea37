//! Topology editing: laying sections and creating, extending and removing lines.
//!
//! Every operation validates up front and returns a [`TopologyError`] without
//! touching the graph when an invariant would break.

use bevy::prelude::*;

use crate::error::TopologyError;
use crate::geometry::{octilinear_path, polyline_midpoint, WaterMap};
use crate::ids::{ConnectionId, LineId, SectionId, StationId, SubSectionId};
use crate::notifications::NetworkNotification;
use crate::pair::Pair;

use super::types::*;

impl SubwayNetwork {
    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    fn station_position(&self, id: StationId) -> Result<Vec2, TopologyError> {
        self.stations
            .get(&id)
            .map(|s| s.position)
            .ok_or(TopologyError::UnknownStation(id))
    }

    fn require_free_slots(&self, id: StationId, slots: usize) -> Result<(), TopologyError> {
        let station = self
            .stations
            .get(&id)
            .ok_or(TopologyError::UnknownStation(id))?;
        if station.connections.len() + slots > crate::config::MAX_STATION_CONNECTIONS {
            return Err(TopologyError::StationSaturated(id));
        }
        Ok(())
    }

    /// Register connections and subsections along `points` for `section`.
    ///
    /// The first and last connections are bound to the section's stations and
    /// are dead ends; interior connections join two consecutive legs.
    fn lay_chain(
        &mut self,
        section: SectionId,
        stations: Pair<StationId>,
        points: &[Vec2],
        water: &WaterMap,
    ) -> (Vec<ConnectionId>, Vec<SubSectionId>) {
        let connection_ids: Vec<ConnectionId> = points.iter().map(|_| self.ids.connection()).collect();
        let subsection_ids: Vec<SubSectionId> =
            (1..points.len()).map(|_| self.ids.subsection()).collect();
        let last = points.len() - 1;

        for (leg, &id) in subsection_ids.iter().enumerate() {
            let (from, to) = (points[leg], points[leg + 1]);
            let ends = Pair::new(connection_ids[leg], connection_ids[leg + 1]);
            let sub = SubSection::new(id, ends, from, to, water.crosses(from, to));
            self.subsections.insert(id, sub);
        }

        for (i, (&id, &position)) in connection_ids.iter().zip(points).enumerate() {
            let subsections = if i == 0 {
                Pair::both(subsection_ids[0])
            } else if i == last {
                Pair::both(subsection_ids[last - 1])
            } else {
                Pair::new(subsection_ids[i - 1], subsection_ids[i])
            };
            let (station, owner) = if i == 0 {
                (Some(stations.first), Some(section))
            } else if i == last {
                (Some(stations.second), Some(section))
            } else {
                (None, None)
            };
            self.connections.insert(
                id,
                Connection {
                    id,
                    position,
                    subsections,
                    station,
                    section: owner,
                },
            );
        }

        (connection_ids, subsection_ids)
    }

    fn section_shape(
        &self,
        from: StationId,
        to: StationId,
        bends: Option<&[Vec2]>,
    ) -> Result<Vec<Vec2>, TopologyError> {
        let a = self.station_position(from)?;
        let b = self.station_position(to)?;
        Ok(match bends {
            Some(bends) => std::iter::once(a)
                .chain(bends.iter().copied())
                .chain(std::iter::once(b))
                .collect(),
            None => octilinear_path(a, b),
        })
    }

    fn lay_section(
        &mut self,
        from: StationId,
        to: StationId,
        bends: Option<&[Vec2]>,
        water: &WaterMap,
    ) -> Result<SectionId, TopologyError> {
        if from == to {
            return Err(TopologyError::SameStation(from));
        }
        self.require_free_slots(from, 1)?;
        self.require_free_slots(to, 1)?;
        let points = self.section_shape(from, to, bends)?;

        let id = self.ids.section();
        let stations = Pair::new(from, to);
        let (connections, subsections) = self.lay_chain(id, stations, &points, water);
        self.attach_ends(stations, &connections)?;
        self.sections
            .insert(id, Section::new(id, stations, connections, subsections));
        self.topology_version += 1;
        Ok(id)
    }

    fn attach_ends(
        &mut self,
        stations: Pair<StationId>,
        connections: &[ConnectionId],
    ) -> Result<(), TopologyError> {
        let (Some(&first), Some(&last)) = (connections.first(), connections.last()) else {
            return Ok(());
        };
        for (station, connection) in [(stations.first, first), (stations.second, last)] {
            self.stations
                .get_mut(&station)
                .ok_or(TopologyError::UnknownStation(station))?
                .attach_connection(connection)?;
        }
        Ok(())
    }

    fn drop_chain(&mut self, connections: &[ConnectionId], subsections: &[SubSectionId]) {
        for id in connections {
            if let Some(connection) = self.connections.remove(id) {
                if let Some(station) = connection.station.and_then(|s| self.stations.get_mut(&s)) {
                    station.detach_connection(*id);
                }
            }
        }
        for id in subsections {
            self.subsections.remove(id);
        }
    }

    fn tear_down_section(&mut self, id: SectionId) -> Option<Section> {
        let section = self.sections.remove(&id)?;
        self.drop_chain(&section.connections, &section.subsections);
        self.topology_version += 1;
        Some(section)
    }

    /// Lay a free-standing section between two stations, to be registered
    /// with a line through [`SubwayNetwork::add_line`].
    pub fn connect_stations(
        &mut self,
        from: StationId,
        to: StationId,
        water: &WaterMap,
    ) -> Result<SectionId, TopologyError> {
        self.lay_section(from, to, None, water)
    }

    /// Replace the interior shape of a section with `bends`.
    pub fn reshape_section(
        &mut self,
        id: SectionId,
        bends: &[Vec2],
        water: &WaterMap,
    ) -> Result<(), TopologyError> {
        let stations = self
            .sections
            .get(&id)
            .ok_or(TopologyError::UnknownSection(id))?
            .stations;
        let points = self.section_shape(stations.first, stations.second, Some(bends))?;

        let (connections, subsections) = self.lay_chain(id, stations, &points, water);
        let Some(section) = self.sections.get_mut(&id) else {
            return Err(TopologyError::UnknownSection(id));
        };
        let (old_connections, old_subsections) = section.replace_chain(connections.clone(), subsections);
        // Old ends go first so the stations keep the same slot count.
        self.drop_chain(&old_connections, &old_subsections);
        self.attach_ends(stations, &connections)?;

        self.topology_version += 1;
        self.outbox.push(NetworkNotification::SectionReshaped {
            section: id,
            midpoint: polyline_midpoint(&points),
        });
        Ok(())
    }

    fn section_midpoint(&self, id: SectionId) -> Vec2 {
        self.sections
            .get(&id)
            .and_then(|s| self.section_points(id, s.stations.first))
            .map(|points| polyline_midpoint(&points))
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Lines
    // -------------------------------------------------------------------------

    /// Open a new line between two stations.
    pub fn create_line(
        &mut self,
        a: StationId,
        b: StationId,
        water: &WaterMap,
    ) -> Result<LineId, TopologyError> {
        let section = self.lay_section(a, b, None, water)?;
        let line = self.ids.line();
        if let Some(s) = self.sections.get_mut(&section) {
            s.line = Some(line);
        }
        self.lines.insert(line, Line::new(line, vec![a, b], vec![section]));

        info!("{line} opened between {a} and {b}");
        let midpoint = self.section_midpoint(section);
        self.outbox.push(NetworkNotification::LineCreated {
            line,
            section,
            stations: Pair::new(a, b),
            midpoint,
        });
        Ok(line)
    }

    /// Attach `station` beyond one end of a line.
    pub fn extend_line(
        &mut self,
        line: LineId,
        end: LineEnd,
        station: StationId,
        water: &WaterMap,
    ) -> Result<SectionId, TopologyError> {
        let current = self.lines.get(&line).ok_or(TopologyError::UnknownLine(line))?;
        if current.contains(station) {
            return Err(TopologyError::DuplicateStation { line, station });
        }
        let anchor = current.end(end).ok_or(TopologyError::TooFewStations(0))?;

        let section = match end {
            LineEnd::Head => self.lay_section(station, anchor, None, water)?,
            LineEnd::Tail => self.lay_section(anchor, station, None, water)?,
        };
        if let Some(s) = self.sections.get_mut(&section) {
            s.line = Some(line);
        }
        let Some(target) = self.lines.get_mut(&line) else {
            return Err(TopologyError::UnknownLine(line));
        };
        match end {
            LineEnd::Head => {
                target.stations.insert(0, station);
                target.sections.insert(0, section);
            }
            LineEnd::Tail => {
                target.stations.push(station);
                target.sections.push(section);
            }
        }

        debug!("{line} extended to {station} from {anchor}");
        self.outbox.push(NetworkNotification::LineExtended {
            line,
            section,
            added: station,
            anchor,
        });
        Ok(section)
    }

    /// Split `section` of `line` in two around `station`.
    pub fn insert_station(
        &mut self,
        line: LineId,
        section: SectionId,
        station: StationId,
        water: &WaterMap,
    ) -> Result<Pair<SectionId>, TopologyError> {
        let current = self.lines.get(&line).ok_or(TopologyError::UnknownLine(line))?;
        let index = current
            .section_index(section)
            .ok_or(TopologyError::SectionNotOnLine { line, section })?;
        if current.contains(station) {
            return Err(TopologyError::DuplicateStation { line, station });
        }
        let (before, after) = (current.stations[index], current.stations[index + 1]);
        self.require_free_slots(station, 2)?;

        self.tear_down_section(section);
        let first = self.lay_section(before, station, None, water)?;
        let second = self.lay_section(station, after, None, water)?;
        for id in [first, second] {
            if let Some(s) = self.sections.get_mut(&id) {
                s.line = Some(line);
            }
        }
        let Some(target) = self.lines.get_mut(&line) else {
            return Err(TopologyError::UnknownLine(line));
        };
        target.stations.insert(index + 1, station);
        target.sections[index] = first;
        target.sections.insert(index + 1, second);

        let sections = Pair::new(first, second);
        let midpoints = sections.map(|s| self.section_midpoint(s));
        debug!("{line}: {station} inserted into {section}");
        self.outbox.push(NetworkNotification::LineInnerExtended {
            line,
            old_section: section,
            inserted: station,
            sections,
            midpoints,
        });
        Ok(sections)
    }

    /// Build a whole line through `stations` in order.
    ///
    /// On failure every section laid so far is removed again.
    pub fn build_line(
        &mut self,
        stations: &[StationId],
        water: &WaterMap,
    ) -> Result<LineId, TopologyError> {
        let [first, second, rest @ ..] = stations else {
            return Err(TopologyError::TooFewStations(stations.len()));
        };
        let line = self.create_line(*first, *second, water)?;
        for &station in rest {
            if let Err(e) = self.extend_line(line, LineEnd::Tail, station, water) {
                self.remove_line(line);
                return Err(e);
            }
        }
        Ok(line)
    }

    /// Register a pre-assembled line.
    ///
    /// `Ok(false)` if a line with that id exists. Fails if the line has fewer
    /// than two stations, repeats a station, or any consecutive pair is not
    /// joined by exactly one of its sections.
    pub fn add_line(&mut self, line: Line) -> Result<bool, TopologyError> {
        if self.lines.contains_key(&line.id) {
            return Ok(false);
        }
        self.validate_line(&line)?;

        for id in &line.sections {
            if let Some(section) = self.sections.get_mut(id) {
                section.line = Some(line.id);
            }
        }
        self.ids.reserve_line(line.id);
        self.topology_version += 1;
        if let (Some(&section), [a, b, ..]) = (line.sections.first(), line.stations.as_slice()) {
            let midpoint = self.section_midpoint(section);
            self.outbox.push(NetworkNotification::LineCreated {
                line: line.id,
                section,
                stations: Pair::new(*a, *b),
                midpoint,
            });
        }
        info!("{} registered with {} stations", line.id, line.stations.len());
        self.lines.insert(line.id, line);
        Ok(true)
    }

    fn validate_line(&self, line: &Line) -> Result<(), TopologyError> {
        if line.stations.len() < 2 {
            return Err(TopologyError::TooFewStations(line.stations.len()));
        }
        for (i, &station) in line.stations.iter().enumerate() {
            if !self.stations.contains_key(&station) {
                return Err(TopologyError::UnknownStation(station));
            }
            if line.stations[..i].contains(&station) {
                return Err(TopologyError::DuplicateStation {
                    line: line.id,
                    station,
                });
            }
        }
        for &id in &line.sections {
            let section = self
                .sections
                .get(&id)
                .ok_or(TopologyError::UnknownSection(id))?;
            if section.line.is_some_and(|owner| owner != line.id) {
                return Err(TopologyError::SectionNotOnLine { line: line.id, section: id });
            }
        }
        for (i, pair) in line.stations.windows(2).enumerate() {
            let ends = Pair::new(pair[0], pair[1]);
            let joining = line
                .sections
                .iter()
                .filter(|id| self.sections.get(id).is_some_and(|s| s.stations.same_ends(&ends)))
                .count();
            let in_place = line
                .sections
                .get(i)
                .and_then(|id| self.sections.get(id))
                .is_some_and(|s| s.stations.same_ends(&ends));
            if joining != 1 || !in_place {
                return Err(TopologyError::BrokenChain {
                    from: ends.first,
                    to: ends.second,
                    sections: joining,
                });
            }
        }
        if line.sections.len() != line.stations.len() - 1 {
            return Err(TopologyError::BrokenChain {
                from: line.stations[0],
                to: line.stations[line.stations.len() - 1],
                sections: line.sections.len(),
            });
        }
        Ok(())
    }

    /// Remove a line with its sections and trains.
    pub fn remove_line(&mut self, id: LineId) -> bool {
        let Some(line) = self.lines.remove(&id) else {
            return false;
        };
        let trains: Vec<_> = self
            .trains
            .values()
            .filter(|t| t.line == id)
            .map(|t| t.id)
            .collect();
        for train in trains {
            self.remove_train(train);
        }
        for section in &line.sections {
            self.tear_down_section(*section);
        }
        self.topology_version += 1;
        info!("{id} removed");
        self.outbox.push(NetworkNotification::LineRemoved { line: id });
        true
    }
}
