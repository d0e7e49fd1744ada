//! The value every builder returns: an ordered list of legs.
//!
//! # Duration accounting
//!
//! Each leg carries its adjusted minutes with the target's service time baked
//! in, plus that service time on its own.  The total pays travel for every
//! leg and service once per *required* stop:
//!
//! ```text
//! total = Σ (minutes − service)  +  Σ service(s) for distinct required s visited
//! ```

use std::collections::BTreeSet;

use wr_core::{ArcId, LocationId, NodeId, Turn};
use wr_network::CityGraph;

use crate::Route;

/// Why a leg was driven.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegRole {
    /// Plain travel between stops.
    Travel,
    /// Full coverage: the leg collects its street.
    Collecting,
    /// Full coverage: driving to the next street to collect, or home.
    Repositioning,
}

/// One traversed arc.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub arc: ArcId,
    pub from: NodeId,
    pub to: NodeId,
    pub to_location: LocationId,
    /// Adjusted minutes, service time included.
    pub minutes: f64,
    /// Service minutes of the target baked into `minutes`.
    pub service_min: f64,
    pub role: LegRole,
}

/// Ordered legs from a start node plus the stops that require collection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Itinerary {
    start: NodeId,
    legs: Vec<Leg>,
    required: BTreeSet<LocationId>,
}

impl Itinerary {
    pub fn new(start: NodeId) -> Self {
        Self { start, legs: Vec::new(), required: BTreeSet::new() }
    }

    // ── Building ──────────────────────────────────────────────────────────

    pub(crate) fn push_arc(&mut self, graph: &CityGraph, arc: ArcId, minutes: f64, role: LegRole) {
        let to = graph.arc_to[arc.index()];
        self.legs.push(Leg {
            arc,
            from: graph.arc_from[arc.index()],
            to,
            to_location: graph.node_location(to),
            minutes,
            service_min: graph.arc_service_min(arc),
            role,
        });
    }

    pub(crate) fn push_route(&mut self, graph: &CityGraph, route: &Route, role: LegRole) {
        for (&arc, &minutes) in route.arcs.iter().zip(&route.minutes) {
            self.push_arc(graph, arc, minutes, role);
        }
    }

    pub(crate) fn require(&mut self, loc: LocationId) {
        self.required.insert(loc);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Node the itinerary ends at.
    pub fn end(&self) -> NodeId {
        self.legs.last().map_or(self.start, |l| l.to)
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.legs.iter().map(|l| l.arc)
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Stops whose service time this itinerary pays.
    pub fn required(&self) -> &BTreeSet<LocationId> {
        &self.required
    }

    pub fn collecting_legs(&self) -> impl Iterator<Item = &Leg> + '_ {
        self.legs.iter().filter(|l| l.role == LegRole::Collecting)
    }

    pub fn repositioning_legs(&self) -> impl Iterator<Item = &Leg> + '_ {
        self.legs.iter().filter(|l| l.role == LegRole::Repositioning)
    }

    // ── Durations ─────────────────────────────────────────────────────────

    /// Driving minutes without any service time.
    pub fn travel_duration(&self) -> f64 {
        self.legs.iter().map(|l| l.minutes - l.service_min).sum()
    }

    /// Driving minutes plus the service time of each required stop visited,
    /// counted once.
    pub fn total_duration(&self) -> f64 {
        let mut served = BTreeSet::new();
        let mut total = 0.0;
        for leg in &self.legs {
            total += leg.minutes - leg.service_min;
            if leg.service_min > 0.0
                && self.required.contains(&leg.to_location)
                && served.insert(leg.to_location)
            {
                total += leg.service_min;
            }
        }
        total
    }

    // ── Reporting ─────────────────────────────────────────────────────────

    /// Distinct locations in visiting order, start included, ignoring turns
    /// inside an intersection.
    pub fn waypoints(&self, graph: &CityGraph) -> Vec<LocationId> {
        let mut points = vec![graph.node_location(self.start)];
        for leg in &self.legs {
            if points.last() != Some(&leg.to_location) {
                points.push(leg.to_location);
            }
        }
        points
    }

    /// Manoeuvre made at each intermediate waypoint.
    pub fn turns(&self, graph: &CityGraph) -> Vec<(LocationId, Turn)> {
        let points = self.waypoints(graph);
        points
            .windows(3)
            .map(|w| {
                let at = graph.location(w[1]).point;
                let turn = at.turn(graph.location(w[0]).point, graph.location(w[2]).point);
                (w[1], turn)
            })
            .collect()
    }
}
