//! `City`: the street graph together with the rules that price its arcs.

use wr_core::{
    ArcId, CityRng, Hour, Incident, LocationId, LocationKind, Point, StreetId, StreetStatus,
    TimeConstraints,
};

use crate::{
    CityGraph, NetworkError, NetworkResult, OrientationHypothesis, OrientationPolicy,
    RequiredArcs, StreetOrientation,
};

/// Street graph, orientation policy and time-of-day model.
///
/// `City` is the arc-cost oracle of the router: [`arc_cost`](Self::arc_cost)
/// folds orientation, closures, traffic and incidents into one number.
pub struct City {
    graph:       CityGraph,
    policy:      OrientationPolicy,
    constraints: TimeConstraints,
}

impl City {
    /// Empty city.  The time model draws its incidents from a child stream
    /// of `rng`; the graph keeps `rng` for coordinates and durations.
    pub fn new(hypothesis: OrientationHypothesis, mut rng: CityRng) -> Self {
        let constraints = TimeConstraints::new(rng.child(1));
        Self {
            graph: CityGraph::new(rng),
            policy: OrientationPolicy::new(hypothesis),
            constraints,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }

    #[inline]
    pub fn policy(&self) -> &OrientationPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut OrientationPolicy {
        &mut self.policy
    }

    #[inline]
    pub fn constraints(&self) -> &TimeConstraints {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut TimeConstraints {
        &mut self.constraints
    }

    #[inline]
    pub fn current_hour(&self) -> Hour {
        self.constraints.current_hour()
    }

    // ── Ingestion ─────────────────────────────────────────────────────────

    pub fn add_location(
        &mut self,
        name: &str,
        kind: LocationKind,
        point: Point,
    ) -> NetworkResult<LocationId> {
        self.graph.add_location(name, kind, point)
    }

    pub fn set_coordinates(&mut self, name: &str, x: f64, y: f64) -> NetworkResult<LocationId> {
        self.graph.set_coordinates(name, x, y)
    }

    /// Add a street segment between `from` and `to`, wired in both
    /// directions.  Returns `(from → to, to → from)`.
    pub fn add_segment(
        &mut self,
        street: &str,
        from: &str,
        to: &str,
        duration: f64,
    ) -> NetworkResult<(ArcId, ArcId)> {
        let forward = self.graph.add_segment(street, from, to, duration)?;
        let backward = self.graph.add_segment(street, to, from, duration)?;
        Ok((forward, backward))
    }

    /// [`add_segment`](Self::add_segment) with one random duration shared by
    /// both directions.
    pub fn add_segment_untimed(
        &mut self,
        street: &str,
        from: &str,
        to: &str,
    ) -> NetworkResult<(ArcId, ArcId)> {
        let duration = self.graph.random_duration();
        self.add_segment(street, from, to, duration)
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn intern_street(&mut self, street: &str) -> StreetId {
        self.graph.intern_street(street)
    }

    pub fn configure_street(&mut self, street: &str, orientation: StreetOrientation) -> StreetId {
        let sid = self.graph.intern_street(street);
        self.policy.configure(sid, orientation);
        sid
    }

    /// Make `street` one-way along `route` (location names, in driving
    /// order).
    pub fn configure_one_way(&mut self, street: &str, route: &[&str]) -> NetworkResult<StreetId> {
        if route.len() < 2 {
            return Err(NetworkError::InvalidRoute(street.to_owned()));
        }
        let route = route.iter().map(|s| (*s).to_owned()).collect();
        Ok(self.configure_street(street, StreetOrientation::OneWay { route }))
    }

    /// Close `street` over `[from, until)`.
    pub fn add_closure(&mut self, street: &str, from: Hour, until: Hour) -> NetworkResult<()> {
        let sid = self.graph.intern_street(street);
        self.constraints.add_closure(sid, from, until)?;
        Ok(())
    }

    /// Configure unconfigured streets from their names.
    pub fn infer_orientations(&mut self) -> usize {
        self.policy.infer_from_names(&self.graph)
    }

    // ── Incidents ─────────────────────────────────────────────────────────

    /// Draw `count` random incidents on streets carrying segments.
    pub fn generate_incidents(&mut self, count: usize) -> &[Incident] {
        let streets = self.graph.streets_in_use();
        self.constraints.generate_incidents(&streets, count)
    }

    pub fn clear_incidents(&mut self) {
        self.constraints.clear_incidents();
    }

    /// Traffic condition of every street in use at the current hour.
    pub fn street_statuses(&self) -> Vec<(StreetId, StreetStatus)> {
        self.graph
            .streets_in_use()
            .into_iter()
            .map(|s| (s, self.constraints.status(s)))
            .collect()
    }

    // ── Arc costs ─────────────────────────────────────────────────────────

    /// Whether the policy lets `arc` be driven.  Turns always may.
    pub fn is_arc_allowed(&self, arc: ArcId) -> bool {
        let Some(street) = self.graph.arc_street[arc.index()] else { return true };
        let (from, to) = self.graph.arc_locations(arc);
        self.policy.is_direction_allowed(
            street,
            &self.graph.location(from).name,
            &self.graph.location(to).name,
        )
    }

    /// Adjusted minutes of `arc` at the current hour, service time included.
    /// `None` while the arc is forbidden or closed.
    pub fn arc_cost(&self, arc: ArcId) -> Option<f64> {
        if !self.is_arc_allowed(arc) {
            return None;
        }
        let street = self.graph.arc_street[arc.index()];
        let cost = self
            .constraints
            .adjusted_duration(street, self.graph.arc_base_min[arc.index()]);
        cost.is_finite().then_some(cost)
    }

    pub fn required_arcs(&self) -> RequiredArcs {
        self.policy.required_arcs(&self.graph)
    }

    pub fn count_required_arcs(&self) -> usize {
        self.policy.count_required_arcs(&self.graph)
    }
}
