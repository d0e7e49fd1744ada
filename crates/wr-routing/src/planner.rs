//! `Planner`: the query surface of the routing engine.
//!
//! Every query restarts the simulated clock at the departure hour, so no
//! run sees time consumed by an earlier one.

use std::collections::{BTreeMap, BTreeSet};

use wr_core::{Hour, Incident};
use wr_network::City;

use crate::{
    Collect, DijkstraRouter, Itinerary, LegRole, PlannerConfig, RouteError, RouteResult, Router,
    coverage, mst, pickup,
};

/// Owns a [`City`] and a [`Router`] and answers tour queries over them.
pub struct Planner<R: Router = DijkstraRouter> {
    city:   City,
    router: R,
}

impl Planner<DijkstraRouter> {
    /// Planner with the default Dijkstra router.  Departs at the city's
    /// current departure hour.
    pub fn new(city: City) -> Self {
        Self { city, router: DijkstraRouter }
    }
}

impl<R: Router> Planner<R> {
    pub fn with_router(city: City, router: R) -> Self {
        Self { city, router }
    }

    /// Apply `config`'s hypothesis, departure hour and incident count to
    /// `city`.
    pub fn with_config(mut city: City, router: R, config: &PlannerConfig) -> RouteResult<Self> {
        city.policy_mut().set_hypothesis(config.hypothesis);
        city.constraints_mut().set_departure_hour(config.departure_hour)?;
        if config.incident_count > 0 {
            city.generate_incidents(config.incident_count);
        }
        log::debug!(
            "planner: {} departing {:02}h, {} incidents",
            config.hypothesis,
            config.departure_hour,
            city.constraints().incidents().len()
        );
        Ok(Self { city, router })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn city(&self) -> &City {
        &self.city
    }

    pub fn city_mut(&mut self) -> &mut City {
        &mut self.city
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn departure_hour(&self) -> Hour {
        self.city.constraints().clock().departure()
    }

    /// Simulated hour at the end of the last query.
    pub fn arrival_hour(&self) -> Hour {
        self.city.current_hour()
    }

    // ── Time model ────────────────────────────────────────────────────────

    pub fn set_departure_hour(&mut self, hour: Hour) -> RouteResult<()> {
        self.city.constraints_mut().set_departure_hour(hour)?;
        Ok(())
    }

    pub fn generate_incidents(&mut self, count: usize) -> &[Incident] {
        self.city.generate_incidents(count)
    }

    pub fn clear_incidents(&mut self) {
        self.city.clear_incidents();
    }

    pub fn count_required_arcs(&self) -> usize {
        self.city.count_required_arcs()
    }

    fn restart(&mut self) {
        self.city.constraints_mut().restart_clock();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Shortest route from the warehouse to `destination`, whose service time
    /// is paid.  Service time of stops passed on the way is not.
    pub fn shortest_to(&mut self, destination: &str) -> RouteResult<Itinerary> {
        self.restart();
        let graph = self.city.graph();
        let start = graph.warehouse_node().ok_or(RouteError::NoWarehouse)?;
        let targets = graph.lookup_all_variants(destination);
        let Some(&first) = targets.first() else {
            return Err(RouteError::UnknownDestination(destination.to_owned()));
        };

        let none = BTreeSet::new();
        let route = self.router.route(&self.city, start, targets, Collect::Only(&none))?;

        let mut itinerary = Itinerary::new(start);
        itinerary.push_route(graph, &route, LegRole::Travel);
        itinerary.require(graph.node_location(first));
        self.city.constraints_mut().advance(route.cost);
        Ok(itinerary)
    }

    /// Nearest-first tour over at most ten stops, ending at the last one.
    pub fn bounded_pickup(&mut self, stops: &[&str]) -> RouteResult<Itinerary> {
        self.restart();
        pickup::bounded_pickup(&self.router, &mut self.city, stops)
    }

    /// Tour collecting every required street, from and back to the
    /// warehouse.
    pub fn full_coverage(&mut self) -> RouteResult<Itinerary> {
        self.restart();
        coverage::full_coverage(&self.router, &mut self.city)
    }

    pub fn nearest_neighbor_circuit(&mut self, stops: &[&str]) -> RouteResult<Itinerary> {
        self.restart();
        pickup::nearest_neighbor_circuit(&self.router, &mut self.city, stops)
    }

    pub fn mst_circuit(&mut self, stops: &[&str]) -> RouteResult<Itinerary> {
        self.restart();
        mst::mst_circuit(&self.router, &mut self.city, stops)
    }

    /// One itinerary per vehicle trip; see
    /// [`mst_circuit_capacity_split`](mst::mst_circuit_capacity_split).
    pub fn mst_circuit_capacity_split(
        &mut self,
        loads: &BTreeMap<String, f64>,
        capacity: f64,
    ) -> RouteResult<Vec<Itinerary>> {
        self.restart();
        mst::mst_circuit_capacity_split(&self.router, &mut self.city, loads, capacity)
    }
}
