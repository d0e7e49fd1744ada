//! Unit tests for wr-routing.
//!
//! All tests use hand-built cities departing at 06h, where the traffic
//! multiplier is 1.0, unless they say otherwise.

#[cfg(test)]
mod helpers {
    use wr_core::CityRng;
    use wr_network::{City, OrientationHypothesis};

    use crate::Planner;

    pub const EPS: f64 = 1e-9;

    pub fn city(hypothesis: OrientationHypothesis) -> City {
        let mut city = City::new(hypothesis, CityRng::new(11));
        city.constraints_mut().set_departure_hour(6).unwrap();
        city
    }

    /// Entrepot Base → Carrefour A → Carrefour B → Maison C on one street,
    /// 3.0 / 2.0 / 1.5 minutes.
    pub fn line(hypothesis: OrientationHypothesis) -> City {
        let mut c = city(hypothesis);
        c.add_segment("Rue Unique", "Entrepot Base", "Carrefour A", 3.0).unwrap();
        c.add_segment("Rue Unique", "Carrefour A", "Carrefour B", 2.0).unwrap();
        c.add_segment("Rue Unique", "Carrefour B", "Maison C", 1.5).unwrap();
        c
    }

    /// Entrepot Base, Maison A, Maison B, Maison C in a row, one minute apart.
    pub fn houses() -> City {
        let mut c = city(OrientationHypothesis::AllTwoWay);
        c.add_segment("Rue Droite", "Entrepot Base", "Maison A", 1.0).unwrap();
        c.add_segment("Rue Droite", "Maison A", "Maison B", 1.0).unwrap();
        c.add_segment("Rue Droite", "Maison B", "Maison C", 1.0).unwrap();
        c
    }

    /// Two parallel streets from the warehouse to one house.
    pub fn parallel(hypothesis: OrientationHypothesis) -> City {
        let mut c = city(hypothesis);
        c.add_segment("Rue Courte", "Entrepot Base", "Maison B", 1.0).unwrap();
        c.add_segment("Rue Longue", "Entrepot Base", "Maison B", 5.0).unwrap();
        c
    }

    /// Departs at 08h.  Maison A is 70 minutes out on Route Longue; Maison B
    /// sits one minute away on Rue Fermee, closed 08h-09h.
    pub fn late_opening() -> City {
        let mut c = city(OrientationHypothesis::AllTwoWay);
        c.add_segment("Route Longue", "Entrepot Base", "Maison A", 70.0).unwrap();
        c.add_segment("Rue Fermee", "Entrepot Base", "Maison B", 1.0).unwrap();
        c.add_closure("Rue Fermee", 8, 9).unwrap();
        c.constraints_mut().set_departure_hour(8).unwrap();
        c
    }

    /// Warehouse one minute from each of two houses, with a 1.5 minute chord
    /// between the houses.
    pub fn star_with_chord() -> City {
        let mut c = city(OrientationHypothesis::AllTwoWay);
        c.add_segment("Rue Ouest", "Entrepot Base", "Maison A", 1.0).unwrap();
        c.add_segment("Rue Est", "Entrepot Base", "Maison B", 1.0).unwrap();
        c.add_segment("Rue Corde", "Maison A", "Maison B", 1.5).unwrap();
        c
    }

    pub fn waypoint_names(city: &City, itinerary: &crate::Itinerary) -> Vec<String> {
        let g = city.graph();
        itinerary.waypoints(g).iter().map(|&l| g.location(l).name.clone()).collect()
    }

    pub fn planner(city: City) -> Planner {
        Planner::new(city)
    }

    pub fn street_of(city: &City, arc: wr_core::ArcId) -> Option<&str> {
        let g = city.graph();
        g.arc_street[arc.index()].map(|s| g.street_name(s))
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use std::collections::BTreeSet;

    use wr_network::OrientationHypothesis;

    use crate::{Collect, DijkstraRouter, RouteError, Router};

    use super::helpers::{self, EPS};

    #[test]
    fn service_time_only_when_collected() {
        let city = helpers::line(OrientationHypothesis::AllTwoWay);
        let g = city.graph();
        let start = g.warehouse_node().unwrap();
        let targets = g.lookup_all_variants("Maison C");
        let c = g.location_id("Maison C").unwrap();

        let none = BTreeSet::new();
        let plain = DijkstraRouter.route(&city, start, targets, Collect::Only(&none)).unwrap();
        assert!((plain.cost - 6.5).abs() < EPS, "got {}", plain.cost);
        assert_eq!(plain.arcs.len(), 3);

        let with_c = BTreeSet::from([c]);
        let collected = DijkstraRouter.route(&city, start, targets, Collect::Only(&with_c)).unwrap();
        assert!((collected.cost - 8.5).abs() < EPS);
        let all = DijkstraRouter.route(&city, start, targets, Collect::All).unwrap();
        assert!((all.cost - 8.5).abs() < EPS);
    }

    #[test]
    fn start_in_targets_is_trivial() {
        let city = helpers::line(OrientationHypothesis::AllTwoWay);
        let start = city.graph().warehouse_node().unwrap();
        let route = DijkstraRouter.route(&city, start, &[start], Collect::All).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.cost, 0.0);
    }

    #[test]
    fn nearest_variant_wins() {
        let mut city = helpers::city(OrientationHypothesis::AllTwoWay);
        city.add_segment("Rue A", "Entrepot Base", "Carrefour X", 1.0).unwrap();
        city.add_segment("Rue B", "Carrefour X", "Maison Y", 1.0).unwrap();
        let g = city.graph();
        let start = g.warehouse_node().unwrap();
        let route = DijkstraRouter
            .route(&city, start, g.lookup_all_variants("Carrefour X"), Collect::All)
            .unwrap();
        assert_eq!(route.arcs.len(), 1);
        assert!((route.cost - 1.0).abs() < EPS);
    }

    #[test]
    fn turn_costs_are_paid() {
        let mut city = helpers::city(OrientationHypothesis::AllTwoWay);
        city.add_segment("Rue A", "Entrepot Base", "Carrefour X", 1.0).unwrap();
        city.add_segment("Rue B", "Carrefour X", "Maison Y", 1.0).unwrap();
        let g = city.graph();
        let start = g.warehouse_node().unwrap();
        let route = DijkstraRouter
            .route(&city, start, g.lookup_all_variants("Maison Y"), Collect::All)
            .unwrap();
        // 1.0 + turn (1.0 + 0.5 × 2) + 1.0 + service 2.0
        assert_eq!(route.arcs.len(), 3);
        assert!(g.is_turn(route.arcs[1]));
        assert!((route.cost - 6.0).abs() < EPS);
    }

    #[test]
    fn unreachable_names_both_ends() {
        let mut city = helpers::line(OrientationHypothesis::AllTwoWay);
        city.add_segment("Rue Isolee", "Maison Y", "Maison Z", 1.0).unwrap();
        let g = city.graph();
        let start = g.warehouse_node().unwrap();
        let err = DijkstraRouter
            .route(&city, start, g.lookup_all_variants("Maison Z"), Collect::All)
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::Unreachable { from: "Entrepot Base".into(), to: "Maison Z".into() }
        );
    }

    #[test]
    fn search_tree_covers_reachable_nodes() {
        let city = helpers::line(OrientationHypothesis::AllTwoWay);
        let g = city.graph();
        let start = g.warehouse_node().unwrap();
        let tree = DijkstraRouter.search_tree(&city, start, Collect::All);
        for node in g.lookup_all_variants("Carrefour B") {
            assert!((tree.distance(*node).unwrap() - 5.0).abs() < EPS);
        }
        let back = tree.route_to(g, start).unwrap();
        assert!(back.is_trivial());
    }
}

// ── Constraints seen by queries ───────────────────────────────────────────────

#[cfg(test)]
mod constraints {
    use wr_network::OrientationHypothesis;

    use super::helpers::{self, EPS};

    #[test]
    fn closure_forces_detour() {
        let mut city = helpers::parallel(OrientationHypothesis::AllTwoWay);
        city.add_closure("Rue Courte", 8, 10).unwrap();

        let mut planner = helpers::planner(city);
        let early = planner.shortest_to("Maison B").unwrap();
        assert_eq!(helpers::street_of(planner.city(), early.legs()[0].arc), Some("Rue Courte"));

        planner.set_departure_hour(8).unwrap();
        let late = planner.shortest_to("Maison B").unwrap();
        assert_eq!(helpers::street_of(planner.city(), late.legs()[0].arc), Some("Rue Longue"));
        // 5.0 × 1.8 travel, 2.0 × 1.8 service baked in, 2.0 paid once.
        assert!((late.total_duration() - 12.6).abs() < EPS);
    }

    #[test]
    fn one_way_forces_detour() {
        let mut city = helpers::parallel(OrientationHypothesis::Directed);
        city.configure_one_way("Rue Courte", &["Maison B", "Entrepot Base"]).unwrap();
        let mut planner = helpers::planner(city);
        let it = planner.shortest_to("Maison B").unwrap();
        assert_eq!(helpers::street_of(planner.city(), it.legs()[0].arc), Some("Rue Longue"));
    }

    #[test]
    fn traffic_scales_every_leg() {
        let mut planner = helpers::planner(helpers::line(OrientationHypothesis::AllTwoWay));
        planner.set_departure_hour(8).unwrap();
        let it = planner.shortest_to("Maison C").unwrap();
        assert!((it.travel_duration() - 13.3).abs() < EPS);
        assert!((it.total_duration() - 15.3).abs() < EPS);
    }
}

// ── Itinerary accounting ──────────────────────────────────────────────────────

#[cfg(test)]
mod itinerary {
    use wr_core::{CityRng, Turn};
    use wr_network::{sample_city, OrientationHypothesis};

    use crate::{LegRole, Planner, RouteError};

    use super::helpers::{self, EPS};

    #[test]
    fn line_example() {
        let mut planner = helpers::planner(helpers::line(OrientationHypothesis::AllTwoWay));
        let it = planner.shortest_to("Maison C").unwrap();
        assert_eq!(it.len(), 3);
        assert!((it.travel_duration() - 6.5).abs() < EPS);
        assert!((it.total_duration() - 8.5).abs() < EPS);
        assert!(it.legs().iter().all(|l| l.role == LegRole::Travel));
    }

    #[test]
    fn passing_a_house_is_free() {
        let mut city = helpers::city(OrientationHypothesis::AllTwoWay);
        city.add_segment("Rue A", "Entrepot Base", "Maison M", 1.0).unwrap();
        city.add_segment("Rue A", "Maison M", "Carrefour X", 1.0).unwrap();
        let mut planner = helpers::planner(city);
        let it = planner.shortest_to("Carrefour X").unwrap();
        assert!((it.total_duration() - 2.0).abs() < EPS);
    }

    #[test]
    fn unknown_destination() {
        let mut planner = helpers::planner(helpers::line(OrientationHypothesis::AllTwoWay));
        assert_eq!(
            planner.shortest_to("Maison Z").unwrap_err(),
            RouteError::UnknownDestination("Maison Z".into())
        );
    }

    #[test]
    fn straight_along_the_avenue() {
        let city = sample_city(OrientationHypothesis::MixedByLanes, CityRng::new(3)).unwrap();
        let mut planner = Planner::new(city);
        let it = planner.shortest_to("Carrefour Nation").unwrap();
        let g = planner.city().graph();
        let turns = it.turns(g);
        assert_eq!(turns.len(), 3);
        assert!(turns.iter().all(|&(_, t)| t == Turn::Straight));
        assert_eq!(it.waypoints(g).len(), 5);
    }
}

// ── Multi-stop builders ───────────────────────────────────────────────────────

#[cfg(test)]
mod pickup {
    use crate::{RouteError, MAX_PICKUP_STOPS};

    use super::helpers::{self, EPS};

    #[test]
    fn request_validation() {
        let mut planner = helpers::planner(helpers::houses());
        assert_eq!(planner.bounded_pickup(&[]).unwrap_err(), RouteError::EmptyRequest);
        let many = ["Maison A"; MAX_PICKUP_STOPS + 1];
        assert_eq!(
            planner.bounded_pickup(&many).unwrap_err(),
            RouteError::TooManyStops { got: 11, max: 10 }
        );
        assert!(matches!(
            planner.bounded_pickup(&["Maison Z"]),
            Err(RouteError::UnknownDestination(_))
        ));
        assert_eq!(planner.nearest_neighbor_circuit(&[]).unwrap_err(), RouteError::EmptyRequest);
    }

    #[test]
    fn bounded_pickup_nearest_first() {
        let mut planner = helpers::planner(helpers::houses());
        let it = planner.bounded_pickup(&["Maison C", "Maison A"]).unwrap();
        let g = planner.city().graph();
        let order: Vec<_> = it.waypoints(g).iter().map(|&l| g.location(l).name.clone()).collect();
        assert_eq!(order, ["Entrepot Base", "Maison A", "Maison B", "Maison C"]);
        // Three minutes of driving, A and C collected, B passed.
        assert!((it.total_duration() - 7.0).abs() < EPS);
        assert_eq!(it.required().len(), 2);
        assert_ne!(it.end(), it.start());
    }

    #[test]
    fn cut_off_stop_waits_for_its_street() {
        let mut planner = helpers::planner(helpers::late_opening());
        // 129.6 min to Maison A moves the clock to 10h, after Rue Fermee reopens.
        let it = planner.bounded_pickup(&["Maison B", "Maison A"]).unwrap();
        assert_eq!(
            helpers::waypoint_names(planner.city(), &it),
            ["Entrepot Base", "Maison A", "Entrepot Base", "Maison B"]
        );
        assert_eq!(it.required().len(), 2);
        assert_eq!(planner.arrival_hour(), 11);

        let circuit = planner.nearest_neighbor_circuit(&["Maison B", "Maison A"]).unwrap();
        assert_eq!(
            helpers::waypoint_names(planner.city(), &circuit),
            ["Entrepot Base", "Maison A", "Entrepot Base", "Maison B", "Entrepot Base"]
        );
    }

    #[test]
    fn fails_when_every_stop_is_cut_off() {
        let mut city = helpers::late_opening();
        city.add_closure("Rue Fermee", 6, 23).unwrap();
        let mut planner = helpers::planner(city);
        assert_eq!(
            planner.bounded_pickup(&["Maison B"]).unwrap_err(),
            RouteError::Unreachable { from: "Entrepot Base".into(), to: "Maison B".into() }
        );
        assert!(matches!(
            planner.nearest_neighbor_circuit(&["Maison A", "Maison B"]),
            Err(RouteError::Unreachable { .. })
        ));
    }

    #[test]
    fn nearest_neighbor_returns_home() {
        let mut planner = helpers::planner(helpers::houses());
        let it = planner.nearest_neighbor_circuit(&["Maison B", "Maison A"]).unwrap();
        assert_eq!(it.end(), it.start());
        // 2 out + 2 back, A and B served once each.
        assert!((it.travel_duration() - 4.0).abs() < EPS);
        assert!((it.total_duration() - 8.0).abs() < EPS);
    }
}

#[cfg(test)]
mod mst {
    use std::collections::BTreeMap;

    use wr_network::OrientationHypothesis;

    use crate::RouteError;

    use super::helpers::{self, EPS};

    fn loads(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|&(n, l)| (n.to_owned(), l)).collect()
    }

    #[test]
    fn line_circuit_within_twice_tree() {
        let mut planner = helpers::planner(helpers::houses());
        let it = planner.mst_circuit(&["Maison C", "Maison A", "Maison B"]).unwrap();
        assert_eq!(it.end(), it.start());
        // Tree weight 3; walk W A B C W drives 1 + 1 + 1 + 3.
        assert!(it.travel_duration() <= 2.0 * 3.0 + EPS);
        assert!((it.total_duration() - 12.0).abs() < EPS);
    }

    #[test]
    fn star_circuit_returns_between_branches() {
        let mut city = helpers::city(OrientationHypothesis::AllTwoWay);
        city.add_segment("Rue Ouest", "Entrepot Base", "Maison A", 1.0).unwrap();
        city.add_segment("Rue Est", "Entrepot Base", "Maison B", 1.0).unwrap();
        let mut planner = helpers::planner(city);
        let it = planner.mst_circuit(&["Maison A", "Maison B"]).unwrap();
        assert_eq!(it.len(), 4);
        assert!((it.travel_duration() - 4.0).abs() < EPS);
    }

    #[test]
    fn capacity_split_closes_full_trips() {
        let mut planner = helpers::planner(helpers::houses());
        let trips = planner
            .mst_circuit_capacity_split(
                &loads(&[("Maison A", 3.0), ("Maison B", 3.0), ("Maison C", 3.0)]),
                6.0,
            )
            .unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].required().len(), 2);
        assert_eq!(trips[1].required().len(), 1);
        for trip in &trips {
            assert_eq!(trip.end(), trip.start());
        }
    }

    #[test]
    fn overloaded_stop_rides_alone() {
        let mut planner = helpers::planner(helpers::houses());
        let trips = planner
            .mst_circuit_capacity_split(
                &loads(&[("Maison A", 10.0), ("Maison B", 3.0), ("Maison C", 3.0)]),
                6.0,
            )
            .unwrap();
        assert_eq!(trips.len(), 2);
        let a = planner.city().graph().location_id("Maison A").unwrap();
        assert!(trips[0].required().contains(&a));
        assert_eq!(trips[0].required().len(), 1);
    }

    #[test]
    fn roomy_split_follows_the_circuit() {
        let mut planner = helpers::planner(helpers::star_with_chord());
        let circuit = planner.mst_circuit(&["Maison A", "Maison B"]).unwrap();
        let trips = planner
            .mst_circuit_capacity_split(&loads(&[("Maison A", 1.0), ("Maison B", 1.0)]), 100.0)
            .unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0], circuit);
        assert_eq!(
            helpers::waypoint_names(planner.city(), &trips[0]),
            ["Entrepot Base", "Maison A", "Entrepot Base", "Maison B", "Entrepot Base"]
        );
    }

    #[test]
    fn split_validation() {
        let mut planner = helpers::planner(helpers::houses());
        assert_eq!(
            planner.mst_circuit_capacity_split(&loads(&[("Maison A", 1.0)]), 0.0).unwrap_err(),
            RouteError::InvalidCapacity(0.0)
        );
        assert!(matches!(
            planner.mst_circuit_capacity_split(&loads(&[("Maison A", -1.0)]), 5.0),
            Err(RouteError::InvalidLoad { .. })
        ));
        assert_eq!(
            planner.mst_circuit_capacity_split(&BTreeMap::new(), 5.0).unwrap_err(),
            RouteError::EmptyRequest
        );
    }
}

// ── Full coverage ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod coverage {
    use std::collections::BTreeSet;

    use wr_core::CityRng;
    use wr_network::{sample_city, City, OrientationHypothesis};

    use crate::{LegRole, Planner, RouteError};

    use super::helpers;

    fn collected_units(city: &City, it: &crate::Itinerary) -> BTreeSet<usize> {
        let required = city.required_arcs();
        it.collecting_legs().filter_map(|l| required.unit_of(l.arc)).collect()
    }

    #[test]
    fn both_sides_collects_each_segment_once() {
        let mut planner = helpers::planner(helpers::line(OrientationHypothesis::AllTwoWay));
        let it = planner.full_coverage().unwrap();
        assert_eq!(it.collecting_legs().count(), 3);
        assert_eq!(collected_units(planner.city(), &it).len(), planner.count_required_arcs());
        assert_eq!(it.end(), it.start());
        assert!(it.repositioning_legs().count() > 0);
    }

    #[test]
    fn directed_collects_both_directions() {
        let mut planner = helpers::planner(helpers::line(OrientationHypothesis::Directed));
        let it = planner.full_coverage().unwrap();
        assert_eq!(planner.count_required_arcs(), 6);
        assert_eq!(it.collecting_legs().count(), 6);
        assert_eq!(collected_units(planner.city(), &it).len(), 6);
        assert_eq!(it.end(), it.start());
    }

    #[test]
    fn runs_do_not_share_state() {
        let mut planner = helpers::planner(helpers::line(OrientationHypothesis::Directed));
        let first = planner.full_coverage().unwrap();
        let second = planner.full_coverage().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn needs_a_warehouse() {
        let mut city = helpers::city(OrientationHypothesis::AllTwoWay);
        city.add_segment("Rue A", "Maison 1", "Maison 2", 1.0).unwrap();
        let mut planner = helpers::planner(city);
        assert_eq!(planner.full_coverage().unwrap_err(), RouteError::NoWarehouse);
    }

    #[test]
    fn sample_city_skips_closed_streets() {
        let city = sample_city(OrientationHypothesis::MixedByLanes, CityRng::new(5)).unwrap();
        let mut planner = Planner::new(city);
        let it = planner.full_coverage().unwrap();
        // Boulevard Nord and Rue Montmartre are closed at 08h.
        assert_eq!(planner.count_required_arcs(), 19);
        assert_eq!(it.collecting_legs().count(), 13);
        assert_eq!(it.end(), it.start());

        let g = planner.city().graph();
        for leg in it.legs() {
            if let Some(street) = g.arc_street[leg.arc.index()] {
                let name = g.street_name(street);
                assert!(name != "Boulevard Nord" && name != "Rue Montmartre", "drove {name}");
            }
            assert!(leg.role != LegRole::Travel);
        }
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use wr_core::{CityRng, CoreError};
    use wr_network::{sample_city, OrientationHypothesis};

    use crate::{DijkstraRouter, Planner, PlannerConfig, RouteError};

    use super::helpers;

    #[test]
    fn clock_restarts_every_query() {
        let mut city = helpers::city(OrientationHypothesis::AllTwoWay);
        city.add_segment("Route Longue", "Entrepot Base", "Carrefour Loin", 90.0).unwrap();
        let mut planner = helpers::planner(city);

        planner.shortest_to("Carrefour Loin").unwrap();
        assert_eq!(planner.arrival_hour(), 7);
        planner.shortest_to("Carrefour Loin").unwrap();
        assert_eq!(planner.arrival_hour(), 7);
        assert_eq!(planner.departure_hour(), 6);
    }

    #[test]
    fn departure_hour_validated() {
        let mut planner = helpers::planner(helpers::houses());
        assert_eq!(
            planner.set_departure_hour(5).unwrap_err(),
            RouteError::InvalidHour(CoreError::InvalidHour(5))
        );
    }

    #[test]
    fn config_is_applied() {
        let config = PlannerConfig {
            departure_hour: 10,
            hypothesis: OrientationHypothesis::AllTwoWay,
            incident_count: 3,
            seed: Some(42),
        };
        let city = sample_city(OrientationHypothesis::MixedByLanes, config.make_rng()).unwrap();
        let planner = Planner::with_config(city, DijkstraRouter, &config).unwrap();
        assert_eq!(planner.departure_hour(), 10);
        assert_eq!(planner.city().policy().hypothesis(), OrientationHypothesis::AllTwoWay);
        assert_eq!(planner.city().constraints().incidents().len(), 3);
        assert_eq!(planner.count_required_arcs(), 13);
    }

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.departure_hour, 8);
        assert_eq!(config.hypothesis, OrientationHypothesis::MixedByLanes);
        assert_eq!(config.incident_count, 0);
        assert!(config.seed.is_none());
    }

    #[test]
    fn closed_destination_opens_later() {
        let city = sample_city(OrientationHypothesis::MixedByLanes, CityRng::new(9)).unwrap();
        let mut planner = Planner::new(city);
        assert!(matches!(
            planner.shortest_to("Immeuble Grand Palais"),
            Err(RouteError::Unreachable { .. })
        ));
        planner.set_departure_hour(10).unwrap();
        assert!(planner.shortest_to("Immeuble Grand Palais").is_ok());
    }

    #[test]
    fn incidents_can_be_cleared() {
        let mut planner = helpers::planner(helpers::houses());
        assert_eq!(planner.generate_incidents(4).len(), 4);
        planner.clear_incidents();
        assert!(planner.city().constraints().incidents().is_empty());
    }
}
