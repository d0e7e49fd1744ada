//! city_tour: every planner query over the sample city or a street list.
//!
//! Usage: `city_tour [config.json] [streets.txt]`
//!
//! The optional `.json` file holds a `PlannerConfig`; missing fields take
//! their defaults.  The optional street list replaces the sample city (see
//! [`network`] for its format).  Logs go to stderr (`RUST_LOG=debug` for
//! builder detail), the JSON summary to stdout.

mod network;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Value, json};

use wr_core::LocationId;
use wr_network::{City, CityGraph, sample_city};
use wr_routing::{DijkstraRouter, Itinerary, Planner, PlannerConfig, RouteResult};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_SEED: u64 = 42;

const DESTINATION: &str = "Maison Panthéon";

const PICKUP: [&str; 3] = ["Carrefour Nation", "Maison Belle Vue", "Carrefour Opéra"];

const LOADS: [(&str, f64); 5] = [
    ("Maison Belle Vue",      4.0),
    ("Maison Panthéon",       3.0),
    ("Carrefour Luxembourg",  2.5),
    ("Carrefour Nation",      3.5),
    ("Carrefour Opéra",       2.0),
];

const CAPACITY: f64 = 8.0;

// ── Config ────────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PlannerConfig::default(),
    };
    config.seed.get_or_insert(DEFAULT_SEED);
    Ok(config)
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn describe(graph: &CityGraph, itinerary: &Itinerary) -> Value {
    let name = |loc: LocationId| graph.location(loc).name.clone();
    json!({
        "legs":            itinerary.len(),
        "collecting_legs": itinerary.collecting_legs().count(),
        "travel_min":      round(itinerary.travel_duration()),
        "total_min":       round(itinerary.total_duration()),
        "waypoints":       itinerary.waypoints(graph).into_iter().map(name).collect::<Vec<_>>(),
        "turns": itinerary
            .turns(graph)
            .into_iter()
            .map(|(loc, turn)| json!({ "at": name(loc), "turn": turn }))
            .collect::<Vec<_>>(),
    })
}

/// Query failures are part of the report, not fatal.
fn report(label: &str, planner: &Planner, result: RouteResult<Itinerary>) -> Value {
    match result {
        Ok(itinerary) => {
            log::info!(
                "{label}: {} legs, {:.1} min, back at {:02}h",
                itinerary.len(),
                itinerary.total_duration(),
                planner.arrival_hour()
            );
            describe(planner.city().graph(), &itinerary)
        }
        Err(e) => {
            log::warn!("{label}: {e}");
            json!({ "error": e.to_string() })
        }
    }
}

fn round(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let mut config_path = None;
    let mut streets_path = None;
    for arg in std::env::args_os().skip(1).map(PathBuf::from) {
        if arg.extension().is_some_and(|e| e == "json") {
            config_path = Some(arg);
        } else {
            streets_path = Some(arg);
        }
    }

    let config = load_config(config_path.as_deref())?;
    log::info!(
        "departure {:02}h, hypothesis {}, {} incidents, seed {:?}",
        config.departure_hour,
        config.hypothesis,
        config.incident_count,
        config.seed
    );

    let city = match &streets_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut city = City::new(config.hypothesis, config.make_rng());
            network::load_streets(&mut city, &text)
                .with_context(|| format!("loading {}", path.display()))?;
            city
        }
        None => sample_city(config.hypothesis, config.make_rng())?,
    };
    let mut planner = Planner::with_config(city, DijkstraRouter, &config)?;

    let city = planner.city();
    let graph = city.graph();
    let stats = city.policy().stats();
    let statuses: BTreeMap<String, Value> = city
        .street_statuses()
        .into_iter()
        .map(|(street, status)| (graph.street_name(street).to_owned(), json!(status)))
        .collect();
    let network = json!({
        "locations":     graph.location_count(),
        "nodes":         graph.node_count(),
        "arcs":          graph.arc_count(),
        "streets":       graph.street_count(),
        "required":      planner.count_required_arcs(),
        "one_way":       stats.one_way,
        "single_lane":   stats.single_lane,
        "multi_lane":    stats.multi_lane,
        "street_status": statuses,
    });

    let result = planner.shortest_to(DESTINATION);
    let shortest = report("shortest path", &planner, result);

    let result = planner.bounded_pickup(&PICKUP);
    let pickup = report("bounded pickup", &planner, result);

    let result = planner.full_coverage();
    let coverage = report("full coverage", &planner, result);

    let stops: Vec<&str> = LOADS.iter().map(|&(name, _)| name).collect();
    let result = planner.nearest_neighbor_circuit(&stops);
    let nearest = report("nearest neighbor", &planner, result);

    let result = planner.mst_circuit(&stops);
    let mst = report("mst circuit", &planner, result);

    let loads: BTreeMap<String, f64> =
        LOADS.iter().map(|&(name, load)| (name.to_owned(), load)).collect();
    let trips = match planner.mst_circuit_capacity_split(&loads, CAPACITY) {
        Ok(trips) => {
            log::info!("capacity split: {} trips of at most {CAPACITY}", trips.len());
            let graph = planner.city().graph();
            Value::Array(trips.iter().map(|t| describe(graph, t)).collect())
        }
        Err(e) => {
            log::warn!("capacity split: {e}");
            json!({ "error": e.to_string() })
        }
    };

    let summary = json!({
        "config":         config,
        "network":        network,
        "shortest":       { "to": DESTINATION, "route": shortest },
        "bounded_pickup": pickup,
        "full_coverage":  coverage,
        "nearest":        nearest,
        "mst":            mst,
        "capacity_split": { "capacity": CAPACITY, "trips": trips },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
