//! Minimum-spanning-tree circuits and capacity-constrained trips.
//!
//! # Construction
//!
//! 1. One shortest-path tree per point of {warehouse} ∪ stops gives the
//!    complete pairwise cost matrix (service time ignored).
//! 2. Prim's algorithm, rooted at the warehouse, picks a spanning tree of
//!    that complete graph.  Ties go to the lowest point index.
//! 3. A preorder walk visits the tree; after the subtree of every non-root
//!    point it hops straight back to the root:
//!
//! ```text
//!        W            walk: W a b W c W
//!       / \
//!      a   c
//!      |
//!      b
//! ```
//!
//! The circuit concatenates the precomputed shortest paths along the walk.

use std::collections::{BTreeMap, BTreeSet};

use wr_core::LocationId;
use wr_network::City;

use crate::pickup::{resolve_stops, warehouse_node};
use crate::{Collect, Itinerary, LegRole, Route, RouteError, RouteResult, Router};

/// Index of the warehouse among the plan's points.
const ROOT: usize = 0;

/// Pairwise routes, spanning tree and walk over {warehouse} ∪ stops.
struct MstPlan {
    /// Location of each point; `ROOT` is the warehouse.
    locs:   Vec<LocationId>,
    /// `routes[i][j]`: shortest route from point `i` to point `j`.
    routes: Vec<Vec<Option<Route>>>,
    children: Vec<Vec<usize>>,
    weight: f64,
}

impl MstPlan {
    fn build<R: Router + ?Sized>(router: &R, city: &City, stops: &[&str]) -> RouteResult<Self> {
        if stops.is_empty() {
            return Err(RouteError::EmptyRequest);
        }
        let start = warehouse_node(city)?;
        let graph = city.graph();
        let warehouse = graph.node_location(start);

        let mut locs = vec![warehouse];
        let mut nodes = vec![start];
        for stop in resolve_stops(city, stops)? {
            if stop.loc != warehouse {
                locs.push(stop.loc);
                nodes.push(stop.nodes[0]);
            }
        }
        let n = nodes.len();

        let none = BTreeSet::new();
        let routes: Vec<Vec<Option<Route>>> = nodes
            .iter()
            .map(|&from| {
                let tree = router.search_tree(city, from, Collect::Only(&none));
                nodes.iter().map(|&to| tree.route_to(graph, to)).collect()
            })
            .collect();
        let cost = |i: usize, j: usize| routes[i][j].as_ref().map_or(f64::INFINITY, |r| r.cost);

        // ── Prim ──────────────────────────────────────────────────────────
        let mut in_tree = vec![false; n];
        let mut key = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];
        key[ROOT] = 0.0;

        for _ in 0..n {
            let next = (0..n)
                .filter(|&v| !in_tree[v] && key[v].is_finite())
                .min_by(|&a, &b| key[a].total_cmp(&key[b]));
            let Some(u) = next else { break };
            in_tree[u] = true;
            for v in 0..n {
                if !in_tree[v] && cost(u, v) < key[v] {
                    key[v] = cost(u, v);
                    parent[v] = Some(u);
                }
            }
        }

        if let Some(v) = in_tree.iter().position(|&t| !t) {
            return Err(RouteError::Unreachable {
                from: graph.location(warehouse).name.clone(),
                to: graph.location(locs[v]).name.clone(),
            });
        }

        let mut children = vec![Vec::new(); n];
        for v in 0..n {
            if let Some(p) = parent[v] {
                children[p].push(v);
            }
        }
        let weight = key.iter().sum();
        log::debug!("mst over {n} points, weight {weight:.1} min");

        Ok(Self { locs, routes, children, weight })
    }

    /// Preorder walk with a hop back to the root after each non-root
    /// subtree.  Starts and ends at the root, with no self-hops.
    fn walk(&self) -> Vec<usize> {
        let mut order = vec![ROOT];
        let mut stack: Vec<(usize, usize)> = vec![(ROOT, 0)];
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            if next < self.children[node].len() {
                top.1 += 1;
                let child = self.children[node][next];
                order.push(child);
                stack.push((child, 0));
            } else {
                stack.pop();
                if node != ROOT {
                    order.push(ROOT);
                }
            }
        }
        order.dedup();
        order
    }

    fn hop(&self, city: &City, from: usize, to: usize) -> RouteResult<&Route> {
        self.routes[from][to].as_ref().ok_or_else(|| {
            let graph = city.graph();
            RouteError::Unreachable {
                from: graph.location(self.locs[from]).name.clone(),
                to: graph.location(self.locs[to]).name.clone(),
            }
        })
    }

    /// Drive `points` in order, advancing the clock after each hop.
    fn drive(&self, city: &mut City, points: &[usize]) -> RouteResult<Itinerary> {
        let start = warehouse_node(city)?;
        let mut itinerary = Itinerary::new(start);
        for pair in points.windows(2) {
            let route = self.hop(city, pair[0], pair[1])?;
            itinerary.push_route(city.graph(), route, LegRole::Travel);
            city.constraints_mut().advance(route.cost);
        }
        for &p in points {
            if p != ROOT {
                itinerary.require(self.locs[p]);
            }
        }
        Ok(itinerary)
    }
}

/// Circuit over the stops along the MST walk, from and back to the
/// warehouse.
pub fn mst_circuit<R: Router + ?Sized>(
    router: &R,
    city: &mut City,
    stops: &[&str],
) -> RouteResult<Itinerary> {
    let plan = MstPlan::build(router, city, stops)?;
    let walk = plan.walk();
    let itinerary = plan.drive(city, &walk)?;
    log::debug!(
        "mst circuit: {} hops, {:.1} min (tree weight {:.1})",
        walk.len().saturating_sub(1),
        itinerary.total_duration(),
        plan.weight
    );
    Ok(itinerary)
}

/// Split the MST walk into trips whose summed load fits `capacity`.
///
/// The walk is followed hop by hop, root shortcuts included.  A trip closes
/// from the last point reached when the next stop would overflow it, and the
/// next trip drives from the warehouse straight to that stop.  With room for
/// every load the single trip is the [`mst_circuit`].  A stop heavier than
/// `capacity` on its own becomes a single-stop trip, logged as a warning.
pub fn mst_circuit_capacity_split<R: Router + ?Sized>(
    router: &R,
    city: &mut City,
    loads: &BTreeMap<String, f64>,
    capacity: f64,
) -> RouteResult<Vec<Itinerary>> {
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(RouteError::InvalidCapacity(capacity));
    }
    if let Some((stop, &load)) = loads.iter().find(|&(_, l)| !l.is_finite() || *l < 0.0) {
        return Err(RouteError::InvalidLoad { stop: stop.clone(), load });
    }

    let names: Vec<&str> = loads.keys().map(String::as_str).collect();
    let plan = MstPlan::build(router, city, &names)?;

    let load_of = |p: usize| {
        let name = &city.graph().location(plan.locs[p]).name;
        loads.get(name).copied().unwrap_or(0.0)
    };

    let mut trips: Vec<Vec<usize>> = Vec::new();
    let mut current = vec![ROOT];
    let mut stops = 0;
    let mut carried = 0.0;
    for &p in plan.walk().iter().skip(1) {
        let load = if p == ROOT { 0.0 } else { load_of(p) };
        if stops > 0 && carried + load > capacity {
            current.push(ROOT);
            trips.push(std::mem::replace(&mut current, vec![ROOT]));
            stops = 0;
            carried = 0.0;
        }
        if load > capacity {
            log::warn!(
                "{} alone carries {load:.1} over capacity {capacity:.1}",
                city.graph().location(plan.locs[p]).name
            );
        }
        current.push(p);
        if p != ROOT {
            stops += 1;
            carried += load;
        }
    }
    if stops > 0 {
        current.push(ROOT);
        trips.push(current);
    }

    let mut itineraries = Vec::with_capacity(trips.len());
    for mut points in trips {
        points.dedup();
        itineraries.push(plan.drive(city, &points)?);
    }
    log::debug!("capacity split: {} stops in {} trips", plan.locs.len() - 1, itineraries.len());
    Ok(itineraries)
}
