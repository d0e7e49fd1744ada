//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Tour builders call routing through the [`Router`] trait, so a different
//! search (A*, bidirectional) can be dropped in without touching them.
//!
//! # Cost units
//!
//! All costs are minutes (`f64`) as priced by [`City::arc_cost`] at the
//! current simulated hour.  The search charges a collection point's service
//! time only when [`Collect`] says so; otherwise it is subtracted back out of
//! the arc.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use ordered_float::OrderedFloat;

use wr_core::{ArcId, LocationId, NodeId};
use wr_network::{City, CityGraph};

use crate::{RouteError, RouteResult};

// ── Collect ───────────────────────────────────────────────────────────────────

/// Which collection points a search pays service time for.
#[derive(Copy, Clone, Debug)]
pub enum Collect<'a> {
    /// Every house and building passed.
    All,
    /// Only the listed locations.
    Only(&'a BTreeSet<LocationId>),
}

impl Collect<'_> {
    #[inline]
    pub fn charges(&self, loc: LocationId) -> bool {
        match self {
            Collect::All => true,
            Collect::Only(set) => set.contains(&loc),
        }
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: arcs in order and their prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Arcs to traverse in order, from source to target.
    pub arcs: Vec<ArcId>,
    /// Adjusted minutes of each arc, service time included.
    pub minutes: Vec<f64>,
    /// Search cost: sum of `minutes` less uncharged service time.
    pub cost: f64,
    /// Node the route ends at.
    pub target: NodeId,
}

impl Route {
    fn trivial(at: NodeId) -> Self {
        Self { arcs: Vec::new(), minutes: Vec::new(), cost: 0.0, target: at }
    }

    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.arcs.is_empty()
    }
}

// ── SearchTree ────────────────────────────────────────────────────────────────

/// Shortest-path tree from one source: distances and predecessor arcs.
#[derive(Debug, Clone)]
pub struct SearchTree {
    source:   NodeId,
    dist:     Vec<f64>,
    prev_arc: Vec<ArcId>,
    prev_min: Vec<f64>,
}

impl SearchTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Search cost to `node`, or `None` if it was not reached.
    #[inline]
    pub fn distance(&self, node: NodeId) -> Option<f64> {
        let d = self.dist[node.index()];
        d.is_finite().then_some(d)
    }

    /// Walk predecessor arcs back from `node`.
    pub fn route_to(&self, graph: &CityGraph, node: NodeId) -> Option<Route> {
        let cost = self.distance(node)?;
        if node == self.source {
            return Some(Route::trivial(node));
        }
        let mut arcs = Vec::new();
        let mut minutes = Vec::new();
        let mut cur = node;
        while cur != self.source {
            let arc = self.prev_arc[cur.index()];
            if arc == ArcId::INVALID {
                return None;
            }
            arcs.push(arc);
            minutes.push(self.prev_min[cur.index()]);
            cur = graph.arc_from[arc.index()];
        }
        arcs.reverse();
        minutes.reverse();
        Some(Route { arcs, minutes, cost, target: node })
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine over a [`City`].
pub trait Router {
    /// Cheapest route from `from` to whichever of `targets` is nearest.
    ///
    /// Fails with `Unreachable` when no target can be reached (an empty
    /// `targets` slice included).
    fn route(
        &self,
        city: &City,
        from: NodeId,
        targets: &[NodeId],
        collect: Collect<'_>,
    ) -> RouteResult<Route>;

    /// Full shortest-path tree from `from`.
    fn search_tree(&self, city: &City, from: NodeId, collect: Collect<'_>) -> SearchTree;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Label-setting Dijkstra over the city's arcs.
///
/// Arcs the city prices as `None` (forbidden direction, closed street) are
/// skipped.  A multi-target query stops as soon as the queue's minimum
/// exceeds the best finalized target.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        city: &City,
        from: NodeId,
        targets: &[NodeId],
        collect: Collect<'_>,
    ) -> RouteResult<Route> {
        let (tree, best) = dijkstra(city, from, targets, collect);
        let graph = city.graph();
        best.and_then(|t| tree.route_to(graph, t)).ok_or_else(|| RouteError::Unreachable {
            from: graph.node_label(from),
            to: targets
                .first()
                .map(|&t| graph.location(graph.node_location(t)).name.clone())
                .unwrap_or_default(),
        })
    }

    fn search_tree(&self, city: &City, from: NodeId, collect: Collect<'_>) -> SearchTree {
        dijkstra(city, from, &[], collect).0
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Search price of `arc`: `(adjusted minutes, cost added to the distance)`.
#[inline]
fn step_cost(city: &City, arc: ArcId, collect: Collect<'_>) -> Option<(f64, f64)> {
    let minutes = city.arc_cost(arc)?;
    let graph = city.graph();
    let service = graph.arc_service_min(arc);
    if service > 0.0 && !collect.charges(graph.node_location(graph.arc_to[arc.index()])) {
        Some((minutes, minutes - service))
    } else {
        Some((minutes, minutes))
    }
}

/// Returns the tree and, for a targeted search, the finalized target.
fn dijkstra(
    city: &City,
    from: NodeId,
    targets: &[NodeId],
    collect: Collect<'_>,
) -> (SearchTree, Option<NodeId>) {
    let graph = city.graph();
    let n = graph.node_count();

    let mut tree = SearchTree {
        source: from,
        dist: vec![f64::INFINITY; n],
        prev_arc: vec![ArcId::INVALID; n],
        prev_min: vec![0.0; n],
    };
    let mut finalized = vec![false; n];
    let mut best: Option<(f64, NodeId)> = None;

    tree.dist[from.index()] = 0.0;

    // Min-heap: (cost, node).  NodeId breaks ties deterministically.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if let Some((best_cost, _)) = best {
            if cost > best_cost {
                break;
            }
        }
        if finalized[node.index()] {
            continue;
        }
        finalized[node.index()] = true;

        if best.is_none() && targets.contains(&node) {
            best = Some((cost, node));
        }

        for &arc in graph.out_arcs(node) {
            let next = graph.arc_to[arc.index()];
            if finalized[next.index()] {
                continue;
            }
            let Some((minutes, step)) = step_cost(city, arc, collect) else { continue };
            let new_cost = cost + step;

            if new_cost < tree.dist[next.index()] {
                tree.dist[next.index()] = new_cost;
                tree.prev_arc[next.index()] = arc;
                tree.prev_min[next.index()] = minutes;
                heap.push(Reverse((OrderedFloat(new_cost), next)));
            }
        }
    }

    (tree, best.map(|(_, node)| node))
}
