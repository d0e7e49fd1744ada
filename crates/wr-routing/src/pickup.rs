//! Greedy multi-stop tours: bounded pickup and nearest-neighbor circuit.

use std::collections::BTreeSet;

use wr_core::{LocationId, NodeId};
use wr_network::City;

use crate::{Collect, Itinerary, LegRole, Route, RouteError, RouteResult, Router};

/// Most stops a bounded pickup tour accepts.
pub const MAX_PICKUP_STOPS: usize = 10;

/// A requested stop resolved to its location and routing nodes.
#[derive(Debug, Clone)]
pub(crate) struct Stop {
    pub loc: LocationId,
    pub nodes: Vec<NodeId>,
}

/// Resolve stop names, dropping repeats.  Fails on the first name with no
/// routing node.
pub(crate) fn resolve_stops(city: &City, names: &[&str]) -> RouteResult<Vec<Stop>> {
    let graph = city.graph();
    let mut seen = BTreeSet::new();
    let mut stops = Vec::with_capacity(names.len());
    for &name in names {
        let nodes = graph.lookup_all_variants(name);
        let Some(&first) = nodes.first() else {
            return Err(RouteError::UnknownDestination(name.to_owned()));
        };
        let loc = graph.node_location(first);
        if seen.insert(loc) {
            stops.push(Stop { loc, nodes: nodes.to_vec() });
        }
    }
    Ok(stops)
}

pub(crate) fn warehouse_node(city: &City) -> RouteResult<NodeId> {
    city.graph().warehouse_node().ok_or(RouteError::NoWarehouse)
}

/// Cheapest probe among `candidates`, as `(route, candidate)`.
///
/// A candidate the router cannot reach right now is skipped, since a later
/// hour may open its street.  Fails with the first `Unreachable` only when
/// no candidate can be reached; any other error propagates at once.
fn nearest<'s, R, K>(
    router: &R,
    city: &City,
    pos: NodeId,
    candidates: impl Iterator<Item = (K, &'s Stop)>,
    collect: Collect<'_>,
) -> RouteResult<(Route, K)>
where
    R: Router + ?Sized,
{
    let mut best: Option<(Route, K)> = None;
    let mut blocked: Option<RouteError> = None;
    for (key, stop) in candidates {
        match router.route(city, pos, &stop.nodes, collect) {
            Ok(route) => {
                if best.as_ref().is_none_or(|(b, _)| route.cost < b.cost) {
                    best = Some((route, key));
                }
            }
            Err(e @ RouteError::Unreachable { .. }) => {
                log::trace!("{e}, trying later");
                blocked.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    match (best, blocked) {
        (Some(best), _) => Ok(best),
        (None, Some(e)) => Err(e),
        (None, None) => Err(RouteError::EmptyRequest),
    }
}

/// Visit up to [`MAX_PICKUP_STOPS`] stops from the warehouse, nearest first.
///
/// Each probe charges the service time of every stop still to visit, so a
/// stop passed on the way to another is paid for.  A stop that is cut off at
/// the current hour waits until a later leg; the tour fails only when no
/// remaining stop can be reached.  The tour ends at the last stop.  Advances
/// the city's clock after each committed leg.
pub fn bounded_pickup<R: Router + ?Sized>(
    router: &R,
    city: &mut City,
    stops: &[&str],
) -> RouteResult<Itinerary> {
    if stops.is_empty() {
        return Err(RouteError::EmptyRequest);
    }
    if stops.len() > MAX_PICKUP_STOPS {
        return Err(RouteError::TooManyStops { got: stops.len(), max: MAX_PICKUP_STOPS });
    }
    let start = warehouse_node(city)?;
    let resolved = resolve_stops(city, stops)?;
    log::debug!("bounded pickup: {} stops", resolved.len());

    let mut remaining: BTreeSet<LocationId> = resolved.iter().map(|s| s.loc).collect();
    let mut itinerary = Itinerary::new(start);
    for s in &resolved {
        itinerary.require(s.loc);
    }

    let mut pos = start;
    while !remaining.is_empty() {
        let candidates = resolved
            .iter()
            .filter(|s| remaining.contains(&s.loc))
            .map(|s| (s.loc, s));
        let (route, loc) = nearest(router, city, pos, candidates, Collect::Only(&remaining))?;

        itinerary.push_route(city.graph(), &route, LegRole::Travel);
        city.constraints_mut().advance(route.cost);
        pos = route.target;
        remaining.remove(&loc);
    }

    Ok(itinerary)
}

/// Visit every stop nearest first, then return to the warehouse.
///
/// Probes ignore service time; the returned itinerary pays it once per stop.
/// Stops cut off at the current hour are skipped as in [`bounded_pickup`].
pub fn nearest_neighbor_circuit<R: Router + ?Sized>(
    router: &R,
    city: &mut City,
    stops: &[&str],
) -> RouteResult<Itinerary> {
    if stops.is_empty() {
        return Err(RouteError::EmptyRequest);
    }
    let start = warehouse_node(city)?;
    let resolved = resolve_stops(city, stops)?;
    log::debug!("nearest-neighbor circuit: {} stops", resolved.len());

    let none = BTreeSet::new();
    let mut visited = vec![false; resolved.len()];
    let mut itinerary = Itinerary::new(start);
    let mut pos = start;

    for _ in 0..resolved.len() {
        let candidates = resolved.iter().enumerate().filter(|&(i, _)| !visited[i]);
        let (route, i) = nearest(router, city, pos, candidates, Collect::Only(&none))?;

        itinerary.push_route(city.graph(), &route, LegRole::Travel);
        itinerary.require(resolved[i].loc);
        city.constraints_mut().advance(route.cost);
        visited[i] = true;
        pos = route.target;
    }

    let home = router.route(city, pos, &[start], Collect::Only(&none))?;
    itinerary.push_route(city.graph(), &home, LegRole::Travel);
    city.constraints_mut().advance(home.cost);

    Ok(itinerary)
}
