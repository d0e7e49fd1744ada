//! Full-coverage tour: drive every street that needs collecting.
//!
//! Greedy, not a Chinese-postman optimum.  From the current node:
//!
//! 1. take an uncollected required arc leaving it, if one is drivable now;
//! 2. otherwise reposition along a shortest path to the source of the
//!    nearest uncollected required arc (ties go to the lowest unit, then the
//!    lowest arc), then collect it.
//!
//! Collection state lives in this builder only, so runs never contaminate
//! each other.  Required arcs closed at departure are left out of the tour.

use wr_core::{ArcId, NodeId};
use wr_network::{City, RequiredArcs};

use crate::{Collect, Itinerary, LegRole, RouteError, RouteResult, Router};

/// Build a tour from the warehouse that collects every required unit of
/// `city` and returns to the warehouse.
///
/// Advances the city's clock as arcs are driven.
pub fn full_coverage<R: Router + ?Sized>(router: &R, city: &mut City) -> RouteResult<Itinerary> {
    let start = city.graph().warehouse_node().ok_or(RouteError::NoWarehouse)?;

    let mut required = city.required_arcs();
    let before = required.len();
    required.retain_arcs(|arc| city.arc_cost(arc).is_some());
    log::debug!(
        "full coverage from {}: {} required units ({} closed at departure)",
        city.graph().node_label(start),
        required.len(),
        before - required.len()
    );

    let mut collected = vec![false; required.len()];
    let mut remaining = required.len();
    let mut itinerary = Itinerary::new(start);
    let mut pos = start;

    while remaining > 0 {
        let arc = match next_direct(city, &required, &collected, pos) {
            Some(arc) => arc,
            None => {
                let tree = router.search_tree(city, pos, Collect::All);
                let graph = city.graph();

                let mut nearest: Option<(f64, ArcId)> = None;
                for (unit, info) in required.units().iter().enumerate() {
                    if collected[unit] {
                        continue;
                    }
                    for &arc in &info.arcs {
                        if city.arc_cost(arc).is_none() {
                            continue;
                        }
                        let Some(d) = tree.distance(graph.arc_from[arc.index()]) else { continue };
                        if nearest.is_none_or(|(best, _)| d < best) {
                            nearest = Some((d, arc));
                        }
                    }
                }

                let Some((distance, arc)) = nearest else {
                    let unit = collected.iter().position(|&c| !c).unwrap_or_default();
                    let info = &required.units()[unit];
                    return Err(RouteError::Unreachable {
                        from: graph.node_label(pos),
                        to: format!(
                            "{} ({} -> {})",
                            graph.street_name(info.street),
                            graph.location(info.from).name,
                            graph.location(info.to).name
                        ),
                    });
                };

                let source = graph.arc_from[arc.index()];
                log::trace!(
                    "reposition {:.1} min to {}",
                    distance,
                    graph.node_label(source)
                );
                let route = tree.route_to(graph, source).ok_or_else(|| RouteError::Unreachable {
                    from: graph.node_label(pos),
                    to: graph.node_label(source),
                })?;
                itinerary.push_route(graph, &route, LegRole::Repositioning);
                for &minutes in &route.minutes {
                    city.constraints_mut().advance(minutes);
                }
                pos = source;

                // The clock may have closed the street meanwhile; choose again.
                if city.arc_cost(arc).is_none() {
                    continue;
                }
                arc
            }
        };

        let Some(minutes) = city.arc_cost(arc) else { continue };
        let Some(unit) = required.unit_of(arc) else { continue };

        let graph = city.graph();
        let to = graph.arc_to[arc.index()];
        itinerary.push_arc(graph, arc, minutes, LegRole::Collecting);
        let target = graph.node_location(to);
        if graph.location(target).kind.is_collection_point() {
            itinerary.require(target);
        }
        collected[unit] = true;
        remaining -= 1;
        city.constraints_mut().advance(minutes);
        pos = to;
    }

    if pos != start {
        let route = router.route(city, pos, &[start], Collect::All)?;
        itinerary.push_route(city.graph(), &route, LegRole::Repositioning);
        for &minutes in &route.minutes {
            city.constraints_mut().advance(minutes);
        }
    }

    log::debug!(
        "full coverage done: {} legs, {} collecting, {:.1} min, back at {:02}h",
        itinerary.len(),
        itinerary.collecting_legs().count(),
        itinerary.total_duration(),
        city.current_hour()
    );
    Ok(itinerary)
}

/// An uncollected required arc leaving `pos` that is drivable now.
fn next_direct(
    city: &City,
    required: &RequiredArcs,
    collected: &[bool],
    pos: NodeId,
) -> Option<ArcId> {
    city.graph().out_arcs(pos).iter().copied().find(|&arc| {
        required.unit_of(arc).is_some_and(|u| !collected[u]) && city.arc_cost(arc).is_some()
    })
}
