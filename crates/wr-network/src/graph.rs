//! City street graph.
//!
//! # Data layout
//!
//! Three layers, each an arena indexed by a typed id:
//!
//! ```text
//! LocationId ─ physical named point (name, kind, coordinates, incident streets)
//!   NodeId   ─ routing node: the location itself, or one per-street sub-node
//!              of an intersection, keyed by (LocationId, StreetId)
//!   ArcId    ─ directed arc between two routing nodes (SoA vectors)
//! ```
//!
//! Intersections are split: arriving on one street and leaving on another
//! costs a direction-change ("turn") arc between the two sub-nodes.  Turn arcs
//! carry no street.  Every other kind of location is a single routing node.
//!
//! Street arcs bake the target's service time into their base duration:
//!
//! ```text
//! arc_base_min[a] = raw travel minutes + service_minutes(kind of target)
//! ```
//!
//! Consumers that should not pay the service time subtract it back out.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps planar coordinates to the nearest location.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use wr_core::{ArcId, CityRng, LocationId, LocationKind, NodeId, Point, StreetId};

use crate::{NetworkError, NetworkResult};

/// Side of the square auto-assigned coordinates are drawn from.
pub const AUTO_COORD_EXTENT: f64 = 1000.0;

/// Range of durations drawn for untimed segments, in minutes.
const UNTIMED_MIN: f64 = 1.0;
const UNTIMED_MAX: f64 = 5.0;

// ── R-tree location entry ─────────────────────────────────────────────────────

#[derive(Clone, PartialEq)]
struct LocationEntry {
    point: [f64; 2],
    id: LocationId,
}

impl RTreeObject for LocationEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LocationEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// A named physical point of the city.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub name: String,
    pub kind: LocationKind,
    pub point: Point,
    /// Streets touching this location, in first-seen order.
    pub streets: Vec<StreetId>,
}

// ── CityGraph ─────────────────────────────────────────────────────────────────

/// Directed street graph with split intersections.
///
/// Arc vectors are `pub` for direct indexed access in the router's inner
/// loop.  Build through [`add_location`](Self::add_location),
/// [`add_segment`](Self::add_segment) and
/// [`set_coordinates`](Self::set_coordinates).
pub struct CityGraph {
    // ── Locations ─────────────────────────────────────────────────────────
    locations:      Vec<Location>,
    location_index: FxHashMap<String, LocationId>,
    warehouse:      Option<LocationId>,
    /// Every routing node of each location, in creation order.
    variants:       Vec<Vec<NodeId>>,

    // ── Routing nodes ─────────────────────────────────────────────────────
    /// Physical location of each node.  Indexed by `NodeId`.
    pub node_location: Vec<LocationId>,
    /// Street of each intersection sub-node; `None` for unsplit locations.
    pub node_street:   Vec<Option<StreetId>>,
    sub_nodes:         FxHashMap<(LocationId, StreetId), NodeId>,

    // ── Streets ───────────────────────────────────────────────────────────
    street_names:  Vec<String>,
    street_index:  FxHashMap<String, StreetId>,
    /// `true` once at least one segment has been added on the street.
    street_in_use: Vec<bool>,

    // ── Arcs (indexed by ArcId) ───────────────────────────────────────────
    pub arc_from:     Vec<NodeId>,
    pub arc_to:       Vec<NodeId>,
    /// Street of each arc; `None` marks a direction change.
    pub arc_street:   Vec<Option<StreetId>>,
    /// Base minutes, target service time included.
    pub arc_base_min: Vec<f64>,
    out_arcs:         Vec<Vec<ArcId>>,
    turn_index:       FxHashMap<(NodeId, NodeId), ArcId>,

    rng:         CityRng,
    spatial_idx: RTree<LocationEntry>,
}

impl CityGraph {
    /// Empty graph.  `rng` draws auto-assigned coordinates and untimed
    /// durations.
    pub fn new(rng: CityRng) -> Self {
        Self {
            locations: Vec::new(),
            location_index: FxHashMap::default(),
            warehouse: None,
            variants: Vec::new(),
            node_location: Vec::new(),
            node_street: Vec::new(),
            sub_nodes: FxHashMap::default(),
            street_names: Vec::new(),
            street_index: FxHashMap::default(),
            street_in_use: Vec::new(),
            arc_from: Vec::new(),
            arc_to: Vec::new(),
            arc_street: Vec::new(),
            arc_base_min: Vec::new(),
            out_arcs: Vec::new(),
            turn_index: FxHashMap::default(),
            rng,
            spatial_idx: RTree::new(),
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn node_count(&self) -> usize {
        self.node_location.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arc_to.len()
    }

    pub fn street_count(&self) -> usize {
        self.street_names.len()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a location, or move an existing one to `point`.
    ///
    /// The kind of an existing location is never changed.  Fails with
    /// `DuplicateWarehouse` when a second, differently named warehouse is
    /// added.
    pub fn add_location(
        &mut self,
        name: &str,
        kind: LocationKind,
        point: Point,
    ) -> NetworkResult<LocationId> {
        if let Some(&id) = self.location_index.get(name) {
            if self.locations[id.index()].kind != kind {
                log::warn!(
                    "{name} already exists as a {}; keeping that kind",
                    self.locations[id.index()].kind
                );
            }
            self.move_location(id, point);
            return Ok(id);
        }
        self.insert_location(name, kind, point)
    }

    /// Set the coordinates of `name`, creating the location (kind inferred
    /// from its name) if it is not known yet.
    pub fn set_coordinates(&mut self, name: &str, x: f64, y: f64) -> NetworkResult<LocationId> {
        let point = Point::new(x, y);
        match self.location_index.get(name) {
            Some(&id) => {
                self.move_location(id, point);
                Ok(id)
            }
            None => self.insert_location(name, LocationKind::infer_from_name(name), point),
        }
    }

    /// Intern a street name.
    pub fn intern_street(&mut self, name: &str) -> StreetId {
        if let Some(&id) = self.street_index.get(name) {
            return id;
        }
        let id = StreetId(self.street_names.len() as u32);
        self.street_names.push(name.to_owned());
        self.street_index.insert(name.to_owned(), id);
        self.street_in_use.push(false);
        id
    }

    /// Add one directed street segment `from → to` taking `duration` minutes.
    ///
    /// Unknown endpoints are created with a kind inferred from their name and
    /// random coordinates.  Intersection endpoints get (or reuse) their
    /// sub-node for `street`, and the direction-change arcs around them are
    /// brought up to date.
    pub fn add_segment(
        &mut self,
        street: &str,
        from: &str,
        to: &str,
        duration: f64,
    ) -> NetworkResult<ArcId> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(NetworkError::InvalidDuration { street: street.to_owned(), duration });
        }

        let sid = self.intern_street(street);
        let from_loc = self.ensure_location(from)?;
        let to_loc = self.ensure_location(to)?;
        self.register_street(from_loc, sid);
        self.register_street(to_loc, sid);

        let from_node = self.node_on(from_loc, sid);
        let to_node = self.node_on(to_loc, sid);
        let service = self.locations[to_loc.index()].kind.service_minutes();
        let arc = self.push_arc(from_node, to_node, Some(sid), duration + service);
        self.street_in_use[sid.index()] = true;

        self.synthesize_turns(from_loc);
        if to_loc != from_loc {
            self.synthesize_turns(to_loc);
        }

        log::trace!("segment {street}: {from} -> {to} ({duration:.1} min) = {arc}");
        Ok(arc)
    }

    /// Like [`add_segment`](Self::add_segment) with a random duration.
    pub fn add_segment_untimed(&mut self, street: &str, from: &str, to: &str) -> NetworkResult<ArcId> {
        let duration = self.random_duration();
        self.add_segment(street, from, to, duration)
    }

    /// A duration in `[1.0, 5.0)` minutes, rounded to a tenth.
    pub fn random_duration(&mut self) -> f64 {
        let raw: f64 = self.rng.gen_range(UNTIMED_MIN..UNTIMED_MAX);
        (raw * 10.0).round() / 10.0
    }

    fn insert_location(
        &mut self,
        name: &str,
        kind: LocationKind,
        point: Point,
    ) -> NetworkResult<LocationId> {
        if kind == LocationKind::Warehouse {
            if let Some(existing) = self.warehouse {
                return Err(NetworkError::DuplicateWarehouse {
                    existing: self.locations[existing.index()].name.clone(),
                    name: name.to_owned(),
                });
            }
        }

        let id = LocationId(self.locations.len() as u32);
        self.locations.push(Location {
            name: name.to_owned(),
            kind,
            point,
            streets: Vec::new(),
        });
        self.variants.push(Vec::new());
        self.location_index.insert(name.to_owned(), id);
        self.spatial_idx.insert(LocationEntry { point: [point.x, point.y], id });
        if kind == LocationKind::Warehouse {
            self.warehouse = Some(id);
        }
        Ok(id)
    }

    fn ensure_location(&mut self, name: &str) -> NetworkResult<LocationId> {
        if let Some(&id) = self.location_index.get(name) {
            return Ok(id);
        }
        let x = self.rng.gen_range(0.0..AUTO_COORD_EXTENT);
        let y = self.rng.gen_range(0.0..AUTO_COORD_EXTENT);
        self.insert_location(name, LocationKind::infer_from_name(name), Point::new(x, y))
    }

    fn move_location(&mut self, id: LocationId, point: Point) {
        let loc = &mut self.locations[id.index()];
        let old = LocationEntry { point: [loc.point.x, loc.point.y], id };
        self.spatial_idx.remove(&old);
        loc.point = point;
        self.spatial_idx.insert(LocationEntry { point: [point.x, point.y], id });
    }

    fn register_street(&mut self, loc: LocationId, street: StreetId) {
        let streets = &mut self.locations[loc.index()].streets;
        if !streets.contains(&street) {
            streets.push(street);
        }
    }

    /// Routing node for `loc` when entered or left along `street`.
    fn node_on(&mut self, loc: LocationId, street: StreetId) -> NodeId {
        if self.locations[loc.index()].kind.is_splittable() {
            if let Some(&node) = self.sub_nodes.get(&(loc, street)) {
                return node;
            }
            let node = self.push_node(loc, Some(street));
            self.sub_nodes.insert((loc, street), node);
            node
        } else {
            match self.variants[loc.index()].first() {
                Some(&node) => node,
                None => self.push_node(loc, None),
            }
        }
    }

    fn push_node(&mut self, loc: LocationId, street: Option<StreetId>) -> NodeId {
        let node = NodeId(self.node_location.len() as u32);
        self.node_location.push(loc);
        self.node_street.push(street);
        self.out_arcs.push(Vec::new());
        self.variants[loc.index()].push(node);
        node
    }

    fn push_arc(&mut self, from: NodeId, to: NodeId, street: Option<StreetId>, base: f64) -> ArcId {
        let arc = ArcId(self.arc_to.len() as u32);
        self.arc_from.push(from);
        self.arc_to.push(to);
        self.arc_street.push(street);
        self.arc_base_min.push(base);
        self.out_arcs[from.index()].push(arc);
        arc
    }

    /// Wire a direction-change arc between every ordered pair of `loc`'s
    /// sub-nodes, priced `1.0 + 0.5 × incident streets`.  Existing turn arcs
    /// are re-priced, never duplicated.
    fn synthesize_turns(&mut self, loc: LocationId) {
        if !self.locations[loc.index()].kind.is_splittable() {
            return;
        }
        let cost = 1.0 + 0.5 * self.locations[loc.index()].streets.len() as f64;
        let nodes = self.variants[loc.index()].clone();
        for &a in &nodes {
            for &b in &nodes {
                if a == b {
                    continue;
                }
                match self.turn_index.get(&(a, b)) {
                    Some(&arc) => self.arc_base_min[arc.index()] = cost,
                    None => {
                        let arc = self.push_arc(a, b, None, cost);
                        self.turn_index.insert((a, b), arc);
                    }
                }
            }
        }
    }

    // ── Locations ─────────────────────────────────────────────────────────

    #[inline]
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.location_index.get(name).copied()
    }

    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &Location)> + '_ {
        self.locations.iter().enumerate().map(|(i, l)| (LocationId(i as u32), l))
    }

    pub fn warehouse(&self) -> Option<LocationId> {
        self.warehouse
    }

    /// Routing node of the warehouse, once a segment touches it.
    pub fn warehouse_node(&self) -> Option<NodeId> {
        self.warehouse.and_then(|w| self.variants[w.index()].first().copied())
    }

    /// Every routing node of `loc`.
    #[inline]
    pub fn variants(&self, loc: LocationId) -> &[NodeId] {
        &self.variants[loc.index()]
    }

    /// Every routing node whose base location is named `base_name`.  Empty
    /// for unknown names.
    pub fn lookup_all_variants(&self, base_name: &str) -> &[NodeId] {
        match self.location_index.get(base_name) {
            Some(&loc) => &self.variants[loc.index()],
            None => &[],
        }
    }

    /// Nearest location to `point`.  `None` only for an empty graph.
    pub fn nearest_location(&self, point: Point) -> Option<LocationId> {
        self.spatial_idx.nearest_neighbor(&[point.x, point.y]).map(|e| e.id)
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn out_arcs(&self, node: NodeId) -> &[ArcId] {
        &self.out_arcs[node.index()]
    }

    #[inline]
    pub fn node_location(&self, node: NodeId) -> LocationId {
        self.node_location[node.index()]
    }

    #[inline]
    pub fn node_kind(&self, node: NodeId) -> LocationKind {
        self.locations[self.node_location[node.index()].index()].kind
    }

    /// `"Carrefour A"`, or `"Carrefour A [Rue X]"` for a sub-node.
    pub fn node_label(&self, node: NodeId) -> String {
        let name = &self.location(self.node_location(node)).name;
        match self.node_street[node.index()] {
            Some(street) => format!("{name} [{}]", self.street_name(street)),
            None => name.clone(),
        }
    }

    // ── Arcs ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn is_turn(&self, arc: ArcId) -> bool {
        self.arc_street[arc.index()].is_none()
    }

    /// Service minutes baked into `arc`'s base duration.
    #[inline]
    pub fn arc_service_min(&self, arc: ArcId) -> f64 {
        if self.is_turn(arc) {
            return 0.0;
        }
        self.node_kind(self.arc_to[arc.index()]).service_minutes()
    }

    /// Base locations of `arc`'s endpoints.
    #[inline]
    pub fn arc_locations(&self, arc: ArcId) -> (LocationId, LocationId) {
        (
            self.node_location(self.arc_from[arc.index()]),
            self.node_location(self.arc_to[arc.index()]),
        )
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        (0..self.arc_count() as u32).map(ArcId)
    }

    // ── Streets ───────────────────────────────────────────────────────────

    #[inline]
    pub fn street_name(&self, street: StreetId) -> &str {
        &self.street_names[street.index()]
    }

    pub fn street_id(&self, name: &str) -> Option<StreetId> {
        self.street_index.get(name).copied()
    }

    /// Streets carrying at least one segment.
    pub fn streets_in_use(&self) -> Vec<StreetId> {
        self.street_in_use
            .iter()
            .enumerate()
            .filter(|&(_, &used)| used)
            .map(|(i, _)| StreetId(i as u32))
            .collect()
    }
}
