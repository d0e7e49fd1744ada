//! Street orientation rules.
//!
//! Which directions of a street may be driven, and which directions need
//! their own collection pass, depend on the street's configuration and on a
//! city-wide [`OrientationHypothesis`] used for unconfigured streets.
//!
//! Every street segment is wired in both directions in the graph; the policy
//! filters at query time.

use std::fmt;

use rustc_hash::FxHashMap;

use wr_core::{ArcId, LocationId, StreetId};

use crate::CityGraph;

// ── Hypotheses ────────────────────────────────────────────────────────────────

/// City-wide default for unconfigured streets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrientationHypothesis {
    /// HO1: every street two-way, collected from both sides in one pass.
    AllTwoWay,
    /// HO2: directed graph, one side collected per pass.
    Directed,
    /// HO3: single-lane streets collected from both sides, wider ones from
    /// one side per pass.
    #[default]
    MixedByLanes,
}

impl OrientationHypothesis {
    pub fn code(self) -> &'static str {
        match self {
            OrientationHypothesis::AllTwoWay    => "HO1",
            OrientationHypothesis::Directed     => "HO2",
            OrientationHypothesis::MixedByLanes => "HO3",
        }
    }
}

impl fmt::Display for OrientationHypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ── StreetOrientation ─────────────────────────────────────────────────────────

/// Explicit configuration of one street.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreetOrientation {
    /// Drivable only along `route`, in list order.
    OneWay { route: Vec<String> },
    /// One lane each way; both sides collected in one pass.
    TwoWaySingleLane,
    /// Two or more lanes; each direction collects its own side.
    TwoWayMultiLane { lanes: u8 },
}

impl StreetOrientation {
    /// `from → to` is allowed iff both appear on the route and `from` comes
    /// first.  Two-way streets allow everything.
    pub fn allows(&self, from: &str, to: &str) -> bool {
        match self {
            StreetOrientation::OneWay { route } => {
                let pos = |name: &str| route.iter().position(|r| r == name);
                matches!((pos(from), pos(to)), (Some(f), Some(t)) if f < t)
            }
            _ => true,
        }
    }

    pub fn collects_both_sides(&self) -> bool {
        matches!(self, StreetOrientation::TwoWaySingleLane)
    }
}

/// Per-kind counts of configured streets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientationStats {
    pub one_way: usize,
    pub single_lane: usize,
    pub multi_lane: usize,
}

impl OrientationStats {
    pub fn configured(&self) -> usize {
        self.one_way + self.single_lane + self.multi_lane
    }
}

// ── Required arcs ─────────────────────────────────────────────────────────────

/// One unit of collection work: a directed street segment, or both
/// directions of it when the street is collected from both sides at once.
#[derive(Clone, Debug, PartialEq)]
pub struct RequiredUnit {
    pub street: StreetId,
    pub from: LocationId,
    pub to: LocationId,
    /// Drivable arcs any one of which collects the unit.
    pub arcs: Vec<ArcId>,
}

/// The set of collection units of a city, with an arc → unit index.
#[derive(Clone, Debug, Default)]
pub struct RequiredArcs {
    units: Vec<RequiredUnit>,
    unit_of_arc: FxHashMap<ArcId, usize>,
}

impl RequiredArcs {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[RequiredUnit] {
        &self.units
    }

    /// Unit collected by traversing `arc`, if any.
    #[inline]
    pub fn unit_of(&self, arc: ArcId) -> Option<usize> {
        self.unit_of_arc.get(&arc).copied()
    }

    /// Keep only the arcs satisfying `keep`; units left without arcs are
    /// dropped.
    pub fn retain_arcs(&mut self, mut keep: impl FnMut(ArcId) -> bool) {
        let mut units = std::mem::take(&mut self.units);
        for unit in &mut units {
            unit.arcs.retain(|&a| keep(a));
        }
        units.retain(|u| !u.arcs.is_empty());

        self.unit_of_arc.clear();
        for (i, unit) in units.iter().enumerate() {
            for &arc in &unit.arcs {
                self.unit_of_arc.insert(arc, i);
            }
        }
        self.units = units;
    }
}

// ── OrientationPolicy ─────────────────────────────────────────────────────────

/// Street configurations plus the city-wide hypothesis.
#[derive(Clone, Debug, Default)]
pub struct OrientationPolicy {
    hypothesis: OrientationHypothesis,
    configs: FxHashMap<StreetId, StreetOrientation>,
}

impl OrientationPolicy {
    pub fn new(hypothesis: OrientationHypothesis) -> Self {
        Self { hypothesis, configs: FxHashMap::default() }
    }

    pub fn hypothesis(&self) -> OrientationHypothesis {
        self.hypothesis
    }

    pub fn set_hypothesis(&mut self, hypothesis: OrientationHypothesis) {
        self.hypothesis = hypothesis;
    }

    /// Replace the configuration of `street`.
    pub fn configure(&mut self, street: StreetId, orientation: StreetOrientation) {
        self.configs.insert(street, orientation);
    }

    pub fn orientation(&self, street: StreetId) -> Option<&StreetOrientation> {
        self.configs.get(&street)
    }

    pub fn is_direction_allowed(&self, street: StreetId, from: &str, to: &str) -> bool {
        if self.hypothesis == OrientationHypothesis::AllTwoWay {
            return true;
        }
        self.configs.get(&street).is_none_or(|o| o.allows(from, to))
    }

    /// Whether one pass along `street` collects both of its sides.
    pub fn collects_both_sides(&self, street: StreetId) -> bool {
        if self.hypothesis == OrientationHypothesis::AllTwoWay {
            return true;
        }
        match self.configs.get(&street) {
            Some(o) => o.collects_both_sides(),
            None => self.hypothesis == OrientationHypothesis::MixedByLanes,
        }
    }

    /// Configure every unconfigured street of `graph` whose name marks it:
    /// avenues and boulevards are multi-lane, lanes and paths single-lane.
    /// Returns the number of streets configured.
    pub fn infer_from_names(&mut self, graph: &CityGraph) -> usize {
        let mut configured = 0;
        for street in graph.streets_in_use() {
            if self.configs.contains_key(&street) {
                continue;
            }
            let lower = graph.street_name(street).to_lowercase();
            let starts = |prefixes: &[&str]| prefixes.iter().any(|p| lower.starts_with(p));

            let orientation = if starts(&["avenue", "boulevard"]) {
                StreetOrientation::TwoWayMultiLane { lanes: 2 }
            } else if starts(&["allée", "allee", "chemin", "sentier", "lane", "path"]) {
                StreetOrientation::TwoWaySingleLane
            } else {
                continue;
            };
            log::debug!("{}: inferred {orientation:?}", graph.street_name(street));
            self.configs.insert(street, orientation);
            configured += 1;
        }
        configured
    }

    pub fn stats(&self) -> OrientationStats {
        let mut stats = OrientationStats::default();
        for orientation in self.configs.values() {
            match orientation {
                StreetOrientation::OneWay { .. }          => stats.one_way += 1,
                StreetOrientation::TwoWaySingleLane       => stats.single_lane += 1,
                StreetOrientation::TwoWayMultiLane { .. } => stats.multi_lane += 1,
            }
        }
        stats
    }

    /// Collection units of `graph`.
    ///
    /// Turn arcs and directions the policy forbids are skipped.  Arcs are
    /// keyed by (street, from location, to location); when the street
    /// collects both sides, the reverse key joins the same unit.
    pub fn required_arcs(&self, graph: &CityGraph) -> RequiredArcs {
        let mut required = RequiredArcs::default();
        let mut unit_of_key: FxHashMap<(StreetId, LocationId, LocationId), usize> =
            FxHashMap::default();

        for arc in graph.arcs() {
            let Some(street) = graph.arc_street[arc.index()] else { continue };
            let (from, to) = graph.arc_locations(arc);
            let allowed = self.is_direction_allowed(
                street,
                &graph.location(from).name,
                &graph.location(to).name,
            );
            if !allowed {
                continue;
            }

            let unit = match unit_of_key.get(&(street, from, to)) {
                Some(&unit) => unit,
                None => {
                    let unit = required.units.len();
                    required.units.push(RequiredUnit { street, from, to, arcs: Vec::new() });
                    unit_of_key.insert((street, from, to), unit);
                    if self.collects_both_sides(street) {
                        unit_of_key.insert((street, to, from), unit);
                    }
                    unit
                }
            };
            required.units[unit].arcs.push(arc);
            required.unit_of_arc.insert(arc, unit);
        }
        required
    }

    /// Number of collection units of `graph`.
    pub fn count_required_arcs(&self, graph: &CityGraph) -> usize {
        self.required_arcs(graph).len()
    }
}
