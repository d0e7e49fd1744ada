//! Planner configuration.

use wr_core::{CityRng, Hour, DEFAULT_DEPARTURE};
use wr_network::OrientationHypothesis;

/// Run-wide planner settings.
///
/// With the `serde` feature every field is optional in serialized form and
/// falls back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Hour every query departs at, `6..=22`.  Default: 8.
    pub departure_hour: Hour,

    /// Orientation default for unconfigured streets.  Default: mixed by
    /// lane count (HO3).
    pub hypothesis: OrientationHypothesis,

    /// Random incidents drawn when the planner is created.  Default: 0.
    pub incident_count: usize,

    /// Master RNG seed.  `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl PlannerConfig {
    /// RNG for building the city: seeded when `seed` is set.
    pub fn make_rng(&self) -> CityRng {
        match self.seed {
            Some(seed) => CityRng::new(seed),
            None => CityRng::from_entropy(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            departure_hour: DEFAULT_DEPARTURE,
            hypothesis: OrientationHypothesis::default(),
            incident_count: 0,
            seed: None,
        }
    }
}
