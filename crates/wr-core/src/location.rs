//! Location kinds and their service-time semantics.
//!
//! A location's kind is a plain tag; everything that varies by kind (service
//! time, whether it is a collection point) is looked up from the tag rather
//! than dispatched dynamically.

/// What stands at a named point of the map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationKind {
    /// The depot.  Unique per graph; start and end of every tour.
    Warehouse,
    /// Single household: 2 minutes to collect.
    House,
    /// Apartment building: 5 minutes to collect.
    Building,
    /// Street crossing.  Used as a waypoint, never a collection target.
    #[default]
    Intersection,
}

impl LocationKind {
    /// Minutes spent at the location when its waste is collected.
    #[inline]
    pub fn service_minutes(self) -> f64 {
        match self {
            LocationKind::House    => 2.0,
            LocationKind::Building => 5.0,
            LocationKind::Warehouse | LocationKind::Intersection => 0.0,
        }
    }

    /// `true` for kinds whose waste is collected (houses and buildings).
    #[inline]
    pub fn is_collection_point(self) -> bool {
        matches!(self, LocationKind::House | LocationKind::Building)
    }

    /// Intersections touched by two or more streets are split into one
    /// routing node per street.
    #[inline]
    pub fn is_splittable(self) -> bool {
        matches!(self, LocationKind::Intersection)
    }

    /// Infer the kind from a location name, as street lists name them:
    /// `Entrepot …`, `Maison …`, `Immeuble …`, `Carrefour …` (English prefixes
    /// are accepted as well).  Unknown prefixes are intersections.
    pub fn infer_from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| lower.starts_with(p));

        if starts(&["entrepot", "entrepôt", "warehouse", "depot"]) {
            LocationKind::Warehouse
        } else if starts(&["maison", "house"]) {
            LocationKind::House
        } else if starts(&["immeuble", "building"]) {
            LocationKind::Building
        } else {
            LocationKind::Intersection
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::Warehouse    => "warehouse",
            LocationKind::House        => "house",
            LocationKind::Building     => "building",
            LocationKind::Intersection => "intersection",
        }
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
