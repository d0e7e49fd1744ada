//! `wr-core`: foundational types for the waste-route planner.
//!
//! This crate is a dependency of every other `wr-*` crate.  It has no `wr-*`
//! dependencies and few external ones (`rand`, `thiserror`, `log`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `ArcId`, `LocationId`, `StreetId`           |
//! | [`geo`]         | `Point`, `Turn`                                       |
//! | [`location`]    | `LocationKind` (service time / stop table)            |
//! | [`time`]        | `SimClock`, `TrafficBand`, incidents, closures        |
//! | [`rng`]         | `CityRng` (seedable)                                  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod location;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Point, Turn};
pub use ids::{ArcId, LocationId, NodeId, StreetId};
pub use location::LocationKind;
pub use rng::CityRng;
pub use time::{
    ClosureWindow, Hour, Incident, IncidentKind, SimClock, StreetStatus, TimeConstraints,
    TrafficBand, DEFAULT_DEPARTURE, FIRST_HOUR, LAST_HOUR,
};
