//! `wr-network`: city street graph, orientation rules and arc costs.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`graph`]       | `CityGraph` (location arena, sub-nodes, turn arcs, R-tree) |
//! | [`orientation`] | `OrientationPolicy`, hypotheses, `RequiredArcs`          |
//! | [`city`]        | `City`: graph + policy + time model, the arc-cost oracle |
//! | [`sample`]      | `sample_city`, a small realistic fixture                 |
//! | [`error`]       | `NetworkError`, `NetworkResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod city;
pub mod error;
pub mod graph;
pub mod orientation;
pub mod sample;


pub use city::City;
pub use error::{NetworkError, NetworkResult};
pub use graph::{CityGraph, Location};
pub use orientation::{
    OrientationHypothesis, OrientationPolicy, OrientationStats, RequiredArcs, RequiredUnit,
    StreetOrientation,
};
pub use sample::sample_city;
