//! `wr-routing`: constraint-aware shortest paths and collection tours.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`router`]    | `Router` trait, `DijkstraRouter`, `Route`, `SearchTree`    |
//! | [`itinerary`] | `Itinerary`, `Leg`, `LegRole`, duration accounting         |
//! | [`coverage`]  | `full_coverage` (greedy street coverage)                   |
//! | [`pickup`]    | `bounded_pickup`, `nearest_neighbor_circuit`               |
//! | [`mst`]       | `mst_circuit`, `mst_circuit_capacity_split`                |
//! | [`planner`]   | `Planner` query facade                                     |
//! | [`config`]    | `PlannerConfig`                                            |
//! | [`error`]     | `RouteError`, `RouteResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod config;
pub mod coverage;
pub mod error;
pub mod itinerary;
pub mod mst;
pub mod pickup;
pub mod planner;
pub mod router;

#[cfg(test)]
mod tests;

pub use config::PlannerConfig;
pub use coverage::full_coverage;
pub use error::{RouteError, RouteResult};
pub use itinerary::{Itinerary, Leg, LegRole};
pub use mst::{mst_circuit, mst_circuit_capacity_split};
pub use pickup::{bounded_pickup, nearest_neighbor_circuit, MAX_PICKUP_STOPS};
pub use planner::Planner;
pub use router::{Collect, DijkstraRouter, Route, Router, SearchTree};
