//! Routing error type.

use thiserror::Error;

use wr_core::CoreError;
use wr_network::NetworkError;

/// Errors produced by the router and the tour builders.
#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error("no location named {0:?}")]
    UnknownDestination(String),

    #[error("no route from {from} to {to}")]
    Unreachable { from: String, to: String },

    #[error("no stops requested")]
    EmptyRequest,

    #[error("{got} stops requested, at most {max} allowed")]
    TooManyStops { got: usize, max: usize },

    #[error("the city has no warehouse")]
    NoWarehouse,

    #[error("vehicle capacity must be positive, got {0}")]
    InvalidCapacity(f64),

    #[error("invalid load {load} for {stop}")]
    InvalidLoad { stop: String, load: f64 },

    #[error(transparent)]
    InvalidHour(#[from] CoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type RouteResult<T> = Result<T, RouteError>;
