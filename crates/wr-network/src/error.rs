//! Network-construction error type.

use thiserror::Error;

use wr_core::CoreError;

/// Errors produced while building or configuring a city.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("a warehouse already exists ({existing}); cannot add {name}")]
    DuplicateWarehouse { existing: String, name: String },

    #[error("invalid duration {duration} on {street}")]
    InvalidDuration { street: String, duration: f64 },

    #[error("unknown location {0:?}")]
    UnknownLocation(String),

    #[error("one-way route for {0} needs at least two locations")]
    InvalidRoute(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
