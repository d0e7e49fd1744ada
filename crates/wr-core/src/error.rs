//! Core error type.
//!
//! Downstream crates wrap `CoreError` as one variant of their own enums via
//! `#[from]`.

use thiserror::Error;

use crate::Hour;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("hour {0} is outside the working day")]
    InvalidHour(Hour),

    #[error("closure window {from}h-{until}h is empty")]
    InvalidWindow { from: Hour, until: Hour },
}

/// Shorthand result type for `wr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
