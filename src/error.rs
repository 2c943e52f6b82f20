//! Error types for the simulation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BioSimError {
    #[error("map format error: {0}")]
    MapFormat(String),

    #[error("invalid location ({row}, {col}): {reason}")]
    InvalidLocation { row: i64, col: i64, reason: String },

    #[error("invalid animal: {0}")]
    InvalidAnimal(String),

    #[error("parameter error: {0}")]
    Parameter(String),

    /// Internal state that no valid sequence of operations can produce.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, BioSimError>;
