//! Control-limit discovery error types.

use thiserror::Error;

use crate::model::{Direction, VariableKind};

/// Control-limit discovery errors.
#[derive(Debug, Error)]
pub enum BoundsError {
    #[error("Insufficient data: required {required}, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Detector not fitted: call fit() before predict()")]
    NotFitted,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Method {method} does not support {kind} metrics")]
    UnsupportedVariantCombination { method: String, kind: VariableKind },

    #[error("Invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("Boundary search exhausted at index {index} ({direction}) after {iterations} steps")]
    BoundarySearchExhausted {
        index: usize,
        direction: Direction,
        iterations: usize,
    },

    #[error("No finite bound at index {index} ({direction})")]
    NoFiniteBound { index: usize, direction: Direction },

    #[error("Unrecognized method: {0}")]
    UnrecognizedMethod(String),

    #[error("Ensemble has no registered methods")]
    EmptyEnsemble,

    #[error("Registration {id} has no bound table for the current data")]
    MissingBounds { id: usize },

    #[error("Bound table {table} diverges from table 0 at row {row}")]
    MisalignedTables { table: usize, row: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for control-limit discovery operations.
pub type Result<T> = std::result::Result<T, BoundsError>;
