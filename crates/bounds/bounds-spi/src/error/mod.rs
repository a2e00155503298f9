//! Error types for control-limit discovery.

mod bounds_error;

pub use bounds_error::{BoundsError, Result};
