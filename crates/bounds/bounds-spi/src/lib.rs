//! Control-Limit Discovery Service Provider Interface
//!
//! Defines the oracle and control-chart contracts, the series and bound-table
//! data model, and the shared error type.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{ControlChart, Oracle, Perturbable};
pub use error::{BoundsError, Result};
pub use model::{
    median, BoundRecord, BoundTable, ChartData, ConsensusRecord, ConsensusTable, Direction,
    Metric, RatioSeries, Series, VariableKind, Verdict,
};
