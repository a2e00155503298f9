//! Data models for control-limit discovery.

mod bound_table;
mod consensus;
mod direction;
mod metric;
mod ratio_series;
mod series;
mod verdict;

pub use bound_table::{BoundRecord, BoundTable};
pub use consensus::{ConsensusRecord, ConsensusTable};
pub use direction::Direction;
pub use metric::{ChartData, Metric, VariableKind};
pub use ratio_series::RatioSeries;
pub use series::{median, Series};
pub use verdict::Verdict;
