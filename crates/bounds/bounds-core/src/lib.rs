//! Control-Limit Discovery Core
//!
//! Boundary search and bound discovery over black-box oracles, the p-chart
//! estimator, reference detectors and the detector ensemble.

pub mod detectors;
pub mod discovery;
pub mod ensemble;
pub mod search;
pub mod spc;
pub mod stats;

pub use detectors::*;
pub use discovery::{ratio_bounds, univariate_bounds, BoundDiscovery};
pub use ensemble::*;
pub use search::{BoundarySearch, Limit, PointBounds};
pub use spc::PChart;
