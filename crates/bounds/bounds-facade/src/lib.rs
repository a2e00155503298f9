//! Control-Limit Discovery Facade
//!
//! Unified re-exports for control-limit discovery.
//!
//! This facade provides a single entry point to:
//! - `Oracle` / `ControlChart` contracts, the series and table model, and `BoundsError` from SPI
//! - Configuration types from API
//! - Bound discovery, detectors, the p-chart and the ensemble from Core

// Re-export everything from SPI
pub use bounds_spi::*;

// Re-export everything from API
pub use bounds_api::*;

// Re-export everything from Core
pub use bounds_core::*;

/// Common imports for building and querying an ensemble.
pub mod prelude {
    pub use bounds_api::{
        MinClusterConfig, PChartConfig, PcaConfig, QuantileConfig, RegressionConfig,
        SearchConfig, SeasonalConfig, Side,
    };
    pub use bounds_core::{
        ratio_bounds, univariate_bounds, BoundDiscovery, Ensemble, FittedMethod, MethodOutcome,
        RunMode,
    };
    pub use bounds_spi::{
        BoundTable, BoundsError, ConsensusTable, Metric, Oracle, RatioSeries, Result, Series,
        Verdict,
    };
}
