//! Reference detectors usable as boundary-search oracles.
//!
//! Univariate detectors implement `Oracle<Series>` and can be lifted onto a
//! ratio metric with [`OnRatio`]. The two-field detectors implement
//! `Oracle<RatioSeries>` directly.

mod min_cluster;
mod on_ratio;
mod pca;
mod quantile;
mod regression;
mod seasonal;

pub use min_cluster::MinClusterDetector;
pub use on_ratio::OnRatio;
pub use pca::PcaDetector;
pub use quantile::QuantileDetector;
pub use regression::RegressionDetector;
pub use seasonal::{detect_period, SeasonalDetector};
