//! Contract definitions for control-limit discovery.
//!
//! This module contains trait definitions that detectors and series must implement.

mod control_chart;
mod oracle;
mod perturbable;

pub use control_chart::ControlChart;
pub use oracle::Oracle;
pub use perturbable::Perturbable;
