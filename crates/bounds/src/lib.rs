//! # bounds
//!
//! Control-limit discovery for black-box anomaly detectors.
//! Turns discrete normal/anomalous verdicts into per-point upper and lower
//! limits, and combines several detectors into a weighted consensus.

pub use bounds_facade::*;
