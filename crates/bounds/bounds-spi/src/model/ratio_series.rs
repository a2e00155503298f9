//! Ratio (numerator / denominator) time series.

use serde::{Deserialize, Serialize};

use super::series::{median, validate_timestamps, Series};
use crate::contract::Perturbable;
use crate::error::{BoundsError, Result};

/// A two-field time series whose monitored quantity is `numerator / denominator`.
///
/// Perturbation moves the numerator and holds the denominator fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RatioSeriesFields")]
pub struct RatioSeries {
    timestamps: Vec<i64>,
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`RatioSeries::new`].
#[derive(Deserialize)]
struct RatioSeriesFields {
    timestamps: Vec<i64>,
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl TryFrom<RatioSeriesFields> for RatioSeries {
    type Error = BoundsError;

    fn try_from(fields: RatioSeriesFields) -> Result<Self> {
        RatioSeries::new(fields.timestamps, fields.numerator, fields.denominator)
    }
}

impl RatioSeries {
    /// Create a new ratio series.
    pub fn new(timestamps: Vec<i64>, numerator: Vec<f64>, denominator: Vec<f64>) -> Result<Self> {
        if timestamps.len() != numerator.len() || numerator.len() != denominator.len() {
            return Err(BoundsError::InvalidData(format!(
                "field lengths differ: {} timestamps, {} numerators, {} denominators",
                timestamps.len(),
                numerator.len(),
                denominator.len()
            )));
        }
        validate_timestamps(&timestamps)?;
        Ok(Self {
            timestamps,
            numerator,
            denominator,
        })
    }

    /// Create a ratio series indexed `0..n`.
    pub fn from_fields(numerator: Vec<f64>, denominator: Vec<f64>) -> Result<Self> {
        let timestamps = (0..numerator.len() as i64).collect();
        Self::new(timestamps, numerator, denominator)
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    pub fn len(&self) -> usize {
        self.numerator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numerator.is_empty()
    }

    /// Plain ratios. A zero denominator yields an infinite or NaN ratio.
    pub fn ratios(&self) -> Vec<f64> {
        self.numerator
            .iter()
            .zip(&self.denominator)
            .map(|(n, d)| n / d)
            .collect()
    }

    /// Ratios where a zero denominator contributes a ratio of zero.
    pub fn safe_ratios(&self) -> Vec<f64> {
        self.numerator
            .iter()
            .zip(&self.denominator)
            .map(|(&n, &d)| if d == 0.0 { 0.0 } else { n / d })
            .collect()
    }

    /// The plain ratios as a univariate series on the same timestamps.
    pub fn to_ratio_series(&self) -> Series {
        Series::from_parts(self.timestamps.clone(), self.ratios())
    }
}

impl Perturbable for RatioSeries {
    fn len(&self) -> usize {
        self.numerator.len()
    }

    fn timestamp(&self, index: usize) -> i64 {
        self.timestamps[index]
    }

    fn probe(&self, index: usize) -> f64 {
        self.numerator[index]
    }

    fn set_probe(&mut self, index: usize, probe: f64) {
        self.numerator[index] = probe;
    }

    /// The numerator that puts this point on the median ratio for its own denominator.
    fn baseline_probe(&self, index: usize) -> f64 {
        median(&self.numerator) * self.denominator[index] / median(&self.denominator)
    }

    fn observe(&self, index: usize, probe: f64) -> f64 {
        probe / self.denominator[index]
    }
}
