//! Univariate time series.

use serde::{Deserialize, Serialize};

use crate::contract::Perturbable;
use crate::error::{BoundsError, Result};

/// A univariate time series with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesFields")]
pub struct Series {
    timestamps: Vec<i64>,
    values: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`Series::new`].
#[derive(Deserialize)]
struct SeriesFields {
    timestamps: Vec<i64>,
    values: Vec<f64>,
}

impl TryFrom<SeriesFields> for Series {
    type Error = BoundsError;

    fn try_from(fields: SeriesFields) -> Result<Self> {
        Series::new(fields.timestamps, fields.values)
    }
}

impl Series {
    /// Create a new series.
    ///
    /// Fails when the lengths differ or the timestamps are not strictly increasing.
    pub fn new(timestamps: Vec<i64>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(BoundsError::InvalidData(format!(
                "{} timestamps for {} values",
                timestamps.len(),
                values.len()
            )));
        }
        validate_timestamps(&timestamps)?;
        Ok(Self { timestamps, values })
    }

    /// Create a series indexed `0..n`.
    pub fn from_values(values: Vec<f64>) -> Self {
        let timestamps = (0..values.len() as i64).collect();
        Self { timestamps, values }
    }

    /// Timestamps already validated by another series.
    pub(crate) fn from_parts(timestamps: Vec<i64>, values: Vec<f64>) -> Self {
        Self { timestamps, values }
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Median of the values, ignoring NaN.
    pub fn median(&self) -> f64 {
        median(&self.values)
    }
}

impl Perturbable for Series {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn timestamp(&self, index: usize) -> i64 {
        self.timestamps[index]
    }

    fn probe(&self, index: usize) -> f64 {
        self.values[index]
    }

    fn set_probe(&mut self, index: usize, probe: f64) {
        self.values[index] = probe;
    }

    fn baseline_probe(&self, _index: usize) -> f64 {
        self.median()
    }

    fn observe(&self, _index: usize, probe: f64) -> f64 {
        probe
    }
}

/// Median of a slice, ignoring NaN. Returns NaN for an empty input.
pub fn median(data: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub(crate) fn validate_timestamps(timestamps: &[i64]) -> Result<()> {
    if let Some(pos) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
        return Err(BoundsError::InvalidData(format!(
            "timestamps must be strictly increasing (index {})",
            pos + 1
        )));
    }
    Ok(())
}
