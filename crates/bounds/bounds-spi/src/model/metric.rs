//! Metric variants an ensemble can monitor.

use serde::{Deserialize, Serialize};

use super::ratio_series::RatioSeries;
use super::series::{median, Series};

/// The variable type of a monitored metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    Univariate,
    Ratio,
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKind::Univariate => write!(f, "univariate"),
            VariableKind::Ratio => write!(f, "ratio"),
        }
    }
}

/// A monitored metric: a single value or a numerator/denominator pair per timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Metric {
    Univariate(Series),
    Ratio(RatioSeries),
}

impl Metric {
    pub fn kind(&self) -> VariableKind {
        match self {
            Metric::Univariate(_) => VariableKind::Univariate,
            Metric::Ratio(_) => VariableKind::Ratio,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Metric::Univariate(series) => series.len(),
            Metric::Ratio(series) => series.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn timestamps(&self) -> &[i64] {
        match self {
            Metric::Univariate(series) => series.timestamps(),
            Metric::Ratio(series) => series.timestamps(),
        }
    }

    /// Median of the values, or of the zero-safe ratios for a ratio metric.
    pub fn baseline_median(&self) -> f64 {
        match self {
            Metric::Univariate(series) => series.median(),
            Metric::Ratio(series) => median(&series.safe_ratios()),
        }
    }

    /// The monitored quantity as a univariate series.
    pub fn monitored(&self) -> Series {
        match self {
            Metric::Univariate(series) => series.clone(),
            Metric::Ratio(series) => series.to_ratio_series(),
        }
    }
}

impl From<Series> for Metric {
    fn from(series: Series) -> Self {
        Metric::Univariate(series)
    }
}

impl From<RatioSeries> for Metric {
    fn from(series: RatioSeries) -> Self {
        Metric::Ratio(series)
    }
}

/// Which data a control chart reports limits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartData {
    /// The series the chart was fitted on.
    Baseline,
    /// The series most recently passed to `predict`.
    Predicted,
}
