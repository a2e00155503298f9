//! Control-Limit Discovery API
//!
//! Configuration types for boundary search, the reference detectors and the
//! p-chart. Defaults follow the conventional settings for each method.

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use bounds_spi::{BoundsError, Result};

fn invalid(name: &str, reason: &str) -> BoundsError {
    BoundsError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

// ============================================================================
// Search Configuration
// ============================================================================

/// Boundary search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Perturbation step. Limits are accurate to within one step.
    pub delta: f64,
    /// Maximum steps per direction before the search is reported as exhausted.
    pub max_iterations: usize,
}

impl SearchConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

    pub fn new(delta: f64, max_iterations: usize) -> Result<Self> {
        let config = Self {
            delta,
            max_iterations,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults for searching a value directly (`delta = 1e-4`).
    pub fn univariate() -> Self {
        Self {
            delta: 1e-4,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Defaults for searching a ratio's numerator (`delta = 1`).
    pub fn ratio() -> Self {
        Self {
            delta: 1.0,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(invalid("delta", "must be positive and finite"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::univariate()
    }
}

// ============================================================================
// Detector Configuration
// ============================================================================

/// Quantile detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileConfig {
    /// Upper quantile; values above it are anomalous (default: 0.99).
    pub high: f64,
    /// Lower quantile; values below it are anomalous (default: 0.01).
    pub low: f64,
    pub search: SearchConfig,
}

impl Default for QuantileConfig {
    fn default() -> Self {
        Self {
            high: 0.99,
            low: 0.01,
            search: SearchConfig::univariate(),
        }
    }
}

impl QuantileConfig {
    pub fn new(high: f64, low: f64) -> Self {
        Self {
            high,
            low,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.high) {
            return Err(invalid("high", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.low) {
            return Err(invalid("low", "must be in [0, 1]"));
        }
        if self.low >= self.high {
            return Err(invalid("low", "must be below high"));
        }
        self.search.validate()
    }
}

/// Which residual signs a detector treats as anomalous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Both,
    Positive,
    Negative,
}

impl Side {
    pub fn checks_positive(self) -> bool {
        matches!(self, Side::Both | Side::Positive)
    }

    pub fn checks_negative(self) -> bool {
        matches!(self, Side::Both | Side::Negative)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Both => write!(f, "both"),
            Side::Positive => write!(f, "positive"),
            Side::Negative => write!(f, "negative"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = BoundsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "both" => Ok(Side::Both),
            "positive" => Ok(Side::Positive),
            "negative" => Ok(Side::Negative),
            _ => Err(invalid("side", "expected one of: both, positive, negative")),
        }
    }
}

/// Seasonal detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalConfig {
    /// Interquartile-range factor for the residual bounds (default: 3.0).
    pub c: f64,
    pub side: Side,
    /// Seasonal period; detected by autocorrelation when `None`.
    pub period: Option<usize>,
    /// Largest period considered by detection (default: 30).
    pub max_period: usize,
    pub search: SearchConfig,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            c: 3.0,
            side: Side::Both,
            period: None,
            max_period: 30,
            search: SearchConfig::univariate(),
        }
    }
}

impl SeasonalConfig {
    pub fn new(c: f64, side: Side) -> Self {
        Self {
            c,
            side,
            ..Self::default()
        }
    }

    pub fn with_period(mut self, period: usize) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(invalid("c", "must be positive"));
        }
        if matches!(self.period, Some(p) if p < 2) {
            return Err(invalid("period", "must be at least 2"));
        }
        if self.max_period < 2 {
            return Err(invalid("max_period", "must be at least 2"));
        }
        self.search.validate()
    }
}

/// Minimum-cluster (k-means) detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinClusterConfig {
    /// Number of clusters (default: 3).
    pub n_clusters: usize,
    /// Lloyd iterations cap (default: 300).
    pub max_iterations: usize,
    pub search: SearchConfig,
}

impl Default for MinClusterConfig {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            max_iterations: 300,
            search: SearchConfig::ratio(),
        }
    }
}

impl MinClusterConfig {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_clusters < 2 {
            return Err(invalid("n_clusters", "must be at least 2"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        self.search.validate()
    }
}

/// Regression detector configuration. The numerator is regressed on the denominator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionConfig {
    /// Interquartile-range factor for the residual bounds (default: 3.0).
    pub c: f64,
    pub search: SearchConfig,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            c: 3.0,
            search: SearchConfig::ratio(),
        }
    }
}

impl RegressionConfig {
    pub fn new(c: f64) -> Self {
        Self {
            c,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(invalid("c", "must be positive"));
        }
        self.search.validate()
    }
}

/// PCA reconstruction-error detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaConfig {
    /// Principal components kept; must be below the field count (default: 1).
    pub k: usize,
    /// Interquartile-range factor for the error bound (default: 5.0).
    pub c: f64,
    pub search: SearchConfig,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            k: 1,
            c: 5.0,
            search: SearchConfig::ratio(),
        }
    }
}

impl PcaConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 || self.k >= 2 {
            return Err(invalid("k", "must be below the number of fields (2)"));
        }
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(invalid("c", "must be positive"));
        }
        self.search.validate()
    }
}

// ============================================================================
// Control Chart Configuration
// ============================================================================

/// p-chart configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PChartConfig {
    /// Standard errors between the centre line and each limit (default: 3.0).
    pub sigma: f64,
}

impl Default for PChartConfig {
    fn default() -> Self {
        Self { sigma: 3.0 }
    }
}

impl PChartConfig {
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(invalid("sigma", "must be positive"));
        }
        Ok(())
    }
}
