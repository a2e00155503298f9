//! Seasonal residual detector

use bounds_api::{SeasonalConfig, Side};
use bounds_spi::{BoundsError, Oracle, Result, Series, Verdict};
use serde::{Deserialize, Serialize};

use crate::stats::{mean, IqrBand};

/// Minimum autocorrelation for a lag to count as a seasonal period.
const ACF_THRESHOLD: f64 = 0.3;

/// Seasonal anomaly detector
///
/// Removes a per-phase mean pattern from the series and applies an IQR band
/// to what is left. The phase of a point is its position modulo the period.
///
/// @algorithm SeasonalDecomposition
/// @category StatisticalDetector
/// @since 0.3.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalDetector {
    c: f64,
    side: Side,
    period: Option<usize>,
    max_period: usize,
    pattern: Vec<f64>,
    band: Option<IqrBand>,
}

impl SeasonalDetector {
    pub fn new(c: f64, side: Side) -> Result<Self> {
        Self::from_config(&SeasonalConfig::new(c, side))
    }

    pub fn from_config(config: &SeasonalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            c: config.c,
            side: config.side,
            period: config.period,
            max_period: config.max_period,
            pattern: Vec::new(),
            band: None,
        })
    }

    /// The fitted period, or the configured one before fitting.
    pub fn period(&self) -> Option<usize> {
        if self.pattern.is_empty() {
            self.period
        } else {
            Some(self.pattern.len())
        }
    }

    /// Mean value per phase.
    pub fn pattern(&self) -> &[f64] {
        &self.pattern
    }

    fn residual(&self, position: usize, value: f64) -> f64 {
        value - self.pattern[position % self.pattern.len()]
    }
}

impl Oracle<Series> for SeasonalDetector {
    fn fit(&mut self, series: &Series) -> Result<()> {
        let values = series.values();
        let period = match self.period {
            Some(period) => period,
            None => {
                let max_period = self.max_period.min(values.len() / 2);
                detect_period(values, max_period).ok_or_else(|| {
                    BoundsError::InvalidData("no seasonal period detected".to_string())
                })?
            }
        };

        if values.len() < period * 2 {
            return Err(BoundsError::InsufficientData {
                required: period * 2,
                actual: values.len(),
            });
        }

        let pattern: Vec<f64> = (0..period)
            .map(|phase| {
                let phase_values: Vec<f64> = values
                    .iter()
                    .skip(phase)
                    .step_by(period)
                    .copied()
                    .filter(|v| v.is_finite())
                    .collect();
                mean(&phase_values)
            })
            .collect();

        if pattern.iter().any(|m| m.is_nan()) {
            return Err(BoundsError::InvalidData(
                "a seasonal phase has no finite values".to_string(),
            ));
        }

        self.pattern = pattern;
        let residuals: Vec<f64> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| self.residual(i, v))
            .collect();
        self.band = Some(IqrBand::fit(&residuals, self.c));
        Ok(())
    }

    fn predict(&self, series: &Series) -> Result<Vec<Verdict>> {
        let band = self.band.ok_or(BoundsError::NotFitted)?;
        if self.pattern.is_empty() {
            return Err(BoundsError::InvalidData(
                "seasonal pattern is empty".to_string(),
            ));
        }

        Ok(series
            .values()
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if !v.is_finite() {
                    return Verdict::Undefined;
                }
                let residual = self.residual(i, v);
                Verdict::from(
                    (self.side.checks_positive() && band.above(residual))
                        || (self.side.checks_negative() && band.below(residual)),
                )
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.band.is_some()
    }
}

/// Detect the seasonal period by autocorrelation.
///
/// Returns the lag in `2..=max_period` with the strongest autocorrelation
/// above the significance threshold.
pub fn detect_period(data: &[f64], max_period: usize) -> Option<usize> {
    let n = data.len();
    if max_period < 2 || n < max_period * 2 {
        return None;
    }

    let mean: f64 = data.iter().sum::<f64>() / n as f64;
    let var: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    if var == 0.0 || !var.is_finite() {
        return None;
    }

    let mut best_period = 0;
    let mut best_acf = 0.0;

    for lag in 2..=max_period {
        let acf: f64 = data
            .iter()
            .take(n - lag)
            .zip(data.iter().skip(lag))
            .map(|(a, b)| (a - mean) * (b - mean))
            .sum::<f64>()
            / var;

        if acf > best_acf && acf > ACF_THRESHOLD {
            best_acf = acf;
            best_period = lag;
        }
    }

    (best_period > 0).then_some(best_period)
}
