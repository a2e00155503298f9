//! Quantile-based anomaly detector

use bounds_api::QuantileConfig;
use bounds_spi::{BoundsError, Oracle, Result, Series, Verdict};
use serde::{Deserialize, Serialize};

use crate::stats::quantile;

/// Quantile anomaly detector
///
/// Learns the `low` and `high` empirical quantiles of the training values and
/// flags anything strictly outside them.
///
/// @algorithm Quantile
/// @category StatisticalDetector
/// @complexity O(n log n) fit, O(n) predict
/// @since 0.3.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantileDetector {
    high: f64,
    low: f64,
    upper: f64,
    lower: f64,
    fitted: bool,
}

impl QuantileDetector {
    /// Create a new quantile detector
    ///
    /// # Arguments
    ///
    /// * `high` - Upper quantile in `[0, 1]`
    /// * `low` - Lower quantile in `[0, 1]`, below `high`
    pub fn new(high: f64, low: f64) -> Result<Self> {
        Self::from_config(&QuantileConfig::new(high, low))
    }

    /// Create from configuration.
    pub fn from_config(config: &QuantileConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            high: config.high,
            low: config.low,
            upper: f64::NAN,
            lower: f64::NAN,
            fitted: false,
        })
    }

    /// Fitted upper threshold.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Fitted lower threshold.
    pub fn lower(&self) -> f64 {
        self.lower
    }
}

impl Default for QuantileDetector {
    fn default() -> Self {
        Self {
            high: 0.99,
            low: 0.01,
            upper: f64::NAN,
            lower: f64::NAN,
            fitted: false,
        }
    }
}

impl Oracle<Series> for QuantileDetector {
    fn fit(&mut self, series: &Series) -> Result<()> {
        let values: Vec<f64> = series
            .values()
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            return Err(BoundsError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        self.upper = quantile(&values, self.high);
        self.lower = quantile(&values, self.low);
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, series: &Series) -> Result<Vec<Verdict>> {
        if !self.fitted {
            return Err(BoundsError::NotFitted);
        }

        Ok(series
            .values()
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    Verdict::Undefined
                } else {
                    Verdict::from(v > self.upper || v < self.lower)
                }
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_quantiles() {
        assert!(matches!(
            QuantileDetector::new(0.1, 0.9),
            Err(BoundsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_predict_before_fit() {
        let detector = QuantileDetector::default();
        let series = Series::from_values(vec![1.0]);
        assert!(matches!(detector.predict(&series), Err(BoundsError::NotFitted)));
    }

    #[test]
    fn test_flags_spike() {
        let series = Series::from_values(vec![9.0, 10.0, 11.0, 10.0, 50.0]);
        let mut detector = QuantileDetector::new(0.95, 0.0).unwrap();
        let verdicts = detector.fit_predict(&series).unwrap();
        assert_eq!(
            verdicts,
            vec![
                Verdict::Normal,
                Verdict::Normal,
                Verdict::Normal,
                Verdict::Normal,
                Verdict::Anomalous
            ]
        );
        assert_eq!(detector.lower(), 9.0);
    }

    #[test]
    fn test_non_finite_is_undefined() {
        let mut detector = QuantileDetector::default();
        detector.fit(&Series::from_values(vec![1.0, 2.0, 3.0])).unwrap();
        let verdicts = detector
            .predict(&Series::from_values(vec![f64::NAN, f64::INFINITY]))
            .unwrap();
        assert_eq!(verdicts, vec![Verdict::Undefined, Verdict::Undefined]);
    }

    #[test]
    fn test_fit_needs_a_finite_value() {
        let mut detector = QuantileDetector::default();
        let result = detector.fit(&Series::from_values(vec![f64::NAN]));
        assert!(matches!(result, Err(BoundsError::InsufficientData { .. })));
    }
}
