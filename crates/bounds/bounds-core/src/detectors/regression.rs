//! Regression residual detector for ratio metrics

use bounds_api::RegressionConfig;
use bounds_spi::{BoundsError, Oracle, RatioSeries, Result, Verdict};
use serde::{Deserialize, Serialize};

use crate::stats::IqrBand;

/// Regression anomaly detector
///
/// Fits `numerator = intercept + slope * denominator` by ordinary least
/// squares and flags points whose residual falls outside the IQR band of the
/// training residuals. A constant denominator degenerates to the mean model.
///
/// @algorithm OLSResidual
/// @category RegressionDetector
/// @since 0.3.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionDetector {
    c: f64,
    intercept: f64,
    slope: f64,
    band: Option<IqrBand>,
}

impl RegressionDetector {
    pub fn new(c: f64) -> Result<Self> {
        Self::from_config(&RegressionConfig::new(c))
    }

    pub fn from_config(config: &RegressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            c: config.c,
            intercept: 0.0,
            slope: 0.0,
            band: None,
        })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    fn residual(&self, numerator: f64, denominator: f64) -> f64 {
        numerator - (self.intercept + self.slope * denominator)
    }
}

impl Oracle<RatioSeries> for RegressionDetector {
    fn fit(&mut self, series: &RatioSeries) -> Result<()> {
        let pairs: Vec<(f64, f64)> = series
            .denominator()
            .iter()
            .zip(series.numerator())
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();

        if pairs.len() < 2 {
            return Err(BoundsError::InsufficientData {
                required: 2,
                actual: pairs.len(),
            });
        }

        let n = pairs.len() as f64;
        let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (x, y) in &pairs {
            let x_diff = x - x_mean;
            numerator += x_diff * (y - y_mean);
            denominator += x_diff * x_diff;
        }

        self.slope = if denominator.abs() < f64::EPSILON {
            0.0
        } else {
            numerator / denominator
        };
        self.intercept = y_mean - self.slope * x_mean;

        let residuals: Vec<f64> = pairs.iter().map(|&(x, y)| self.residual(y, x)).collect();
        self.band = Some(IqrBand::fit(&residuals, self.c));
        Ok(())
    }

    fn predict(&self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        let band = self.band.ok_or(BoundsError::NotFitted)?;

        Ok(series
            .numerator()
            .iter()
            .zip(series.denominator())
            .map(|(&num, &den)| {
                if !(num.is_finite() && den.is_finite()) {
                    return Verdict::Undefined;
                }
                let residual = self.residual(num, den);
                Verdict::from(band.above(residual) || band.below(residual))
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.band.is_some()
    }
}
