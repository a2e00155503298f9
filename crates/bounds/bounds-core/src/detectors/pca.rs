//! PCA reconstruction-error detector for ratio metrics

use bounds_api::PcaConfig;
use bounds_spi::{BoundsError, Oracle, RatioSeries, Result, Verdict};
use serde::{Deserialize, Serialize};

use crate::stats::{quantile, Scaler};

/// PCA anomaly detector
///
/// Standardises the `(numerator, denominator)` points, keeps the leading
/// principal component and scores each point by its distance to that axis.
/// With two fields only one component can be kept, so `k` is always 1.
/// Scores above `Q3 + c * IQR` of the training scores are anomalous.
///
/// @algorithm PCA
/// @category ReconstructionDetector
/// @since 0.3.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaDetector {
    c: f64,
    scaler: Option<Scaler>,
    component: [f64; 2],
    threshold: f64,
}

impl PcaDetector {
    pub fn new(k: usize, c: f64) -> Result<Self> {
        let config = PcaConfig {
            c,
            ..PcaConfig::new(k)
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &PcaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            c: config.c,
            scaler: None,
            component: [1.0, 0.0],
            threshold: f64::NAN,
        })
    }

    /// Unit vector of the leading principal component, in standardised space.
    pub fn component(&self) -> [f64; 2] {
        self.component
    }

    /// Reconstruction error above which a point is anomalous.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Distance between a standardised point and its projection on the component.
    fn error(&self, point: [f64; 2]) -> f64 {
        let [u, v] = self.component;
        (point[0] * v - point[1] * u).abs()
    }
}

impl Oracle<RatioSeries> for PcaDetector {
    fn fit(&mut self, series: &RatioSeries) -> Result<()> {
        let raw: Vec<[f64; 2]> = series
            .numerator()
            .iter()
            .zip(series.denominator())
            .map(|(&n, &d)| [n, d])
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .collect();

        if raw.len() < 2 {
            return Err(BoundsError::InsufficientData {
                required: 2,
                actual: raw.len(),
            });
        }

        let scaler = Scaler::fit(&raw);
        let points: Vec<[f64; 2]> = raw.iter().map(|&p| scaler.transform(p)).collect();
        self.component = leading_component(&points);
        self.scaler = Some(scaler);

        let errors: Vec<f64> = points.iter().map(|&p| self.error(p)).collect();
        let q1 = quantile(&errors, 0.25);
        let q3 = quantile(&errors, 0.75);
        self.threshold = q3 + self.c * (q3 - q1);
        Ok(())
    }

    fn predict(&self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        let scaler = self.scaler.ok_or(BoundsError::NotFitted)?;

        Ok(series
            .numerator()
            .iter()
            .zip(series.denominator())
            .map(|(&n, &d)| {
                if !(n.is_finite() && d.is_finite()) {
                    Verdict::Undefined
                } else {
                    Verdict::from(self.error(scaler.transform([n, d])) > self.threshold)
                }
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.scaler.is_some()
    }
}

/// Eigenvector of the largest eigenvalue of the points' 2x2 covariance.
fn leading_component(points: &[[f64; 2]]) -> [f64; 2] {
    let n = points.len() as f64;
    let sxx = points.iter().map(|p| p[0] * p[0]).sum::<f64>() / n;
    let syy = points.iter().map(|p| p[1] * p[1]).sum::<f64>() / n;
    let sxy = points.iter().map(|p| p[0] * p[1]).sum::<f64>() / n;

    if sxy.abs() < f64::EPSILON {
        return if sxx >= syy { [1.0, 0.0] } else { [0.0, 1.0] };
    }

    let half_trace = (sxx + syy) / 2.0;
    let lambda = half_trace + (((sxx - syy) / 2.0).powi(2) + sxy * sxy).sqrt();
    let (u, v) = (lambda - syy, sxy);
    let norm = (u * u + v * v).sqrt();
    [u / norm, v / norm]
}
