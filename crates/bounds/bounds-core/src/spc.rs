//! Statistical process control charts.

use bounds_api::PChartConfig;
use bounds_spi::{
    BoundRecord, BoundTable, BoundsError, ChartData, ControlChart, RatioSeries, Result, Verdict,
};
use serde::{Deserialize, Serialize};

use crate::stats::mean;

/// Series and verdicts a chart has classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Classified {
    series: RatioSeries,
    verdicts: Vec<Verdict>,
}

/// p-chart for a proportion metric
///
/// The centre line `p̄` is the mean baseline ratio. Each point gets its own
/// limits from its denominator: `p̄ ± σ * sqrt(p̄ (1 - p̄) / n_i)`.
///
/// @algorithm PChart
/// @category ControlChart
/// @since 0.3.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PChart {
    sigma: f64,
    pbar: Option<f64>,
    baseline: Option<Classified>,
    predicted: Option<Classified>,
}

impl PChart {
    pub fn new() -> Self {
        Self {
            sigma: 3.0,
            pbar: None,
            baseline: None,
            predicted: None,
        }
    }

    pub fn from_config(config: &PChartConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sigma: config.sigma,
            ..Self::new()
        })
    }

    /// The fitted centre line.
    pub fn pbar(&self) -> Option<f64> {
        self.pbar
    }

    /// `(lower, upper)` control limits for a point with denominator `n`.
    pub fn limits(&self, n: f64) -> Result<(f64, f64)> {
        let pbar = self.pbar.ok_or(BoundsError::NotFitted)?;
        let se = (pbar * (1.0 - pbar) / n).sqrt();
        Ok((pbar - self.sigma * se, pbar + self.sigma * se))
    }

    fn classify(&self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        series
            .ratios()
            .iter()
            .zip(series.denominator())
            .map(|(&ratio, &n)| {
                let (lower, upper) = self.limits(n)?;
                Ok(if ratio.is_nan() || upper.is_nan() {
                    Verdict::Undefined
                } else {
                    Verdict::from(ratio > upper || ratio < lower)
                })
            })
            .collect()
    }
}

impl Default for PChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlChart for PChart {
    fn fit(&mut self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        if series.is_empty() {
            return Err(BoundsError::InvalidData(
                "p-chart needs at least one point".to_string(),
            ));
        }
        check_denominators(series)?;

        self.pbar = Some(mean(&series.ratios()));
        let verdicts = self.classify(series)?;
        self.baseline = Some(Classified {
            series: series.clone(),
            verdicts: verdicts.clone(),
        });
        self.predicted = None;
        Ok(verdicts)
    }

    fn predict(&mut self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        if self.pbar.is_none() {
            return Err(BoundsError::NotFitted);
        }
        check_denominators(series)?;

        let verdicts = self.classify(series)?;
        self.predicted = Some(Classified {
            series: series.clone(),
            verdicts: verdicts.clone(),
        });
        Ok(verdicts)
    }

    fn bounds(&self, data: ChartData) -> Result<BoundTable> {
        let classified = match data {
            ChartData::Baseline => self.baseline.as_ref(),
            ChartData::Predicted => self.predicted.as_ref(),
        }
        .ok_or(BoundsError::NotFitted)?;

        let series = &classified.series;
        if classified.verdicts.len() != series.len() {
            return Err(BoundsError::InvalidData(format!(
                "{} verdicts for {} points",
                classified.verdicts.len(),
                series.len()
            )));
        }
        let records = series
            .ratios()
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let (lower, upper) = self.limits(series.denominator()[i])?;
                Ok(BoundRecord {
                    timestamp: series.timestamps()[i],
                    value,
                    upper: Some(upper),
                    lower: Some(lower),
                    violation: classified.verdicts[i],
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BoundTable::new(records))
    }
}

fn check_denominators(series: &RatioSeries) -> Result<()> {
    if let Some(pos) = series.denominator().iter().position(|&d| d.is_nan() || d <= 0.0) {
        return Err(BoundsError::InvalidData(format!(
            "p-chart denominators must be positive (index {})",
            pos
        )));
    }
    Ok(())
}
