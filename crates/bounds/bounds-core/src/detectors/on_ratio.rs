//! Univariate detectors over ratio metrics.

use bounds_spi::{Oracle, RatioSeries, Result, Series, Verdict};
use serde::{Deserialize, Serialize};

/// Runs an `Oracle<Series>` on the plain ratios of a ratio series.
///
/// The boundary search still perturbs the numerator, so limits come out as
/// ratios of the held denominator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnRatio<O> {
    inner: O,
}

impl<O> OnRatio<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O> Oracle<RatioSeries> for OnRatio<O>
where
    O: Oracle<Series>,
{
    fn fit(&mut self, series: &RatioSeries) -> Result<()> {
        self.inner.fit(&series.to_ratio_series())
    }

    fn predict(&self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        self.inner.predict(&series.to_ratio_series())
    }

    fn is_fitted(&self) -> bool {
        self.inner.is_fitted()
    }
}
