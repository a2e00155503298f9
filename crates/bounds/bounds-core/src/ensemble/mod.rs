//! Detector ensemble: fitted methods, their bound tables and their consensus.
//!
//! Each method entry point fits a detector on the ensemble's metric, discovers
//! its bound table and either returns the table (`RunMode::Preview`) or
//! registers the fitted method (`RunMode::Register`). Registered methods can
//! be combined into a weighted consensus and replayed on new data without
//! refitting.

mod combine;
mod method;
mod registry;
mod replay;

pub use combine::{combine_tables, validate_weights, WEIGHT_TOLERANCE};
pub use method::{FittedMethod, MethodOutcome, RunMode};
pub use registry::{Registration, RegistrationId};
pub use replay::{ReplayReport, SkippedMethod};

use bounds_api::{
    MinClusterConfig, PChartConfig, PcaConfig, QuantileConfig, RegressionConfig, SearchConfig,
    SeasonalConfig,
};
use bounds_spi::{
    BoundTable, BoundsError, ChartData, ConsensusTable, ControlChart, Metric, Oracle, RatioSeries,
    Result, Series,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detectors::{
    MinClusterDetector, PcaDetector, QuantileDetector, RegressionDetector, SeasonalDetector,
};
use crate::discovery::BoundDiscovery;
use crate::spc::PChart;

use method::require_ratio;

/// An ordered set of fitted methods over one canonical metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ensemble {
    metric: Metric,
    median: f64,
    registrations: Vec<Registration>,
}

impl Ensemble {
    /// Create an empty ensemble. The baseline median is fixed here.
    pub fn new(metric: impl Into<Metric>) -> Self {
        let metric = metric.into();
        let median = metric.baseline_median();
        Self {
            metric,
            median,
            registrations: Vec::new(),
        }
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Baseline median reported in every consensus row.
    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn get(&self, id: RegistrationId) -> Option<&Registration> {
        self.registrations.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Append a fitted method and its table.
    pub fn register(&mut self, method: FittedMethod, bounds: BoundTable) -> RegistrationId {
        let id = RegistrationId::new(self.registrations.len());
        info!(%id, method = method.name(), points = bounds.len(), "method registered");
        self.registrations.push(Registration::new(id, method, bounds));
        id
    }

    /// p-chart on a ratio metric.
    pub fn spc(&mut self, config: &PChartConfig, mode: RunMode) -> Result<MethodOutcome> {
        let series = require_ratio("spc", &self.metric)?;
        let mut chart = PChart::from_config(config)?;
        chart.fit(series)?;
        let bounds = chart.bounds(ChartData::Baseline)?;
        Ok(self.finish(FittedMethod::Spc { chart }, bounds, mode))
    }

    /// Quantile detector on the monitored values.
    pub fn ad_quantile(&mut self, config: &QuantileConfig, mode: RunMode) -> Result<MethodOutcome> {
        let detector = QuantileDetector::from_config(config)?;
        self.run_univariate(detector, config.search, mode, |detector, search| {
            FittedMethod::Quantile { detector, search }
        })
    }

    /// Seasonal detector on the monitored values.
    pub fn ad_seasonal(&mut self, config: &SeasonalConfig, mode: RunMode) -> Result<MethodOutcome> {
        let detector = SeasonalDetector::from_config(config)?;
        self.run_univariate(detector, config.search, mode, |detector, search| {
            FittedMethod::Seasonal { detector, search }
        })
    }

    /// Minimum-cluster detector on a ratio metric.
    pub fn ad_kmeans(&mut self, config: &MinClusterConfig, mode: RunMode) -> Result<MethodOutcome> {
        let detector = MinClusterDetector::from_config(config)?;
        self.run_ratio("ad_kmeans", detector, config.search, mode, |detector, search| {
            FittedMethod::MinCluster { detector, search }
        })
    }

    /// Regression detector on a ratio metric, numerator as the target.
    pub fn ad_regression(
        &mut self,
        config: &RegressionConfig,
        mode: RunMode,
    ) -> Result<MethodOutcome> {
        let detector = RegressionDetector::from_config(config)?;
        self.run_ratio("ad_regression", detector, config.search, mode, |detector, search| {
            FittedMethod::Regression { detector, search }
        })
    }

    /// PCA detector on a ratio metric.
    pub fn ad_pca(&mut self, config: &PcaConfig, mode: RunMode) -> Result<MethodOutcome> {
        let detector = PcaDetector::from_config(config)?;
        self.run_ratio("ad_pca", detector, config.search, mode, |detector, search| {
            FittedMethod::Pca { detector, search }
        })
    }

    /// Weighted consensus of every registered table.
    ///
    /// Weights default to `1 / n` and are ignored for a single registration.
    pub fn combine(&self, weights: Option<&[f64]>) -> Result<ConsensusTable> {
        if self.registrations.is_empty() {
            return Err(BoundsError::EmptyEnsemble);
        }
        let tables = self
            .registrations
            .iter()
            .map(|r| {
                r.bounds().ok_or(BoundsError::MissingBounds {
                    id: r.id().index(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        combine_tables(&tables, weights, self.median)
    }

    /// Replace the metric and replay every registration on it without refitting.
    ///
    /// A method that fails keeps its registration but loses its table until
    /// the next successful replay.
    pub fn apply_to_new_data(&mut self, metric: impl Into<Metric>) -> ReplayReport {
        self.metric = metric.into();
        replay::replay_all(&mut self.registrations, &self.metric)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn run_univariate<O>(
        &mut self,
        mut detector: O,
        search: SearchConfig,
        mode: RunMode,
        wrap: impl FnOnce(O, SearchConfig) -> FittedMethod,
    ) -> Result<MethodOutcome>
    where
        O: Oracle<Series>,
    {
        let discovery = BoundDiscovery::new(search)?;
        let series = self.metric.monitored();
        detector.fit(&series)?;
        let bounds = discovery.univariate(&detector, &series)?;
        Ok(self.finish(wrap(detector, search), bounds, mode))
    }

    fn run_ratio<O>(
        &mut self,
        name: &str,
        mut detector: O,
        search: SearchConfig,
        mode: RunMode,
        wrap: impl FnOnce(O, SearchConfig) -> FittedMethod,
    ) -> Result<MethodOutcome>
    where
        O: Oracle<RatioSeries>,
    {
        let discovery = BoundDiscovery::new(search)?;
        let series = require_ratio(name, &self.metric)?;
        detector.fit(series)?;
        let bounds = discovery.ratio(&detector, series)?;
        Ok(self.finish(wrap(detector, search), bounds, mode))
    }

    fn finish(&mut self, method: FittedMethod, bounds: BoundTable, mode: RunMode) -> MethodOutcome {
        match mode {
            RunMode::Preview => MethodOutcome::Preview(bounds),
            RunMode::Register => MethodOutcome::Registered(self.register(method, bounds)),
        }
    }
}
