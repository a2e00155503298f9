//! Fitted methods held by an ensemble.

use bounds_api::SearchConfig;
use bounds_spi::{
    BoundTable, BoundsError, ChartData, ControlChart, Metric, RatioSeries, Result, VariableKind,
};
use serde::{Deserialize, Serialize};

use crate::detectors::{
    MinClusterDetector, PcaDetector, QuantileDetector, RegressionDetector, SeasonalDetector,
};
use crate::discovery::BoundDiscovery;
use crate::spc::PChart;

use super::registry::RegistrationId;

/// Whether a method call only returns its table or also registers the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    #[default]
    Preview,
    Register,
}

/// Result of running one method.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutcome {
    Preview(BoundTable),
    Registered(RegistrationId),
}

impl MethodOutcome {
    /// The previewed table, if this was a preview.
    pub fn into_table(self) -> Option<BoundTable> {
        match self {
            MethodOutcome::Preview(table) => Some(table),
            MethodOutcome::Registered(_) => None,
        }
    }

    /// The new registration id, if the method was registered.
    pub fn registration(&self) -> Option<RegistrationId> {
        match self {
            MethodOutcome::Preview(_) => None,
            MethodOutcome::Registered(id) => Some(*id),
        }
    }
}

/// A fitted method with everything needed to replay it on new data.
///
/// Serialized with a `kind` tag; a tag this build does not know becomes
/// [`FittedMethod::Unrecognized`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedMethod {
    Spc {
        chart: PChart,
    },
    Quantile {
        detector: QuantileDetector,
        search: SearchConfig,
    },
    Seasonal {
        detector: SeasonalDetector,
        search: SearchConfig,
    },
    MinCluster {
        detector: MinClusterDetector,
        search: SearchConfig,
    },
    Regression {
        detector: RegressionDetector,
        search: SearchConfig,
    },
    Pca {
        detector: PcaDetector,
        search: SearchConfig,
    },
    #[serde(other)]
    Unrecognized,
}

impl FittedMethod {
    /// Name of the ensemble entry point that produces this method.
    pub fn name(&self) -> &'static str {
        match self {
            FittedMethod::Spc { .. } => "spc",
            FittedMethod::Quantile { .. } => "ad_quantile",
            FittedMethod::Seasonal { .. } => "ad_seasonal",
            FittedMethod::MinCluster { .. } => "ad_kmeans",
            FittedMethod::Regression { .. } => "ad_regression",
            FittedMethod::Pca { .. } => "ad_pca",
            FittedMethod::Unrecognized => "unrecognized",
        }
    }

    pub fn supports(&self, kind: VariableKind) -> bool {
        match self {
            FittedMethod::Quantile { .. } | FittedMethod::Seasonal { .. } => true,
            FittedMethod::Spc { .. }
            | FittedMethod::MinCluster { .. }
            | FittedMethod::Regression { .. }
            | FittedMethod::Pca { .. } => kind == VariableKind::Ratio,
            FittedMethod::Unrecognized => false,
        }
    }

    /// Recompute this method's table on `metric` with the learned baseline.
    ///
    /// Nothing is refitted, except a point's own snapshot during its boundary
    /// search. A p-chart keeps `metric` as its predicted data.
    pub fn replay(&mut self, metric: &Metric) -> Result<BoundTable> {
        let name = self.name();
        match self {
            FittedMethod::Spc { chart } => {
                chart.predict(require_ratio(name, metric)?)?;
                chart.bounds(ChartData::Predicted)
            }
            FittedMethod::Quantile { detector, search } => {
                BoundDiscovery::new(*search)?.univariate(&*detector, &metric.monitored())
            }
            FittedMethod::Seasonal { detector, search } => {
                BoundDiscovery::new(*search)?.univariate(&*detector, &metric.monitored())
            }
            FittedMethod::MinCluster { detector, search } => {
                BoundDiscovery::new(*search)?.ratio(&*detector, require_ratio(name, metric)?)
            }
            FittedMethod::Regression { detector, search } => {
                BoundDiscovery::new(*search)?.ratio(&*detector, require_ratio(name, metric)?)
            }
            FittedMethod::Pca { detector, search } => {
                BoundDiscovery::new(*search)?.ratio(&*detector, require_ratio(name, metric)?)
            }
            FittedMethod::Unrecognized => Err(BoundsError::UnrecognizedMethod(
                "method kind not known to this build".to_string(),
            )),
        }
    }
}

/// The ratio series of `metric`, or the unsupported-combination error for `method`.
pub(crate) fn require_ratio<'a>(method: &str, metric: &'a Metric) -> Result<&'a RatioSeries> {
    match metric {
        Metric::Ratio(series) => Ok(series),
        Metric::Univariate(_) => Err(BoundsError::UnsupportedVariantCombination {
            method: method.to_string(),
            kind: VariableKind::Univariate,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounds_spi::Series;

    #[test]
    fn test_unknown_kind_deserializes_as_unrecognized() {
        let method: FittedMethod = serde_json::from_str(r#"{"kind":"isolation_forest"}"#).unwrap();
        assert!(matches!(method, FittedMethod::Unrecognized));
    }

    #[test]
    fn test_unrecognized_replay_fails() {
        let mut method = FittedMethod::Unrecognized;
        let metric = Metric::from(Series::from_values(vec![1.0]));
        assert!(matches!(
            method.replay(&metric),
            Err(BoundsError::UnrecognizedMethod(_))
        ));
    }

    #[test]
    fn test_ratio_only_methods_reject_univariate() {
        let mut method = FittedMethod::Regression {
            detector: RegressionDetector::new(3.0).unwrap(),
            search: SearchConfig::ratio(),
        };
        let metric = Metric::from(Series::from_values(vec![1.0, 2.0]));
        assert!(!method.supports(VariableKind::Univariate));
        assert!(matches!(
            method.replay(&metric),
            Err(BoundsError::UnsupportedVariantCombination { .. })
        ));
    }

    #[test]
    fn test_tag_names() {
        let method = FittedMethod::Quantile {
            detector: QuantileDetector::default(),
            search: SearchConfig::univariate(),
        };
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["kind"], "quantile");
        assert_eq!(method.name(), "ad_quantile");
    }
}
