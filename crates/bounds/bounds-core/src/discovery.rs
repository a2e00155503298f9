//! Bound discovery: boundary search over every point of a series.

use bounds_api::SearchConfig;
use bounds_spi::{
    BoundRecord, BoundTable, BoundsError, Oracle, Perturbable, RatioSeries, Result, Series,
};
use rayon::prelude::*;
use tracing::warn;

use crate::search::BoundarySearch;

/// Builds bound tables by searching every point against a fitted oracle.
///
/// Points are searched in parallel; each task owns its oracle snapshot and
/// working copies, so the output is identical to a sequential run.
#[derive(Debug, Clone, Copy)]
pub struct BoundDiscovery {
    search: BoundarySearch,
}

impl BoundDiscovery {
    pub fn new(config: SearchConfig) -> Result<Self> {
        Ok(Self {
            search: BoundarySearch::new(config)?,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        self.search.config()
    }

    /// Bounds for a univariate series; the value itself is perturbed.
    pub fn univariate<O>(&self, oracle: &O, series: &Series) -> Result<BoundTable>
    where
        O: Oracle<Series>,
    {
        self.discover(oracle, series)
    }

    /// Bounds for a ratio series; the numerator is perturbed and limits are reported as ratios.
    pub fn ratio<O>(&self, oracle: &O, series: &RatioSeries) -> Result<BoundTable>
    where
        O: Oracle<RatioSeries>,
    {
        self.discover(oracle, series)
    }

    /// Bounds for any perturbable series.
    pub fn discover<O, S>(&self, oracle: &O, series: &S) -> Result<BoundTable>
    where
        O: Oracle<S>,
        S: Perturbable,
    {
        let verdicts = oracle.predict(series)?;
        if verdicts.len() != series.len() {
            return Err(BoundsError::InvalidData(format!(
                "oracle returned {} verdicts for {} points",
                verdicts.len(),
                series.len()
            )));
        }

        let records = (0..series.len())
            .into_par_iter()
            .map(|index| -> Result<BoundRecord> {
                let violation = verdicts[index];
                let point = self
                    .search
                    .search(oracle, series, index, !violation.is_normal())?;
                for failure in &point.failures {
                    warn!(index, timestamp = series.timestamp(index), %failure, "bound not found");
                }

                Ok(BoundRecord {
                    timestamp: series.timestamp(index),
                    value: series.observe(index, series.probe(index)),
                    upper: point.upper.map(|limit| limit.value),
                    lower: point.lower.map(|limit| limit.value),
                    violation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BoundTable::new(records))
    }
}

/// Univariate bounds with step `delta` and the default iteration cap.
pub fn univariate_bounds<O>(oracle: &O, series: &Series, delta: f64) -> Result<BoundTable>
where
    O: Oracle<Series>,
{
    BoundDiscovery::new(SearchConfig::univariate().with_delta(delta))?.univariate(oracle, series)
}

/// Ratio bounds with numerator step `delta` and the default iteration cap.
pub fn ratio_bounds<O>(oracle: &O, series: &RatioSeries, delta: f64) -> Result<BoundTable>
where
    O: Oracle<RatioSeries>,
{
    BoundDiscovery::new(SearchConfig::ratio().with_delta(delta))?.ratio(oracle, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounds_spi::Verdict;

    /// Normal inside `[lo, hi]`, fixed.
    #[derive(Clone)]
    struct Fixed {
        lo: f64,
        hi: f64,
    }

    impl Oracle<Series> for Fixed {
        fn fit(&mut self, _series: &Series) -> Result<()> {
            Ok(())
        }

        fn predict(&self, series: &Series) -> Result<Vec<Verdict>> {
            Ok(series
                .values()
                .iter()
                .map(|&v| Verdict::from(v < self.lo || v > self.hi))
                .collect())
        }

        fn is_fitted(&self) -> bool {
            true
        }
    }

    /// Returns one verdict too few.
    #[derive(Clone)]
    struct Short;

    impl Oracle<Series> for Short {
        fn fit(&mut self, _series: &Series) -> Result<()> {
            Ok(())
        }

        fn predict(&self, series: &Series) -> Result<Vec<Verdict>> {
            Ok(vec![Verdict::Normal; series.len().saturating_sub(1)])
        }

        fn is_fitted(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_table_shape_and_order() {
        let series = Series::new(vec![100, 200, 300], vec![1.0, 2.0, 3.0]).unwrap();
        let table = univariate_bounds(&Fixed { lo: 0.0, hi: 4.0 }, &series, 0.5).unwrap();
        assert_eq!(table.timestamps(), vec![100, 200, 300]);
        assert_eq!(table.values(), vec![1.0, 2.0, 3.0]);
        assert!(table.iter().all(|r| r.upper == Some(4.0) && r.lower == Some(0.0)));
    }

    #[test]
    fn test_verdict_count_mismatch() {
        let series = Series::from_values(vec![1.0, 2.0]);
        let result = univariate_bounds(&Short, &series, 0.5);
        assert!(matches!(result, Err(BoundsError::InvalidData(_))));
    }

    #[test]
    fn test_invalid_delta_fails_fast() {
        let series = Series::from_values(vec![1.0, 2.0]);
        let result = univariate_bounds(&Fixed { lo: 0.0, hi: 4.0 }, &series, -1.0);
        assert!(matches!(result, Err(BoundsError::InvalidParameter { .. })));
    }

    #[test]
    fn test_exhausted_points_carry_no_limit() {
        let series = Series::from_values(vec![1.0, 2.0]);
        let discovery =
            BoundDiscovery::new(SearchConfig::univariate().with_delta(1.0).with_max_iterations(5))
                .unwrap();
        let table = discovery
            .univariate(&Fixed { lo: -100.0, hi: 3.0 }, &series)
            .unwrap();
        assert_eq!(table.upper(), vec![Some(3.0), Some(3.0)]);
        assert_eq!(table.lower(), vec![None, None]);
        assert_eq!(table.unresolved_indices(), vec![0, 1]);
    }
}
