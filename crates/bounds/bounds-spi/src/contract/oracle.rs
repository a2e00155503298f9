//! Oracle trait definition.

use crate::error::Result;
use crate::model::Verdict;

/// A stateful anomaly detector queried as a black box.
///
/// `fit` learns a baseline and replaces any previous one. `predict` classifies
/// every point of a series against that baseline and must not change it.
/// `Clone` must produce an independent deep copy: boundary search refits clones
/// and relies on the original staying untouched.
pub trait Oracle<S: ?Sized>: Clone + Send + Sync {
    /// Learn a baseline from the series.
    fn fit(&mut self, series: &S) -> Result<()>;

    /// Classify each point of the series.
    fn predict(&self, series: &S) -> Result<Vec<Verdict>>;

    /// Check if the oracle has been fitted.
    fn is_fitted(&self) -> bool;

    /// Fit on the series, then classify it.
    fn fit_predict(&mut self, series: &S) -> Result<Vec<Verdict>> {
        self.fit(series)?;
        self.predict(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoundsError;
    use crate::model::Series;

    /// Mock implementation: flags values above the fitted maximum.
    #[derive(Clone, Default)]
    struct MaxOracle {
        max: Option<f64>,
    }

    impl Oracle<Series> for MaxOracle {
        fn fit(&mut self, series: &Series) -> Result<()> {
            self.max = series.values().iter().copied().reduce(f64::max);
            Ok(())
        }

        fn predict(&self, series: &Series) -> Result<Vec<Verdict>> {
            let max = self.max.ok_or(BoundsError::NotFitted)?;
            Ok(series.values().iter().map(|&v| Verdict::from(v > max)).collect())
        }

        fn is_fitted(&self) -> bool {
            self.max.is_some()
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let oracle = MaxOracle::default();
        let series = Series::from_values(vec![1.0]);
        assert!(matches!(oracle.predict(&series), Err(BoundsError::NotFitted)));
    }

    #[test]
    fn test_fit_predict() {
        let mut oracle = MaxOracle::default();
        let series = Series::from_values(vec![1.0, 2.0]);
        let verdicts = oracle.fit_predict(&series).unwrap();
        assert_eq!(verdicts, vec![Verdict::Normal, Verdict::Normal]);
        assert!(oracle.is_fitted());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut oracle = MaxOracle::default();
        oracle.fit(&Series::from_values(vec![1.0, 2.0])).unwrap();
        let mut snapshot = oracle.clone();
        snapshot.fit(&Series::from_values(vec![10.0])).unwrap();

        let probe = Series::from_values(vec![5.0]);
        assert_eq!(oracle.predict(&probe).unwrap(), vec![Verdict::Anomalous]);
        assert_eq!(snapshot.predict(&probe).unwrap(), vec![Verdict::Normal]);
    }
}
