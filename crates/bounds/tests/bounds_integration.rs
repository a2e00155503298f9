//! Integration tests for bounds

use bounds::{
    ratio_bounds, univariate_bounds, BoundDiscovery, BoundsError, OnRatio, Oracle,
    QuantileDetector, RatioSeries, Result, SearchConfig, Series, Verdict,
};

fn spiked_series() -> Series {
    Series::from_values(vec![9.0, 10.0, 11.0, 10.0, 50.0])
}

fn spiked_ratio() -> RatioSeries {
    RatioSeries::from_fields(vec![10.0, 10.0, 11.0, 9.0, 91.0], vec![110.0; 5]).unwrap()
}

/// Never flags anything.
#[derive(Clone)]
struct Permissive;

impl Oracle<Series> for Permissive {
    fn fit(&mut self, _series: &Series) -> Result<()> {
        Ok(())
    }

    fn predict(&self, series: &Series) -> Result<Vec<Verdict>> {
        Ok(vec![Verdict::Normal; series.len()])
    }

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Fails every prediction.
#[derive(Clone)]
struct Broken;

impl Oracle<Series> for Broken {
    fn fit(&mut self, _series: &Series) -> Result<()> {
        Ok(())
    }

    fn predict(&self, _series: &Series) -> Result<Vec<Verdict>> {
        Err(BoundsError::NotFitted)
    }

    fn is_fitted(&self) -> bool {
        false
    }
}

#[test]
fn test_univariate_spike_is_flagged_and_bounded() {
    let series = spiked_series();
    let mut oracle = QuantileDetector::new(0.95, 0.0).unwrap();
    oracle.fit(&series).unwrap();

    let table = univariate_bounds(&oracle, &series, 0.5).unwrap();

    assert_eq!(table.anomaly_indices(), vec![4]);
    let spike = table.get(4).unwrap();
    // Searched after replacing 50 with the median and refitting.
    assert_eq!(spike.upper, Some(10.5));
    assert_eq!(spike.lower, Some(9.0));
    assert_eq!(spike.within_limits(), Some(false));
}

#[test]
fn test_univariate_normal_points_are_bracketed() {
    let series = spiked_series();
    let mut oracle = QuantileDetector::new(0.95, 0.0).unwrap();
    oracle.fit(&series).unwrap();

    let table = univariate_bounds(&oracle, &series, 0.5).unwrap();

    for record in table.iter().take(4) {
        assert_eq!(record.violation, Verdict::Normal);
        assert_eq!(record.within_limits(), Some(true));
    }
    // High quantile is 42.2; 9 + 66 * 0.5 is the last step below it.
    assert_eq!(table.get(0).unwrap().upper, Some(42.0));
    assert_eq!(table.get(0).unwrap().lower, Some(9.0));
}

#[test]
fn test_caller_oracle_and_series_are_untouched() {
    let series = spiked_series();
    let mut oracle = QuantileDetector::new(0.95, 0.0).unwrap();
    oracle.fit(&series).unwrap();
    let upper_before = oracle.upper();

    univariate_bounds(&oracle, &series, 0.5).unwrap();

    assert_eq!(oracle.upper(), upper_before);
    assert_eq!(series, spiked_series());
}

#[test]
fn test_ratio_spike_limits_are_ratios() {
    let series = spiked_ratio();
    let mut oracle = OnRatio::new(QuantileDetector::new(0.95, 0.0).unwrap());
    oracle.fit(&series).unwrap();

    let table = ratio_bounds(&oracle, &series, 1.0).unwrap();

    assert_eq!(table.anomaly_indices(), vec![4]);
    let spike = table.get(4).unwrap();
    assert_eq!(spike.value, 91.0 / 110.0);
    assert_eq!(spike.upper, Some(10.0 / 110.0));
    assert_eq!(spike.lower, Some(9.0 / 110.0));

    // Limits map back to whole numerators.
    let upper_probe = spike.upper.unwrap() * 110.0;
    assert!((upper_probe - 10.0).abs() < 1e-9);
}

#[test]
fn test_ratio_normal_points_are_bracketed() {
    let series = spiked_ratio();
    let mut oracle = OnRatio::new(QuantileDetector::new(0.95, 0.0).unwrap());
    oracle.fit(&series).unwrap();

    let table = ratio_bounds(&oracle, &series, 1.0).unwrap();

    for record in table.iter().take(4) {
        assert_eq!(record.within_limits(), Some(true));
    }
}

#[test]
fn test_exhausted_search_reports_missing_limits() {
    let series = Series::from_values(vec![1.0, 2.0, 3.0]);
    let discovery = BoundDiscovery::new(
        SearchConfig::univariate()
            .with_delta(1.0)
            .with_max_iterations(100),
    )
    .unwrap();

    let table = discovery.univariate(&Permissive, &series).unwrap();

    assert_eq!(table.len(), 3);
    assert!(table.upper().iter().all(Option::is_none));
    assert!(table.lower().iter().all(Option::is_none));
    assert_eq!(table.unresolved_indices(), vec![0, 1, 2]);
}

#[test]
fn test_oracle_failure_aborts_discovery() {
    let series = Series::from_values(vec![1.0, 2.0, 3.0]);
    let result = univariate_bounds(&Broken, &series, 1.0);
    assert!(matches!(result, Err(BoundsError::NotFitted)));
}

#[test]
fn test_unfitted_detector_is_rejected() {
    let series = spiked_series();
    let oracle = QuantileDetector::default();
    assert!(matches!(
        univariate_bounds(&oracle, &series, 0.5),
        Err(BoundsError::NotFitted)
    ));
}

#[test]
fn test_undefined_point_is_searched_from_baseline() {
    let series = Series::from_values(vec![9.0, 10.0, f64::NAN, 10.0, 11.0, 10.0]);
    let mut oracle = QuantileDetector::new(0.95, 0.0).unwrap();
    oracle.fit(&series).unwrap();

    let table = univariate_bounds(&oracle, &series, 0.5).unwrap();

    let missing = table.get(2).unwrap();
    assert_eq!(missing.violation, Verdict::Undefined);
    assert!(missing.value.is_nan());
    // NaN is replaced by the median (10) and the snapshot refitted: high quantile 10.75.
    assert_eq!(missing.upper, Some(10.5));
    assert_eq!(missing.lower, Some(9.0));
    assert!(table.unresolved_indices().is_empty());
}

#[test]
fn test_zero_denominator_point_reports_no_limits() {
    let series = RatioSeries::from_fields(
        vec![10.0, 10.0, 0.0, 9.0, 11.0],
        vec![110.0, 110.0, 0.0, 110.0, 110.0],
    )
    .unwrap();
    let mut oracle = OnRatio::new(QuantileDetector::new(0.95, 0.0).unwrap());
    oracle.fit(&series).unwrap();

    let table = ratio_bounds(&oracle, &series, 1.0).unwrap();

    let point = table.get(2).unwrap();
    assert_eq!(point.violation, Verdict::Undefined);
    assert!(point.value.is_nan());
    assert_eq!(point.upper, None);
    assert_eq!(point.lower, None);
    assert_eq!(table.unresolved_indices(), vec![2]);
}
