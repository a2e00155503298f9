use bounds_api::{QuantileConfig, SearchConfig, SeasonalConfig, Side};
use bounds_core::{Ensemble, FittedMethod, RunMode};
use bounds_spi::{BoundsError, Metric, Series};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounds_core=debug".into()),
        )
        .try_init();
}

fn weekly(weeks: usize, offset: f64) -> Series {
    let week = [10.0, 12.0, 14.0, 12.0, 10.0, 4.0, 4.0];
    let values = (0..weeks * 7)
        .map(|i| week[i % 7] + offset + ((i * 37) % 5) as f64 * 0.1)
        .collect();
    Series::from_values(values)
}

fn seasonal_config() -> SeasonalConfig {
    SeasonalConfig::new(3.0, Side::Both)
        .with_period(7)
        .with_search(SearchConfig::univariate().with_delta(0.05))
}

#[test]
fn seasonal_method_replays_with_learned_pattern() {
    init_tracing();
    let mut ensemble = Ensemble::new(weekly(6, 0.0));
    ensemble
        .ad_seasonal(&seasonal_config(), RunMode::Register)
        .expect("seasonal fit");

    let baseline = ensemble.registrations()[0]
        .bounds()
        .expect("table")
        .clone();
    assert_eq!(baseline.len(), 42);

    // A level shift is measured against the baseline pattern, not a refit one.
    let report = ensemble.apply_to_new_data(weekly(6, 25.0));
    assert!(report.is_complete());
    let shifted = ensemble.registrations()[0].bounds().expect("table");
    assert_eq!(shifted.anomaly_indices().len(), 42);

    match ensemble.registrations()[0].method() {
        FittedMethod::Seasonal { detector, .. } => assert_eq!(detector.period(), Some(7)),
        other => panic!("unexpected method {}", other.name()),
    }
}

#[test]
fn quantile_on_ratio_metric_reports_ratio_values() {
    init_tracing();
    let metric = Metric::from(
        bounds_spi::RatioSeries::from_fields(vec![10.0, 10.0, 11.0, 9.0, 91.0], vec![110.0; 5])
            .expect("aligned fields"),
    );
    let mut ensemble = Ensemble::new(metric);
    let config = QuantileConfig::new(0.95, 0.0)
        .with_search(SearchConfig::univariate().with_delta(1e-3));

    let table = ensemble
        .ad_quantile(&config, RunMode::Preview)
        .expect("quantile fit")
        .into_table()
        .expect("preview table");

    assert_eq!(table.anomaly_indices(), vec![4]);
    assert_eq!(table.values()[4], 91.0 / 110.0);
    assert!(table.get(4).and_then(|r| r.upper).expect("upper") < 91.0 / 110.0);
}

#[test]
fn invalid_config_fails_before_fitting() {
    init_tracing();
    let mut ensemble = Ensemble::new(weekly(2, 0.0));
    let result = ensemble.ad_quantile(&QuantileConfig::new(0.2, 0.8), RunMode::Register);
    assert!(matches!(result, Err(BoundsError::InvalidParameter { .. })));
    assert!(ensemble.is_empty());
}

#[test]
fn corrupted_seasonal_state_is_skipped_on_replay() {
    init_tracing();
    let mut ensemble = Ensemble::new(weekly(6, 0.0));
    ensemble
        .ad_seasonal(&seasonal_config(), RunMode::Register)
        .expect("seasonal fit");

    let mut state: serde_json::Value =
        serde_json::from_str(&ensemble.to_json().expect("serialize")).expect("valid json");
    state["registrations"][0]["method"]["detector"]["pattern"] = serde_json::json!([]);
    let mut restored = Ensemble::from_json(&state.to_string()).expect("structurally valid");

    let report = restored.apply_to_new_data(weekly(6, 0.0));
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(report.skipped[0].error, BoundsError::InvalidData(_)));
    assert!(restored.registrations()[0].bounds().is_none());
}

#[test]
fn mismatched_metric_fields_are_rejected_on_load() {
    let ensemble = Ensemble::new(
        bounds_spi::RatioSeries::from_fields(vec![1.0, 2.0], vec![4.0, 4.0]).expect("aligned fields"),
    );
    let mut state: serde_json::Value =
        serde_json::from_str(&ensemble.to_json().expect("serialize")).expect("valid json");
    state["metric"]["Ratio"]["denominator"] = serde_json::json!([4.0]);
    assert!(matches!(
        Ensemble::from_json(&state.to_string()),
        Err(BoundsError::Serialization(_))
    ));
}
