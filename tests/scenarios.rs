//! End-to-end forecasting scenarios.
//!
//! Each test drives the public API the way the analytics layer does: build a
//! validated history, request future months, and inspect the output contract.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use revenue_forecast::config::{EngineConfig, ThresholdRule};
use revenue_forecast::core::{shift_months, ForecastRequest, ModelKind, MonthlyHistory, MonthlyRevenue};
use revenue_forecast::features::FourierFeatures;
use revenue_forecast::models::{ForecastEngine, RevenueModel, WeightedFourierRegression};
use revenue_forecast::utils::solver::{fit_weighted, WeightedObservation};
use revenue_forecast::ForecastError;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

fn month_at(index: i64) -> NaiveDate {
    shift_months(start(), index).unwrap()
}

fn default_engine() -> ForecastEngine {
    ForecastEngine::new(EngineConfig::default()).unwrap()
}

// =============================================================================
// Scenario A: flat series
// =============================================================================

#[test]
fn flat_series_forecasts_flat() {
    let history = MonthlyHistory::from_values(start(), &[10_000.0; 24]).unwrap();
    let request = ForecastRequest::next_months(&history, 6, 50.0).unwrap();

    let output = default_engine().forecast(&history, &request);

    assert_eq!(output.model, ModelKind::WeightedFourierRegression);
    assert!(!output.degraded);
    assert_eq!(output.horizon(), 6);
    for point in &output.forecast {
        assert_relative_eq!(point.predicted_revenue, 10_000.0, max_relative = 0.05);
        assert_relative_eq!(point.predicted_orders, 200.0, max_relative = 0.05);
    }

    let mut model = WeightedFourierRegression::new(&EngineConfig::default()).unwrap();
    model.fit(&history).unwrap();
    assert_relative_eq!(model.coefficients().unwrap().trend(), 0.0, epsilon = 1e-4);
}

// =============================================================================
// Scenario B: seasonal spike
// =============================================================================

#[test]
fn seasonal_spike_recurs_in_same_calendar_month() {
    let revenue: Vec<f64> = (0..24)
        .map(|i| if i % 12 == 0 { 20_000.0 } else { 10_000.0 })
        .collect();
    let history = MonthlyHistory::from_values(start(), &revenue).unwrap();
    let request = ForecastRequest::new(vec![month_at(23), month_at(24), month_at(25)], 100.0).unwrap();

    let output = default_engine().forecast(&history, &request);
    assert_eq!(output.model, ModelKind::WeightedFourierRegression);

    let values = output.predicted_revenues();
    let (before, spike, after) = (values[0], values[1], values[2]);
    assert!(spike > 1.5 * before, "spike {} vs previous {}", spike, before);
    assert!(spike > 1.5 * after, "spike {} vs next {}", spike, after);
    assert_relative_eq!(spike, 20_000.0, max_relative = 0.05);

    let mut model = WeightedFourierRegression::new(&EngineConfig::default()).unwrap();
    model.fit(&history).unwrap();
    let coef = model.coefficients().unwrap();
    let harmonic_energy: f64 = (1..=6)
        .filter_map(|k| coef.harmonic(k))
        .map(|(s, c)| s.abs() + c.abs())
        .sum();
    assert!(harmonic_energy > 0.1);
}

// =============================================================================
// Scenario C: sparse history
// =============================================================================

#[test]
fn sparse_history_uses_seasonal_naive() {
    let history = MonthlyHistory::from_values(start(), &[5_000.0; 10]).unwrap();
    let request = ForecastRequest::next_months(&history, 3, 25.0).unwrap();

    let output = default_engine().forecast(&history, &request);

    assert_eq!(output.model, ModelKind::SeasonalNaive);
    assert!(output.training_metrics.is_none());
    assert!(output.forecast.iter().all(|p| p.confidence == 0.5));
    // Month 12 repeats month 0; months 10 and 11 have no prior year.
    assert!(output.forecast[0].degraded);
    assert!(output.forecast[1].degraded);
    assert_eq!(output.forecast[2].predicted_revenue, 5_000.0);
    assert!(output.degraded);

    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
    assert_eq!(json["model"], "seasonal-naive");
    assert!(json["trainingMetrics"].is_null());
}

// =============================================================================
// Scenario D: zero-revenue month
// =============================================================================

#[test]
fn zero_revenue_month_is_excluded_from_mape() {
    let mut revenue: Vec<f64> = (0..24)
        .map(|i| 8_000.0 + 1_000.0 * ((i % 12) as f64 / 12.0))
        .collect();
    revenue[7] = 0.0;
    let history = MonthlyHistory::from_values(start(), &revenue).unwrap();
    let request = ForecastRequest::next_months(&history, 6, 40.0).unwrap();

    let output = default_engine().forecast(&history, &request);

    assert_eq!(output.model, ModelKind::WeightedFourierRegression);
    let metrics = output.training_metrics.unwrap();
    assert!(metrics.mape.is_finite());
    assert!(metrics.residual_std.is_finite());
    assert!((0.45..=0.92).contains(&metrics.confidence));
    for point in &output.forecast {
        assert!(point.predicted_revenue.is_finite());
        assert!(point.predicted_revenue >= 0.0);
    }

    let model = WeightedFourierRegression::new(&EngineConfig::default()).unwrap();
    let obs = model.observations(&history);
    assert_eq!(obs[7].log_revenue, 0.0);
}

// =============================================================================
// Scenario E: near-singular input
// =============================================================================

#[test]
fn identical_month_indices_still_solve_with_ridge() {
    let builder = FourierFeatures::new(6, 12).unwrap();
    let features = builder.build(9);
    let obs: Vec<_> = (0..18)
        .map(|i| WeightedObservation::new(features, 1_000.0 + i as f64, 1.0))
        .collect();

    let coef = fit_weighted(&obs, 1e-6).unwrap();
    assert!(coef.as_slice().iter().all(|c| c.is_finite()));
}

#[test]
fn short_degenerate_history_deterministically_falls_back() {
    let history = MonthlyHistory::from_values(start(), &[3_000.0; 5]).unwrap();
    let request = ForecastRequest::next_months(&history, 12, 30.0).unwrap();

    let first = default_engine().forecast(&history, &request);
    let second = default_engine().forecast(&history, &request);

    assert_eq!(first.model, ModelKind::SeasonalNaive);
    assert_eq!(first, second);
}

// =============================================================================
// Threshold boundary and fallback
// =============================================================================

#[test]
fn threshold_boundary_is_configurable() {
    let history = MonthlyHistory::from_values(start(), &[2_000.0; 18]).unwrap();
    let request = ForecastRequest::next_months(&history, 1, 10.0).unwrap();

    let inclusive = default_engine().forecast(&history, &request);
    assert_eq!(inclusive.model, ModelKind::WeightedFourierRegression);

    let exclusive = ForecastEngine::new(
        EngineConfig::default().with_threshold_rule(ThresholdRule::Exclusive),
    )
    .unwrap()
    .forecast(&history, &request);
    assert_eq!(exclusive.model, ModelKind::SeasonalNaive);

    let shorter = MonthlyHistory::from_values(start(), &[2_000.0; 17]).unwrap();
    let request = ForecastRequest::next_months(&shorter, 1, 10.0).unwrap();
    assert_eq!(
        default_engine().forecast(&shorter, &request).model,
        ModelKind::SeasonalNaive
    );
}

#[test]
fn unsolvable_fit_degrades_instead_of_failing() {
    let config = EngineConfig::default()
        .with_harmonics(1)
        .with_season_length(2)
        .with_epsilon(0.0)
        .with_min_months_for_regression(4);
    let engine = ForecastEngine::new(config).unwrap();
    let history = MonthlyHistory::from_values(start(), &[100.0, 200.0, 300.0, 400.0]).unwrap();

    let output = engine.forecast_records(
        history
            .samples()
            .iter()
            .map(|s| MonthlyRevenue::new(s.date, s.revenue))
            .collect(),
        2,
        10.0,
    );

    let output = output.unwrap();
    assert_eq!(output.model, ModelKind::SeasonalNaive);
    assert!(output.degraded);
    assert!(output.training_metrics.is_none());
    // Season length 2: month 4 <- month 2, month 5 <- month 3
    assert_eq!(output.predicted_revenues(), vec![300.0, 400.0]);
}

#[test]
fn gaps_in_history_are_tolerated() {
    let records: Vec<MonthlyRevenue> = (0..30)
        .filter(|i| i % 7 != 3)
        .map(|i| MonthlyRevenue::new(month_at(i), 6_000.0 + 40.0 * i as f64))
        .collect();
    let months = records.len();
    assert!(months >= 18);

    let output = default_engine().forecast_records(records, 3, 60.0).unwrap();
    assert_eq!(output.model, ModelKind::WeightedFourierRegression);
    assert_eq!(output.forecast[0].date, month_at(30));
    assert!(output.forecast[0].predicted_revenue > 6_000.0);
}

#[test]
fn far_future_target_stays_within_contract() {
    let revenue: Vec<f64> = (0..24).map(|i| 100.0 * 1.5_f64.powi(i)).collect();
    let history = MonthlyHistory::from_values(start(), &revenue).unwrap();
    let request = ForecastRequest::new(vec![month_at(24), month_at(2_400)], 20.0).unwrap();

    let output = default_engine().forecast(&history, &request);

    assert_eq!(output.model, ModelKind::WeightedFourierRegression);
    assert!(output.degraded);
    assert!(!output.forecast[0].degraded);
    let far = &output.forecast[1];
    assert!(far.degraded);
    assert_eq!(far.predicted_revenue, 0.0);
    assert_eq!(far.predicted_orders, 0.0);

    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
    assert!(json["forecast"][1]["predictedRevenue"].is_number());
    assert!(json["forecast"][1]["predictedOrders"].is_number());
    assert_eq!(json["degraded"], true);
}

// =============================================================================
// Caller errors
// =============================================================================

#[test]
fn caller_errors_surface_synchronously() {
    let engine = default_engine();

    let negative = vec![MonthlyRevenue::new(start(), -5.0)];
    assert!(matches!(
        engine.forecast_records(negative, 3, 10.0),
        Err(ForecastError::InvalidInput(_))
    ));

    let descending = vec![
        MonthlyRevenue::new(month_at(1), 5.0),
        MonthlyRevenue::new(month_at(0), 5.0),
    ];
    assert!(matches!(
        engine.forecast_records(descending, 3, 10.0),
        Err(ForecastError::InvalidInput(_))
    ));

    assert!(matches!(
        ForecastEngine::new(EngineConfig::default().with_season_length(0)),
        Err(ForecastError::InvalidConfig(_))
    ));
}

// =============================================================================
// Output contract
// =============================================================================

#[test]
fn regression_output_serializes_to_contract() {
    let history = MonthlyHistory::from_values(start(), &[10_000.0; 24]).unwrap();
    let request = ForecastRequest::next_months(&history, 2, 50.0).unwrap();
    let output = default_engine().forecast(&history, &request);

    let json: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
    assert_eq!(json["model"], "weighted-fourier-regression");
    assert_eq!(json["degraded"], false);
    assert!(json["trainingMetrics"]["mape"].is_number());
    assert!(json["trainingMetrics"]["residualStd"].is_number());
    assert!(json["trainingMetrics"]["confidence"].is_number());
    assert_eq!(json["forecast"].as_array().unwrap().len(), 2);
    assert_eq!(json["forecast"][0]["date"], "2024-01-01");
    assert!(json["forecast"][0]["predictedOrders"].is_number());
}
