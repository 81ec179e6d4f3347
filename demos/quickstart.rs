//! Quickstart demonstrating a monthly revenue forecast.
//!
//! Run with: RUST_LOG=revenue_forecast=debug cargo run --example quickstart

use chrono::NaiveDate;
use revenue_forecast::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "revenue_forecast=info".into()),
        )
        .init();

    println!("=== revenue-forecast Quickstart ===\n");

    // 1. Two and a half years of monthly revenue with a December peak
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let revenue: Vec<f64> = (0..30)
        .map(|i| {
            let base = 12_000.0 + 150.0 * i as f64;
            if i % 12 == 11 {
                base * 1.6
            } else {
                base
            }
        })
        .collect();
    let history = MonthlyHistory::from_values(start, &revenue).unwrap();
    println!("Loaded {} months starting {}", history.len(), history.anchor());

    // 2. Forecast the next 12 months
    let engine = ForecastEngine::new(EngineConfig::default()).unwrap();
    let request = ForecastRequest::next_months(&history, 12, 85.0).unwrap();
    let output = engine.forecast(&history, &request);

    println!("\n--- Model: {} ---", output.model);
    if let Some(metrics) = output.training_metrics {
        println!("MAPE:         {:.2}%", metrics.mape);
        println!("Residual std: {:.2}", metrics.residual_std);
        println!("Confidence:   {:.3}", metrics.confidence);
    }

    println!(
        "\n{:>10} {:>12} {:>10} {:>10}",
        "Month", "Revenue", "Orders", "Conf"
    );
    println!("{:-<46}", "");
    for point in &output.forecast {
        println!(
            "{:>10} {:>12.2} {:>10.1} {:>10.3}",
            point.date, point.predicted_revenue, point.predicted_orders, point.confidence
        );
    }

    // 3. A short history takes the seasonal-naive path
    let short = MonthlyHistory::from_values(start, &revenue[..14]).unwrap();
    let request = ForecastRequest::next_months(&short, 3, 85.0).unwrap();
    let fallback = engine.forecast(&short, &request);
    println!("\n--- Short history: {} ---", fallback.model);

    // 4. Serialized output
    println!("\n--- JSON ---");
    println!("{}", fallback.to_json().unwrap());
}
