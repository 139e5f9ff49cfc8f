//! Basic example: fit and forecast a synthetic price series
//!
//! Run with: cargo run --example basic -p rustful-volatility

use chrono::{Days, NaiveDate};
use volatility::{
    FeatureEngine, GarchFitter, GarchForecaster, PriceBar, StandardFeatureEngine,
    VolatilityForecaster, VolatilityModelFitter,
};

fn main() {
    println!("=== rustful-volatility Basic Example ===\n");

    // Deterministic zig-zag with alternating calm and turbulent stretches
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let mut close = 100.0_f64;
    let bars: Vec<PriceBar> = (0..500u64)
        .map(|i| {
            let amplitude = if (i / 50) % 2 == 0 { 0.004 } else { 0.02 };
            let shock = ((i as f64) * 1.7).sin() * amplitude;
            close *= shock.exp();
            let date = start.checked_add_days(Days::new(i)).unwrap();
            PriceBar::new("DEMO", date, close, close * 1.01, close * 0.99, close, 1_000)
        })
        .collect();

    // 1. Features
    let features = StandardFeatureEngine::default().compute(&bars).unwrap();
    println!("1. Returns: {}", features.returns.len());
    if let Some(vol) = features.latest_volatility() {
        println!("   Latest 14-day annualized volatility: {:.2}%", vol * 100.0);
    }

    // 2. GARCH(1,1)
    let fit = match GarchFitter::default().fit("DEMO", &features.returns) {
        Ok(fit) => fit,
        Err(e) => {
            println!("2. Fit failed: {}", e);
            return;
        }
    };
    let m = &fit.model;
    println!(
        "2. omega={:.4} alpha={:.4} beta={:.4} persistence={:.4} AIC={:.2}",
        m.omega, m.alpha, m.beta, m.persistence, m.aic
    );

    // 3. Forecast
    let forecast = GarchForecaster::default().forecast(m, 14).unwrap();
    println!("3. 14-day forecast:");
    for point in &forecast {
        println!(
            "   {} (+{:>2}) {:.2}%",
            point.forecast_date,
            point.horizon_day,
            point.predicted_volatility * 100.0
        );
    }

    println!("\n=== Example Complete ===");
}
