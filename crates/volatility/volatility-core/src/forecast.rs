//! Multi-step GARCH(1,1) variance forecasts.

use volatility_api::ForecastConfig;
use volatility_spi::{
    ForecastPoint, GarchModel, Result, VolatilityError, VolatilityForecaster,
};

/// Forecaster for fitted GARCH(1,1) models.
#[derive(Debug, Clone, Default)]
pub struct GarchForecaster {
    config: ForecastConfig,
}

impl GarchForecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }
}

impl VolatilityForecaster for GarchForecaster {
    fn forecast(&self, model: &GarchModel, horizon: usize) -> Result<Vec<ForecastPoint>> {
        let variances = variance_path(model, horizon)?;
        let dates = self.config.calendar.dates_after(model.last_date, horizon);
        if dates.len() < horizon {
            return Err(VolatilityError::InvalidParameter {
                name: "horizon".to_string(),
                reason: format!("forecast dates past {} overflow the calendar", model.last_date),
            });
        }

        let annualize = self.config.annualization_factor.sqrt();
        let points = variances
            .into_iter()
            .zip(dates)
            .enumerate()
            .map(|(i, (variance, forecast_date))| ForecastPoint {
                ticker: model.ticker.clone(),
                horizon_day: i + 1,
                forecast_date,
                predicted_volatility: variance.max(0.0).sqrt() / model.return_scale * annualize,
                predicted_variance: variance,
            })
            .collect();

        Ok(points)
    }
}

/// Conditional variances `sigma2[T+1..=T+horizon]` on the scaled return axis.
///
/// Step one uses the last residual and variance; later steps use
/// `omega + (alpha + beta) * sigma2[T+h-1]`.
pub fn variance_path(model: &GarchModel, horizon: usize) -> Result<Vec<f64>> {
    if horizon == 0 {
        return Err(VolatilityError::InvalidHorizon { horizon: 0 });
    }

    let persistence = model.alpha + model.beta;
    let mut path = Vec::with_capacity(horizon);
    let mut next =
        model.omega + model.alpha * model.last_residual.powi(2) + model.beta * model.last_variance;
    path.push(next);
    for _ in 1..horizon {
        next = model.omega + persistence * next;
        path.push(next);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use volatility_spi::{Distribution, ForecastCalendar};

    fn model(alpha: f64, beta: f64, last_residual: f64, last_variance: f64) -> GarchModel {
        GarchModel {
            ticker: "MSFT".to_string(),
            distribution: Distribution::Normal,
            mu: 0.04,
            omega: 0.05,
            alpha,
            beta,
            nu: None,
            persistence: alpha + beta,
            log_likelihood: -2900.0,
            aic: 5808.0,
            bic: 5830.0,
            n_observations: 2000,
            return_scale: 100.0,
            iterations: 300,
            last_date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            last_residual,
            last_variance,
        }
    }

    #[test]
    fn test_default_horizon_points() {
        let m = model(0.1, 0.85, 1.2, 1.1);
        let points = GarchForecaster::default().forecast(&m, 14).unwrap();

        assert_eq!(points.len(), 14);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.horizon_day, i + 1);
            assert_eq!(p.ticker, "MSFT");
            assert!(p.predicted_volatility >= 0.0 && p.predicted_volatility.is_finite());
            if i > 0 {
                assert!(p.forecast_date > points[i - 1].forecast_date);
            }
        }
        assert_eq!(points[0].forecast_date, NaiveDate::from_ymd_opt(2024, 6, 29).unwrap());
    }

    #[test]
    fn test_first_step_uses_last_shock() {
        let m = model(0.1, 0.85, 2.0, 1.5);
        let path = variance_path(&m, 1).unwrap();
        assert!((path[0] - (0.05 + 0.1 * 4.0 + 0.85 * 1.5)).abs() < 1e-12);

        let points = GarchForecaster::default().forecast(&m, 1).unwrap();
        let expected = path[0].sqrt() / 100.0 * 252.0_f64.sqrt();
        assert!((points[0].predicted_volatility - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_horizon() {
        let m = model(0.1, 0.85, 1.0, 1.0);
        assert_eq!(
            GarchForecaster::default().forecast(&m, 0),
            Err(VolatilityError::InvalidHorizon { horizon: 0 })
        );
    }

    #[test]
    fn test_mean_reverts_to_long_run_variance() {
        // Start well above the long-run level of 1.0
        let m = model(0.1, 0.85, 3.0, 4.0);
        let long_run = m.long_run_variance().unwrap();
        let path = variance_path(&m, 200).unwrap();

        for w in path.windows(2) {
            assert!((w[1] - long_run).abs() <= (w[0] - long_run).abs() + 1e-12);
        }
        assert!((path[199] - long_run).abs() < 1e-3);
    }

    #[test]
    fn test_non_stationary_forecast_grows() {
        let m = model(0.2, 0.85, 1.0, 1.0);
        let path = variance_path(&m, 30).unwrap();
        assert!(path.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_weekday_calendar() {
        let m = model(0.1, 0.85, 1.0, 1.0);
        let mut config = ForecastConfig::new(3);
        config.calendar = ForecastCalendar::Weekdays;
        let points = GarchForecaster::new(config).forecast(&m, 3).unwrap();
        // 2024-06-28 is a Friday
        assert_eq!(points[0].forecast_date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(points[2].forecast_date, NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
    }
}
