//! Volatility forecaster trait.

use crate::error::Result;
use crate::model::{ForecastPoint, GarchModel};

/// Produces forward volatility forecasts from a fitted model.
pub trait VolatilityForecaster: Send + Sync {
    /// Forecast `horizon` days past the model's last observation.
    fn forecast(&self, model: &GarchModel, horizon: usize) -> Result<Vec<ForecastPoint>>;
}
