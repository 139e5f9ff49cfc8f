//! Volatility model fitter trait.

use crate::error::Result;
use crate::model::{GarchFit, ReturnPoint};

/// Fits a conditional variance model to a return series.
pub trait VolatilityModelFitter: Send + Sync {
    /// Fit the model for `ticker`.
    ///
    /// Fails with `InsufficientData` below the minimum sample size and with
    /// `ModelFitFailure` when the optimizer cannot produce a valid fit.
    fn fit(&self, ticker: &str, returns: &[ReturnPoint]) -> Result<GarchFit>;
}
