//! Feature engine trait.

use crate::error::Result;
use crate::model::{FeatureSet, PriceBar};

/// Turns one ticker's ordered price bars into returns, volatility and risk metrics.
pub trait FeatureEngine: Send + Sync {
    /// Compute features for a single ticker.
    ///
    /// Fails with `DataIntegrity` for malformed or unordered bars.
    fn compute(&self, bars: &[PriceBar]) -> Result<FeatureSet>;
}
