//! Feature engine outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Log return for one day. The first bar of a ticker has none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub log_return: f64,
}

/// Rolling annualized volatility aligned with a [`ReturnPoint`].
///
/// `annualized_vol` is `None` until a full window of returns exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub annualized_vol: Option<f64>,
}

/// Scalar risk metrics over a ticker's full return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Most negative single-day log return
    pub max_daily_loss: f64,
    /// Most positive single-day log return
    pub max_daily_gain: f64,
    /// `exp(sum(log_returns)) - 1`
    pub cumulative_return: f64,
}

/// One row of the feature table artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub log_return: Option<f64>,
    pub rolling_volatility: Option<f64>,
    pub cumulative_return: f64,
}

/// Everything the feature engine derives for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub ticker: String,
    /// Rolling window the volatility series was computed with
    pub window: usize,
    pub returns: Vec<ReturnPoint>,
    /// Same length and dates as `returns`
    pub volatility: Vec<VolatilityPoint>,
    /// One row per input bar
    pub rows: Vec<FeatureRow>,
    /// `None` when the series has fewer than two bars
    pub risk: Option<RiskMetrics>,
}

impl FeatureSet {
    /// Raw log-return values in date order.
    pub fn log_returns(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.log_return).collect()
    }

    /// Number of defined volatility entries.
    pub fn defined_volatility_count(&self) -> usize {
        self.volatility
            .iter()
            .filter(|v| v.annualized_vol.is_some())
            .count()
    }

    /// Most recent defined rolling volatility.
    pub fn latest_volatility(&self) -> Option<f64> {
        self.volatility.iter().rev().find_map(|v| v.annualized_vol)
    }
}
