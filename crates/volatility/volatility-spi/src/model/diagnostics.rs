//! Post-fit diagnostics and return-quality summaries.

use serde::{Deserialize, Serialize};

/// Sanity checks on a fitted model's parameters and sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelValidation {
    pub ticker: String,
    /// persistence < 1
    pub persistence_stable: bool,
    /// alpha above the weak-effect cutoff
    pub alpha_significant: bool,
    /// beta above the weak-effect cutoff
    pub beta_significant: bool,
    /// More observations than the small-sample cutoff
    pub adequate_sample: bool,
    pub warnings: Vec<String>,
}

impl ModelValidation {
    /// True when every check passed.
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Descriptive statistics of a ticker's log returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub ticker: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub skewness: f64,
    /// Excess kurtosis (normal = 0)
    pub kurtosis: f64,
    /// Returns with absolute value above the extreme-move cutoff
    pub extreme_returns: usize,
    /// Bars without a return (the first bar)
    pub missing_returns: usize,
}
