//! Model comparison rows.

use serde::{Deserialize, Serialize};

/// One ticker's position in the AIC ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparisonRow {
    pub ticker: String,
    pub aic: f64,
    pub persistence: f64,
    /// 1 = lowest AIC
    pub rank: usize,
    /// Persistence above the configured threshold
    pub high_persistence_flag: bool,
    /// Alpha near zero with beta near one
    pub igarch_like_flag: bool,
}
