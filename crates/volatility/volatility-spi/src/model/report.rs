//! Per-ticker outcomes and the aggregate run report.

use super::{FeatureSet, ForecastPoint, GarchFit, ModelComparisonRow, ModelValidation, ReturnSummary};
use crate::error::VolatilityError;
use serde::{Deserialize, Serialize};

/// Everything produced for a ticker that made it through every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub features: FeatureSet,
    pub fit: GarchFit,
    pub forecast: Vec<ForecastPoint>,
    pub validation: ModelValidation,
    pub return_summary: ReturnSummary,
}

/// A ticker excluded from the run and the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: VolatilityError,
}

/// Success payload or typed failure for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Success(Box<TickerAnalysis>),
    Failure(TickerFailure),
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Success(analysis) => &analysis.ticker,
            TickerOutcome::Failure(failure) => &failure.ticker,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TickerOutcome::Success(_))
    }
}

/// Result of a full pipeline run, outcomes ordered by ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<TickerOutcome>,
    pub comparison: Vec<ModelComparisonRow>,
}

impl RunReport {
    /// Successful analyses in ticker order.
    pub fn successes(&self) -> impl Iterator<Item = &TickerAnalysis> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Success(analysis) => Some(analysis.as_ref()),
            TickerOutcome::Failure(_) => None,
        })
    }

    /// Excluded tickers in ticker order.
    pub fn failures(&self) -> impl Iterator<Item = &TickerFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Failure(failure) => Some(failure),
            TickerOutcome::Success(_) => None,
        })
    }

    /// Flatten into the serializable run summary.
    pub fn summary(&self) -> RunSummary {
        let succeeded = self.successes().map(|a| a.ticker.clone()).collect();
        let failed = self
            .failures()
            .map(|f| FailedTicker {
                ticker: f.ticker.clone(),
                kind: f.error.kind().to_string(),
                reason: f.error.to_string(),
            })
            .collect();
        let warnings = self
            .successes()
            .flat_map(|a| {
                a.fit
                    .warnings
                    .iter()
                    .map(|w| w.to_string())
                    .chain(a.validation.warnings.iter().cloned())
                    .map(move |message| TickerWarning {
                        ticker: a.ticker.clone(),
                        message,
                    })
            })
            .collect();

        RunSummary {
            succeeded,
            failed,
            warnings,
        }
    }
}

/// Ticker excluded from a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedTicker {
    pub ticker: String,
    pub kind: String,
    pub reason: String,
}

/// Warning raised for a ticker that still succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerWarning {
    pub ticker: String,
    pub message: String,
}

/// User-facing summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedTicker>,
    pub warnings: Vec<TickerWarning>,
}
