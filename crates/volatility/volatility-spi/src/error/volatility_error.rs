//! Volatility analytics error types.

use thiserror::Error;

/// Errors raised by the feature engine, fitter, forecaster and configuration.
///
/// Every per-ticker failure in a pipeline run is one of these variants, so the
/// orchestrator can report exclusions without parsing log output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolatilityError {
    /// Series too short for returns, volatility or a model fit
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Malformed price bar or ordering violation
    #[error("Data integrity violation for '{ticker}': {reason}")]
    DataIntegrity { ticker: String, reason: String },

    /// Optimizer non-convergence, degenerate input or boundary solution
    #[error("Model fit failed for '{ticker}': {reason}")]
    ModelFitFailure { ticker: String, reason: String },

    /// Non-positive forecast horizon
    #[error("Invalid forecast horizon {horizon}: must be at least 1")]
    InvalidHorizon { horizon: i64 },

    /// Configuration value out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl VolatilityError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            VolatilityError::InsufficientData { .. } => "insufficient_data",
            VolatilityError::DataIntegrity { .. } => "data_integrity",
            VolatilityError::ModelFitFailure { .. } => "model_fit_failure",
            VolatilityError::InvalidHorizon { .. } => "invalid_horizon",
            VolatilityError::InvalidParameter { .. } => "invalid_parameter",
        }
    }

    pub(crate) fn integrity(ticker: &str, reason: impl Into<String>) -> Self {
        VolatilityError::DataIntegrity {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for volatility operations.
pub type Result<T> = std::result::Result<T, VolatilityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let error = VolatilityError::InsufficientData {
            required: 30,
            actual: 9,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient data: need at least 30 observations, got 9"
        );
        assert_eq!(error.kind(), "insufficient_data");
    }

    #[test]
    fn test_data_integrity_message() {
        let error = VolatilityError::integrity("AAPL", "high 9.5 below low 10");
        assert_eq!(
            error.to_string(),
            "Data integrity violation for 'AAPL': high 9.5 below low 10"
        );
    }

    #[test]
    fn test_model_fit_failure_message() {
        let error = VolatilityError::ModelFitFailure {
            ticker: "TSLA".to_string(),
            reason: "iteration limit reached".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Model fit failed for 'TSLA': iteration limit reached"
        );
        assert_eq!(error.kind(), "model_fit_failure");
    }

    #[test]
    fn test_invalid_horizon_message() {
        let error = VolatilityError::InvalidHorizon { horizon: -3 };
        assert_eq!(
            error.to_string(),
            "Invalid forecast horizon -3: must be at least 1"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(VolatilityError::InvalidParameter {
            name: "volatility_window".to_string(),
            reason: "must be at least 2".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'volatility_window': must be at least 2"
        );
    }
}
