//! Fitted GARCH(1,1) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Innovation distribution used by the likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    #[default]
    Normal,
    StudentT,
}

impl Distribution {
    /// Free parameters including the constant mean.
    pub fn parameter_count(&self) -> usize {
        match self {
            Distribution::Normal => 4,
            Distribution::StudentT => 5,
        }
    }
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distribution::Normal => write!(f, "normal"),
            Distribution::StudentT => write!(f, "t"),
        }
    }
}

impl FromStr for Distribution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "gaussian" => Ok(Distribution::Normal),
            "t" | "student-t" | "studentt" | "student_t" => Ok(Distribution::StudentT),
            other => Err(format!("unknown distribution '{}'", other)),
        }
    }
}

/// GARCH(1,1) fit for one ticker.
///
/// Parameters live on the scaled-return axis (`returns * return_scale`), so
/// with the default scale of 100 `omega` is in squared percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarchModel {
    pub ticker: String,
    pub distribution: Distribution,
    /// Constant mean of the scaled returns
    pub mu: f64,
    pub omega: f64,
    pub alpha: f64,
    pub beta: f64,
    /// Student-t degrees of freedom
    pub nu: Option<f64>,
    /// `alpha + beta`
    pub persistence: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub n_observations: usize,
    pub return_scale: f64,
    /// Optimizer iterations used
    pub iterations: usize,
    /// Date of the last return used in the fit
    pub last_date: NaiveDate,
    /// Last demeaned scaled residual
    pub last_residual: f64,
    /// Conditional variance at the last observation
    pub last_variance: f64,
}

impl GarchModel {
    /// Whether the variance process is covariance-stationary.
    pub fn is_stationary(&self) -> bool {
        self.persistence < 1.0
    }

    /// Unconditional variance `omega / (1 - persistence)` on the scaled axis.
    pub fn long_run_variance(&self) -> Option<f64> {
        if self.is_stationary() {
            Some(self.omega / (1.0 - self.persistence))
        } else {
            None
        }
    }

    /// Periods for a variance shock to decay by half.
    pub fn half_life(&self) -> Option<f64> {
        if self.persistence >= 1.0 || self.persistence <= 0.0 {
            None
        } else {
            Some(-(2.0_f64.ln()) / self.persistence.ln())
        }
    }
}

/// Informational conditions attached to a successful fit.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum FitWarning {
    /// Persistence at or above one: forecasts never revert to a long-run level
    #[error("Non-stationary model: persistence {persistence:.4} >= 1")]
    NonStationary { persistence: f64 },
}

/// A fitted model together with its warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarchFit {
    pub model: GarchModel,
    pub warnings: Vec<FitWarning>,
}
