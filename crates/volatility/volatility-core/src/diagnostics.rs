//! Post-fit model validation and return-quality summaries.

use crate::stats::{excess_kurtosis, mean, sample_std, skewness};
use volatility_api::DiagnosticsConfig;
use volatility_spi::{FeatureSet, GarchModel, ModelValidation, ReturnSummary};

/// Sanity-check a fitted model's parameters and sample size.
pub fn validate_model(model: &GarchModel, config: &DiagnosticsConfig) -> ModelValidation {
    let persistence_stable = model.persistence < 1.0;
    let alpha_significant = model.alpha > config.weak_effect_cutoff;
    let beta_significant = model.beta > config.weak_effect_cutoff;
    let adequate_sample = model.n_observations > config.adequate_sample;

    let mut warnings = Vec::new();
    if !persistence_stable {
        warnings.push(format!(
            "Non-stationary model (persistence {:.4} >= 1)",
            model.persistence
        ));
    }
    if !alpha_significant {
        warnings.push(format!("Weak ARCH effect (alpha {:.4})", model.alpha));
    }
    if !beta_significant {
        warnings.push(format!("Weak GARCH effect (beta {:.4})", model.beta));
    }
    if !adequate_sample {
        warnings.push(format!(
            "Small sample size ({} observations)",
            model.n_observations
        ));
    }

    ModelValidation {
        ticker: model.ticker.clone(),
        persistence_stable,
        alpha_significant,
        beta_significant,
        adequate_sample,
        warnings,
    }
}

/// Descriptive statistics of a feature set's log returns.
pub fn summarize_returns(features: &FeatureSet, config: &DiagnosticsConfig) -> ReturnSummary {
    let returns = features.log_returns();
    let (min, max) = if returns.is_empty() {
        (0.0, 0.0)
    } else {
        (
            returns.iter().cloned().fold(f64::INFINITY, f64::min),
            returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        )
    };

    ReturnSummary {
        ticker: features.ticker.clone(),
        count: returns.len(),
        mean: mean(&returns),
        std: sample_std(&returns),
        min,
        max,
        skewness: skewness(&returns),
        kurtosis: excess_kurtosis(&returns),
        extreme_returns: returns
            .iter()
            .filter(|r| r.abs() > config.extreme_return)
            .count(),
        missing_returns: features
            .rows
            .iter()
            .filter(|row| row.log_return.is_none())
            .count(),
    }
}
