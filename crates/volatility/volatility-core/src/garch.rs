//! GARCH(1,1) maximum-likelihood fitting.
//!
//! The mean equation is a constant (the sample mean of the scaled returns)
//! and the variance equation is
//!
//! ```text
//! sigma2[t] = omega + alpha * e[t-1]^2 + beta * sigma2[t-1]
//! ```
//!
//! seeded with the sample variance of the residuals. Parameters are estimated
//! by Nelder-Mead over an unconstrained reparameterization:
//! `omega = exp(x0)`, `alpha = logistic(x1)`, `beta = logistic(x2)` and, for
//! Student-t innovations, `nu = 2 + NU_FLOOR_OFFSET + exp(x3)`.

use crate::optimizer::NelderMead;
use crate::stats::mean;
use statrs::function::gamma::ln_gamma;
use std::f64::consts::PI;
use volatility_api::FitConfig;
use volatility_spi::{
    Distribution, FitWarning, GarchFit, GarchModel, Result, ReturnPoint, VolatilityError,
    VolatilityModelFitter,
};

const MIN_VARIANCE: f64 = 1e-12;
const NU_FLOOR_OFFSET: f64 = 0.01;

const START_ALPHA: f64 = 0.05;
const START_BETA: f64 = 0.90;
const START_OMEGA_SHARE: f64 = 0.05;
const START_NU: f64 = 8.0;

/// GARCH(1,1) fitter.
#[derive(Debug, Clone, Default)]
pub struct GarchFitter {
    config: FitConfig,
}

impl GarchFitter {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    fn failure(ticker: &str, reason: impl Into<String>) -> VolatilityError {
        VolatilityError::ModelFitFailure {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }
}

impl VolatilityModelFitter for GarchFitter {
    fn fit(&self, ticker: &str, returns: &[ReturnPoint]) -> Result<GarchFit> {
        let distribution = self.config.distribution;
        let required = self
            .config
            .min_observations
            .max(distribution.parameter_count() + 1);
        let n = returns.len();
        if n < required {
            return Err(VolatilityError::InsufficientData {
                required,
                actual: n,
            });
        }

        let scale = self.config.return_scale;
        let scaled: Vec<f64> = returns.iter().map(|r| r.log_return * scale).collect();
        if let Some(pos) = scaled.iter().position(|r| !r.is_finite()) {
            return Err(VolatilityError::DataIntegrity {
                ticker: ticker.to_string(),
                reason: format!("non-finite return on {}", returns[pos].date),
            });
        }

        let mu = mean(&scaled);
        let residuals: Vec<f64> = scaled.iter().map(|r| r - mu).collect();
        let sample_var = residuals.iter().map(|e| e * e).sum::<f64>() / n as f64;
        if sample_var <= MIN_VARIANCE {
            return Err(Self::failure(ticker, "zero variance in returns"));
        }

        let objective = |theta: &[f64]| {
            let params = Params::decode(theta, distribution);
            -log_likelihood(&residuals, &params, sample_var)
        };

        let mut start = vec![
            (START_OMEGA_SHARE * sample_var).ln(),
            logit(START_ALPHA),
            logit(START_BETA),
        ];
        if distribution == Distribution::StudentT {
            start.push((START_NU - 2.0 - NU_FLOOR_OFFSET).ln());
        }

        let optimizer = NelderMead::new(self.config.max_iterations, self.config.tolerance);
        let minimum = optimizer.minimize(objective, &start);

        if !minimum.converged {
            return Err(Self::failure(
                ticker,
                format!(
                    "optimizer did not converge within {} iterations",
                    self.config.max_iterations
                ),
            ));
        }

        let params = Params::decode(&minimum.point, distribution);
        let log_likelihood = -minimum.value;
        if !log_likelihood.is_finite() {
            return Err(Self::failure(ticker, "non-finite log-likelihood"));
        }
        if params.omega < MIN_VARIANCE * sample_var {
            return Err(Self::failure(
                ticker,
                format!("omega collapsed to the boundary ({:.3e})", params.omega),
            ));
        }
        if params.alpha >= 1.0 || params.beta >= 1.0 {
            return Err(Self::failure(
                ticker,
                format!(
                    "degenerate estimate alpha={:.4} beta={:.4}",
                    params.alpha, params.beta
                ),
            ));
        }

        let variances = conditional_variance(
            &residuals,
            params.omega,
            params.alpha,
            params.beta,
            sample_var,
        );
        let k = distribution.parameter_count() as f64;
        let persistence = params.alpha + params.beta;

        let mut warnings = Vec::new();
        if persistence >= 1.0 {
            warnings.push(FitWarning::NonStationary { persistence });
        }

        let last = &returns[n - 1];
        let model = GarchModel {
            ticker: ticker.to_string(),
            distribution,
            mu,
            omega: params.omega,
            alpha: params.alpha,
            beta: params.beta,
            nu: params.nu,
            persistence,
            log_likelihood,
            aic: 2.0 * k - 2.0 * log_likelihood,
            bic: k * (n as f64).ln() - 2.0 * log_likelihood,
            n_observations: n,
            return_scale: scale,
            iterations: minimum.iterations,
            last_date: last.date,
            last_residual: residuals[n - 1],
            last_variance: variances[n - 1],
        };

        Ok(GarchFit { model, warnings })
    }
}

#[derive(Debug, Clone, Copy)]
struct Params {
    omega: f64,
    alpha: f64,
    beta: f64,
    nu: Option<f64>,
}

impl Params {
    fn decode(theta: &[f64], distribution: Distribution) -> Self {
        let nu = match distribution {
            Distribution::Normal => None,
            Distribution::StudentT => Some(2.0 + NU_FLOOR_OFFSET + theta[3].exp()),
        };
        Self {
            omega: theta[0].exp(),
            alpha: logistic(theta[1]),
            beta: logistic(theta[2]),
            nu,
        }
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Conditional variance path for demeaned `residuals`.
///
/// `sigma2[0]` is `backcast`; later entries follow the GARCH(1,1) recursion.
pub fn conditional_variance(
    residuals: &[f64],
    omega: f64,
    alpha: f64,
    beta: f64,
    backcast: f64,
) -> Vec<f64> {
    let mut sigma2 = Vec::with_capacity(residuals.len());
    if residuals.is_empty() {
        return sigma2;
    }
    sigma2.push(backcast);
    for t in 1..residuals.len() {
        let prev = sigma2[t - 1];
        sigma2.push(omega + alpha * residuals[t - 1].powi(2) + beta * prev);
    }
    sigma2
}

/// Gaussian log-likelihood of `residuals` given their conditional variances.
///
/// Returns `-inf` if any variance is non-positive or non-finite.
pub fn gaussian_log_likelihood(residuals: &[f64], variances: &[f64]) -> f64 {
    let ln_2pi = (2.0 * PI).ln();
    let mut ll = 0.0;
    for (e, s2) in residuals.iter().zip(variances) {
        if !(*s2 > 0.0) || !s2.is_finite() {
            return f64::NEG_INFINITY;
        }
        ll -= 0.5 * (ln_2pi + s2.ln() + e * e / s2);
    }
    ll
}

/// Standardized Student-t log-likelihood with `nu > 2` degrees of freedom.
///
/// Returns `-inf` if any variance is non-positive or non-finite.
pub fn student_t_log_likelihood(residuals: &[f64], variances: &[f64], nu: f64) -> f64 {
    if !(nu > 2.0) || !nu.is_finite() {
        return f64::NEG_INFINITY;
    }
    let constant =
        ln_gamma((nu + 1.0) / 2.0) - ln_gamma(nu / 2.0) - 0.5 * (PI * (nu - 2.0)).ln();
    let mut ll = 0.0;
    for (e, s2) in residuals.iter().zip(variances) {
        if !(*s2 > 0.0) || !s2.is_finite() {
            return f64::NEG_INFINITY;
        }
        ll += constant
            - 0.5 * s2.ln()
            - 0.5 * (nu + 1.0) * (1.0 + e * e / (s2 * (nu - 2.0))).ln();
    }
    ll
}

fn log_likelihood(residuals: &[f64], params: &Params, backcast: f64) -> f64 {
    let variances = conditional_variance(
        residuals,
        params.omega,
        params.alpha,
        params.beta,
        backcast,
    );
    match params.nu {
        None => gaussian_log_likelihood(residuals, &variances),
        Some(nu) => student_t_log_likelihood(residuals, &variances, nu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{StandardNormal, StudentT};

    /// Simulate GARCH(1,1) returns in decimal units; parameters are in percent.
    fn simulate(n: usize, omega: f64, alpha: f64, beta: f64, seed: u64) -> Vec<ReturnPoint> {
        simulate_from(n, omega, alpha, beta, omega / (1.0 - alpha - beta), seed)
    }

    /// Same recursion started from an explicit variance, for explosive parameters.
    fn simulate_from(
        n: usize,
        omega: f64,
        alpha: f64,
        beta: f64,
        sigma2_0: f64,
        seed: u64,
    ) -> Vec<ReturnPoint> {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let mut sigma2 = sigma2_0;
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let z: f64 = rng.sample(StandardNormal);
            let e = sigma2.sqrt() * z;
            points.push(ReturnPoint {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                log_return: e / 100.0,
            });
            sigma2 = omega + alpha * e * e + beta * sigma2;
        }
        points
    }

    fn simulate_t(n: usize, nu: f64, seed: u64) -> Vec<ReturnPoint> {
        let (omega, alpha, beta): (f64, f64, f64) = (0.05, 0.08, 0.88);
        let dist = StudentT::new(nu).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let mut sigma2 = omega / (1.0 - alpha - beta);
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let z: f64 = rng.sample(&dist) * ((nu - 2.0) / nu).sqrt();
            let e = sigma2.sqrt() * z;
            points.push(ReturnPoint {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                log_return: e / 100.0,
            });
            sigma2 = omega + alpha * e * e + beta * sigma2;
        }
        points
    }

    #[test]
    fn test_conditional_variance_recursion() {
        let residuals = vec![1.0, -2.0, 0.5];
        let s = conditional_variance(&residuals, 0.1, 0.2, 0.7, 1.5);
        assert_eq!(s.len(), 3);
        assert!((s[0] - 1.5).abs() < 1e-12);
        assert!((s[1] - (0.1 + 0.2 * 1.0 + 0.7 * 1.5)).abs() < 1e-12);
        assert!((s[2] - (0.1 + 0.2 * 4.0 + 0.7 * s[1])).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_log_likelihood_unit_variance() {
        let ll = gaussian_log_likelihood(&[0.0], &[1.0]);
        assert!((ll + 0.5 * (2.0 * PI).ln()).abs() < 1e-12);
        assert_eq!(gaussian_log_likelihood(&[0.0], &[0.0]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_student_t_approaches_gaussian() {
        let residuals = vec![0.3, -1.2, 0.8, 0.1];
        let variances = vec![1.0, 1.1, 0.9, 1.0];
        let gauss = gaussian_log_likelihood(&residuals, &variances);
        let t = student_t_log_likelihood(&residuals, &variances, 1e6);
        assert!((gauss - t).abs() < 1e-3);
        assert_eq!(
            student_t_log_likelihood(&residuals, &variances, 2.0),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_recovers_simulated_parameters() {
        let returns = simulate(2000, 0.05, 0.1, 0.85, 42);
        let fit = GarchFitter::default().fit("SIM", &returns).unwrap();
        let m = &fit.model;

        assert!(m.alpha > 0.03 && m.alpha < 0.2, "alpha = {}", m.alpha);
        assert!(m.beta > 0.7 && m.beta < 0.97, "beta = {}", m.beta);
        assert!(m.persistence > 0.85 && m.persistence < 1.0);
        assert!(m.omega > 0.0);
        assert!(fit.warnings.is_empty());
        assert_eq!(m.n_observations, 2000);
        assert_eq!(m.last_date, returns[1999].date);
        assert!(m.last_variance > 0.0);
        assert!((m.aic - (8.0 - 2.0 * m.log_likelihood)).abs() < 1e-9);
        assert!((m.bic - (4.0 * 2000_f64.ln() - 2.0 * m.log_likelihood)).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_data() {
        let returns = simulate(10, 0.05, 0.1, 0.85, 7);
        let result = GarchFitter::default().fit("TINY", &returns);
        assert_eq!(
            result,
            Err(VolatilityError::InsufficientData {
                required: 30,
                actual: 10
            })
        );
    }

    #[test]
    fn test_constant_returns_fail() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let returns: Vec<ReturnPoint> = (0..100)
            .map(|i| ReturnPoint {
                date: start.checked_add_days(Days::new(i)).unwrap(),
                log_return: 0.0,
            })
            .collect();
        let result = GarchFitter::default().fit("FLAT", &returns);
        assert!(matches!(
            result,
            Err(VolatilityError::ModelFitFailure { ref ticker, .. }) if ticker == "FLAT"
        ));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let returns = simulate(500, 0.05, 0.1, 0.85, 3);
        let fitter = GarchFitter::default();
        assert_eq!(fitter.fit("DET", &returns), fitter.fit("DET", &returns));
    }

    #[test]
    fn test_student_t_fit() {
        let returns = simulate_t(2000, 5.0, 11);
        let fitter = GarchFitter::new(FitConfig::new(30, Distribution::StudentT));
        let fit = fitter.fit("FAT", &returns).unwrap();
        let m = &fit.model;

        let nu = m.nu.unwrap();
        assert!(nu > 3.0 && nu < 15.0, "nu = {}", nu);
        assert_eq!(m.distribution, Distribution::StudentT);
        assert!((m.aic - (10.0 - 2.0 * m.log_likelihood)).abs() < 1e-9);

        let normal = GarchFitter::default().fit("FAT", &returns).unwrap();
        assert!(m.log_likelihood > normal.model.log_likelihood);
    }

    #[test]
    fn test_explosive_fit_is_kept_with_warning() {
        let returns = simulate_from(400, 0.01, 0.25, 0.80, 1.0, 0);
        let fit = GarchFitter::default().fit("BOOM", &returns).unwrap();

        assert!(fit.model.persistence >= 1.0, "persistence = {}", fit.model.persistence);
        assert!(!fit.model.is_stationary());
        assert_eq!(
            fit.warnings,
            vec![FitWarning::NonStationary {
                persistence: fit.model.persistence
            }]
        );
    }

    #[test]
    fn test_iteration_cap_is_a_fit_failure() {
        let returns = simulate(300, 0.05, 0.1, 0.85, 5);
        let mut config = FitConfig::default();
        config.max_iterations = 2;
        let result = GarchFitter::new(config).fit("CAP", &returns);
        assert!(matches!(result, Err(VolatilityError::ModelFitFailure { .. })));
    }
}
