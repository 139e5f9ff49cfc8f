//! Per-ticker orchestration: features, fit, forecast and diagnostics, then
//! a cross-ticker comparison of the models that succeeded.

use crate::comparison::AicComparator;
use crate::diagnostics::{summarize_returns, validate_model};
use crate::features::StandardFeatureEngine;
use crate::forecast::GarchForecaster;
use crate::garch::GarchFitter;
use rayon::prelude::*;
use std::collections::BTreeMap;
use volatility_api::PipelineConfig;
use volatility_spi::{
    FeatureEngine, GarchModel, ModelComparator, PriceBar, Result, RunReport, TickerAnalysis,
    TickerFailure, TickerOutcome, VolatilityForecaster, VolatilityModelFitter,
};

/// Volatility pipeline over a multi-ticker price table.
///
/// Each stage is a trait object so alternative engines or fitters can be
/// swapped in with the `with_*` methods.
pub struct VolatilityPipeline {
    config: PipelineConfig,
    engine: Box<dyn FeatureEngine>,
    fitter: Box<dyn VolatilityModelFitter>,
    forecaster: Box<dyn VolatilityForecaster>,
    comparator: Box<dyn ModelComparator>,
}

impl VolatilityPipeline {
    /// Build the standard pipeline after validating `config`.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: Box::new(StandardFeatureEngine::new(config.features.clone())),
            fitter: Box::new(GarchFitter::new(config.fit.clone())),
            forecaster: Box::new(GarchForecaster::new(config.forecast.clone())),
            comparator: Box::new(AicComparator::new(config.comparison.clone())),
            config,
        })
    }

    pub fn with_engine(mut self, engine: Box<dyn FeatureEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_fitter(mut self, fitter: Box<dyn VolatilityModelFitter>) -> Self {
        self.fitter = fitter;
        self
    }

    pub fn with_forecaster(mut self, forecaster: Box<dyn VolatilityForecaster>) -> Self {
        self.forecaster = forecaster;
        self
    }

    pub fn with_comparator(mut self, comparator: Box<dyn ModelComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage for one ticker's ordered bars.
    pub fn analyze_ticker(&self, bars: &[PriceBar]) -> Result<TickerAnalysis> {
        let features = self.engine.compute(bars)?;
        let ticker = features.ticker.clone();
        tracing::debug!(
            ticker = %ticker,
            returns = features.returns.len(),
            "computed features"
        );

        let fit = self.fitter.fit(&ticker, &features.returns)?;
        for warning in &fit.warnings {
            tracing::warn!(ticker = %ticker, "{}", warning);
        }
        tracing::info!(
            ticker = %ticker,
            omega = fit.model.omega,
            alpha = fit.model.alpha,
            beta = fit.model.beta,
            persistence = fit.model.persistence,
            aic = fit.model.aic,
            "fitted GARCH(1,1)"
        );

        let forecast = self
            .forecaster
            .forecast(&fit.model, self.config.forecast.horizon)?;

        let validation = validate_model(&fit.model, &self.config.diagnostics);
        for warning in &validation.warnings {
            tracing::warn!(ticker = %ticker, "{}", warning);
        }
        let return_summary = summarize_returns(&features, &self.config.diagnostics);

        Ok(TickerAnalysis {
            ticker,
            features,
            fit,
            forecast,
            validation,
            return_summary,
        })
    }

    /// Group `bars` by ticker and run [`run_grouped`](Self::run_grouped).
    ///
    /// Bars keep their input order within each ticker.
    pub fn run(&self, bars: &[PriceBar]) -> RunReport {
        let mut groups: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();
        for bar in bars {
            groups.entry(bar.ticker.clone()).or_default().push(bar.clone());
        }
        self.run_grouped(groups)
    }

    /// Analyze each selected ticker independently, then rank the successes.
    ///
    /// A failing ticker becomes a [`TickerFailure`] and never affects the
    /// others. Requested tickers with no bars fail with `InsufficientData`.
    pub fn run_grouped(&self, groups: BTreeMap<String, Vec<PriceBar>>) -> RunReport {
        let mut selected: Vec<(String, Vec<PriceBar>)> = groups
            .into_iter()
            .filter(|(ticker, _)| self.config.includes(ticker))
            .collect();

        for requested in &self.config.tickers {
            if !selected.iter().any(|(t, _)| t.eq_ignore_ascii_case(requested)) {
                tracing::warn!(ticker = %requested, "no data for requested ticker");
                selected.push((requested.clone(), Vec::new()));
            }
        }
        selected.sort_by(|a, b| a.0.cmp(&b.0));

        tracing::info!(tickers = selected.len(), "starting volatility run");

        let analyze = |(ticker, bars): &(String, Vec<PriceBar>)| -> TickerOutcome {
            match self.analyze_ticker(bars) {
                Ok(analysis) => TickerOutcome::Success(Box::new(analysis)),
                Err(error) => {
                    tracing::warn!(ticker = %ticker, kind = error.kind(), "excluded: {}", error);
                    TickerOutcome::Failure(TickerFailure {
                        ticker: ticker.clone(),
                        error,
                    })
                }
            }
        };

        let outcomes: Vec<TickerOutcome> = if self.config.parallel {
            selected.par_iter().map(analyze).collect()
        } else {
            selected.iter().map(analyze).collect()
        };

        let models: Vec<GarchModel> = outcomes
            .iter()
            .filter_map(|o| match o {
                TickerOutcome::Success(analysis) => Some(analysis.fit.model.clone()),
                TickerOutcome::Failure(_) => None,
            })
            .collect();
        let comparison = self.comparator.compare(&models);

        let succeeded = models.len();
        tracing::info!(
            succeeded,
            failed = outcomes.len() - succeeded,
            "volatility run complete"
        );

        RunReport {
            outcomes,
            comparison,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;
    use volatility_spi::{GarchFit, ReturnPoint, VolatilityError};

    fn garch_bars(ticker: &str, n: usize, seed: u64) -> Vec<PriceBar> {
        let (omega, alpha, beta): (f64, f64, f64) = (0.05, 0.1, 0.85);
        simulated_bars(ticker, n, (omega, alpha, beta), omega / (1.0 - alpha - beta), seed)
    }

    fn simulated_bars(
        ticker: &str,
        n: usize,
        (omega, alpha, beta): (f64, f64, f64),
        sigma2_0: f64,
        seed: u64,
    ) -> Vec<PriceBar> {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        let mut sigma2 = sigma2_0;
        let mut price = 100.0_f64;
        (0..n)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i as u64)).unwrap();
                let bar = PriceBar::new(ticker, date, price, price * 1.01, price * 0.99, price, 10_000);
                let z: f64 = rng.sample(StandardNormal);
                let e = sigma2.sqrt() * z;
                price *= (e / 100.0).exp();
                sigma2 = omega + alpha * e * e + beta * sigma2;
                bar
            })
            .collect()
    }

    struct AlwaysFails;

    impl VolatilityModelFitter for AlwaysFails {
        fn fit(&self, ticker: &str, _returns: &[ReturnPoint]) -> Result<GarchFit> {
            Err(VolatilityError::ModelFitFailure {
                ticker: ticker.to_string(),
                reason: "stub".to_string(),
            })
        }
    }

    #[test]
    fn test_run_isolates_short_ticker() {
        let mut bars = garch_bars("AAPL", 600, 1);
        bars.extend(garch_bars("TINY", 10, 2));

        let config = PipelineConfig::builder().parallel(false).build().unwrap();
        let report = VolatilityPipeline::new(config).unwrap().run(&bars);

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].ticker(), "AAPL");
        assert!(report.outcomes[0].is_success());
        match &report.outcomes[1] {
            TickerOutcome::Failure(f) => {
                assert_eq!(f.ticker, "TINY");
                assert!(matches!(f.error, VolatilityError::InsufficientData { .. }));
            }
            other => panic!("Expected failure, got {:?}", other.ticker()),
        }
        assert_eq!(report.comparison.len(), 1);
        assert_eq!(report.comparison[0].ticker, "AAPL");
    }

    #[test]
    fn test_ticker_filter_and_missing_ticker() {
        let mut bars = garch_bars("AAPL", 300, 1);
        bars.extend(garch_bars("MSFT", 300, 2));

        let config = PipelineConfig::builder()
            .tickers(["MSFT", "NFLX"])
            .parallel(false)
            .build()
            .unwrap();
        let report = VolatilityPipeline::new(config).unwrap().run(&bars);

        let tickers: Vec<&str> = report.outcomes.iter().map(|o| o.ticker()).collect();
        assert_eq!(tickers, vec!["MSFT", "NFLX"]);
        match &report.outcomes[1] {
            TickerOutcome::Failure(f) => assert_eq!(
                f.error,
                VolatilityError::InsufficientData {
                    required: 1,
                    actual: 0
                }
            ),
            _ => panic!("NFLX has no data"),
        }
    }

    #[test]
    fn test_stage_failure_is_reported() {
        let bars = garch_bars("IBM", 300, 4);
        let pipeline = VolatilityPipeline::new(PipelineConfig::default())
            .unwrap()
            .with_fitter(Box::new(AlwaysFails));
        let report = pipeline.run(&bars);

        assert_eq!(report.failures().count(), 1);
        assert!(report.comparison.is_empty());
        assert_eq!(report.summary().failed[0].kind, "model_fit_failure");
    }

    #[test]
    fn test_non_stationary_ticker_still_forecasts() {
        let mut bars = garch_bars("AAPL", 400, 1);
        bars.extend(simulated_bars("BOOM", 401, (0.01, 0.25, 0.80), 1.0, 0));

        let config = PipelineConfig::builder().parallel(false).build().unwrap();
        let report = VolatilityPipeline::new(config).unwrap().run(&bars);

        assert_eq!(report.failures().count(), 0);
        let boom = report
            .successes()
            .find(|a| a.ticker == "BOOM")
            .expect("BOOM should succeed");
        assert!(boom.fit.model.persistence >= 1.0);
        assert_eq!(boom.forecast.len(), 14);
        assert!(boom
            .forecast
            .windows(2)
            .all(|w| w[1].predicted_variance >= w[0].predicted_variance));

        let summary = report.summary();
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.ticker == "BOOM" && w.message.starts_with("Non-stationary model")));
        assert!(report.comparison.iter().any(|r| r.ticker == "BOOM" && r.high_persistence_flag));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut bars = garch_bars("AAA", 400, 7);
        bars.extend(garch_bars("BBB", 400, 8));
        bars.extend(garch_bars("CCC", 400, 9));

        let seq = PipelineConfig::builder().parallel(false).build().unwrap();
        let par = PipelineConfig::builder().parallel(true).build().unwrap();
        let a = VolatilityPipeline::new(seq).unwrap().run(&bars);
        let b = VolatilityPipeline::new(par).unwrap().run(&bars);
        assert_eq!(a, b);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = PipelineConfig::default();
        config.forecast.horizon = 0;
        assert!(matches!(
            VolatilityPipeline::new(config),
            Err(VolatilityError::InvalidHorizon { horizon: 0 })
        ));
    }
}
