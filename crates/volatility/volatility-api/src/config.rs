//! Volatility pipeline configuration types.

use serde::{Deserialize, Serialize};
use volatility_spi::{Distribution, ForecastCalendar, Result, VolatilityError};

/// Trading days per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

fn invalid(name: &str, reason: impl Into<String>) -> VolatilityError {
    VolatilityError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

// ============================================================================
// Feature Configuration
// ============================================================================

/// Feature engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Rolling window (in returns) for the volatility series.
    pub volatility_window: usize,
    /// Annualization factor applied as `sqrt(factor)`.
    pub annualization_factor: f64,
}

impl FeatureConfig {
    pub fn new(volatility_window: usize) -> Self {
        Self {
            volatility_window,
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.volatility_window < 2 {
            return Err(invalid("volatility_window", "must be at least 2"));
        }
        if !(self.annualization_factor > 0.0) {
            return Err(invalid("annualization_factor", "must be positive"));
        }
        Ok(())
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self::new(14)
    }
}

// ============================================================================
// Fit Configuration
// ============================================================================

/// GARCH fitter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Minimum number of returns required to attempt a fit.
    pub min_observations: usize,
    /// Innovation distribution for the likelihood.
    pub distribution: Distribution,
    /// Returns are multiplied by this before fitting (100 = percent).
    pub return_scale: f64,
    /// Optimizer iteration cap.
    pub max_iterations: usize,
    /// Simplex convergence tolerance on the objective spread.
    pub tolerance: f64,
}

impl FitConfig {
    pub fn new(min_observations: usize, distribution: Distribution) -> Self {
        Self {
            min_observations,
            distribution,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = self.distribution.parameter_count() + 1;
        if self.min_observations < required {
            return Err(invalid(
                "min_observations",
                format!("must be at least {} for a {} fit", required, self.distribution),
            ));
        }
        if !(self.return_scale > 0.0) || !self.return_scale.is_finite() {
            return Err(invalid("return_scale", "must be a positive number"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be at least 1"));
        }
        if !(self.tolerance > 0.0) {
            return Err(invalid("tolerance", "must be positive"));
        }
        Ok(())
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_observations: 30,
            distribution: Distribution::Normal,
            return_scale: 100.0,
            max_iterations: 2000,
            tolerance: 1e-8,
        }
    }
}

// ============================================================================
// Forecast Configuration
// ============================================================================

/// Forecaster configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days ahead to forecast.
    pub horizon: usize,
    /// Date spacing of forecast points.
    pub calendar: ForecastCalendar,
    /// Annualization factor applied as `sqrt(factor)`.
    pub annualization_factor: f64,
}

impl ForecastConfig {
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(VolatilityError::InvalidHorizon { horizon: 0 });
        }
        if !(self.annualization_factor > 0.0) {
            return Err(invalid("annualization_factor", "must be positive"));
        }
        Ok(())
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 14,
            calendar: ForecastCalendar::Calendar,
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

// ============================================================================
// Comparison Configuration
// ============================================================================

/// Model comparator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Persistence above this is flagged as high-persistence.
    pub persistence_threshold: f64,
    /// IGARCH-like when alpha is below this...
    pub igarch_alpha_max: f64,
    /// ...and beta is above this.
    pub igarch_beta_min: f64,
}

impl ComparisonConfig {
    pub fn new(persistence_threshold: f64) -> Self {
        Self {
            persistence_threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.persistence_threshold > 0.0) || !self.persistence_threshold.is_finite() {
            return Err(invalid("persistence_threshold", "must be a positive number"));
        }
        Ok(())
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            persistence_threshold: 0.98,
            igarch_alpha_max: 0.02,
            igarch_beta_min: 0.97,
        }
    }
}

// ============================================================================
// Diagnostics Configuration
// ============================================================================

/// Cutoffs for model validation and return-quality checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Alpha or beta at or below this counts as a weak effect.
    pub weak_effect_cutoff: f64,
    /// Samples at or below this count are flagged as small.
    pub adequate_sample: usize,
    /// Absolute log return above this counts as extreme.
    pub extreme_return: f64,
}

impl DiagnosticsConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.weak_effect_cutoff >= 0.0) || self.weak_effect_cutoff >= 1.0 {
            return Err(invalid("weak_effect_cutoff", "must be in [0, 1)"));
        }
        if !(self.extreme_return > 0.0) || !self.extreme_return.is_finite() {
            return Err(invalid("extreme_return", "must be a positive number"));
        }
        Ok(())
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            weak_effect_cutoff: 0.01,
            adequate_sample: 100,
            extreme_return: 0.5,
        }
    }
}

// ============================================================================
// Pipeline Configuration
// ============================================================================

/// Immutable configuration for a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Tickers to process; empty means every ticker in the input.
    pub tickers: Vec<String>,
    pub features: FeatureConfig,
    pub fit: FitConfig,
    pub forecast: ForecastConfig,
    pub comparison: ComparisonConfig,
    pub diagnostics: DiagnosticsConfig,
    /// Process tickers on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            features: FeatureConfig::default(),
            fit: FitConfig::default(),
            forecast: ForecastConfig::default(),
            comparison: ComparisonConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.features.validate()?;
        self.fit.validate()?;
        self.forecast.validate()?;
        self.comparison.validate()?;
        self.diagnostics.validate()?;
        Ok(())
    }

    /// Whether `ticker` is selected by the ticker list.
    pub fn includes(&self, ticker: &str) -> bool {
        self.tickers.is_empty() || self.tickers.iter().any(|t| t.eq_ignore_ascii_case(ticker))
    }

    /// Load from process environment variables on top of the defaults.
    ///
    /// Recognized keys: `TICKERS`, `VOLATILITY_WINDOW`, `FORECAST_HORIZON`,
    /// `FORECAST_CALENDAR`, `PERSISTENCE_THRESHOLD`, `MIN_FIT_OBSERVATIONS`,
    /// `GARCH_DIST`, `RETURN_SCALE`, `PARALLEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get("TICKERS") {
            builder = builder.tickers(parse_tickers(&raw));
        }
        if let Some(raw) = get("VOLATILITY_WINDOW") {
            builder = builder.volatility_window(parse_value("VOLATILITY_WINDOW", &raw)?);
        }
        if let Some(raw) = get("FORECAST_HORIZON") {
            let horizon: i64 = parse_value("FORECAST_HORIZON", &raw)?;
            if horizon <= 0 {
                return Err(VolatilityError::InvalidHorizon { horizon });
            }
            builder = builder.forecast_horizon(horizon as usize);
        }
        if let Some(raw) = get("FORECAST_CALENDAR") {
            let calendar = raw
                .parse::<ForecastCalendar>()
                .map_err(|e| invalid("FORECAST_CALENDAR", e))?;
            builder = builder.forecast_calendar(calendar);
        }
        if let Some(raw) = get("PERSISTENCE_THRESHOLD") {
            builder = builder.persistence_threshold(parse_value("PERSISTENCE_THRESHOLD", &raw)?);
        }
        if let Some(raw) = get("MIN_FIT_OBSERVATIONS") {
            builder = builder.min_observations(parse_value("MIN_FIT_OBSERVATIONS", &raw)?);
        }
        if let Some(raw) = get("GARCH_DIST") {
            let dist = raw
                .parse::<Distribution>()
                .map_err(|e| invalid("GARCH_DIST", e))?;
            builder = builder.distribution(dist);
        }
        if let Some(raw) = get("RETURN_SCALE") {
            builder = builder.return_scale(parse_value("RETURN_SCALE", &raw)?);
        }
        if let Some(raw) = get("PARALLEL") {
            builder = builder.parallel(parse_value("PARALLEL", &raw)?);
        }

        builder.build()
    }
}

fn parse_tickers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| invalid(key, format!("cannot parse '{}': {}", raw.trim(), e)))
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    pub fn volatility_window(mut self, window: usize) -> Self {
        self.config.features.volatility_window = window;
        self
    }

    pub fn forecast_horizon(mut self, horizon: usize) -> Self {
        self.config.forecast.horizon = horizon;
        self
    }

    pub fn forecast_calendar(mut self, calendar: ForecastCalendar) -> Self {
        self.config.forecast.calendar = calendar;
        self
    }

    pub fn persistence_threshold(mut self, threshold: f64) -> Self {
        self.config.comparison.persistence_threshold = threshold;
        self
    }

    pub fn min_observations(mut self, min: usize) -> Self {
        self.config.fit.min_observations = min;
        self
    }

    pub fn distribution(mut self, distribution: Distribution) -> Self {
        self.config.fit.distribution = distribution;
        self
    }

    pub fn return_scale(mut self, scale: f64) -> Self {
        self.config.fit.return_scale = scale;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.fit.max_iterations = max_iterations;
        self
    }

    pub fn diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.config.diagnostics = diagnostics;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
