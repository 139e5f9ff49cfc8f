//! Return and volatility feature engineering.

use crate::stats::sample_std;
use volatility_api::FeatureConfig;
use volatility_spi::{
    validate_series, FeatureEngine, FeatureRow, FeatureSet, PriceBar, Result, ReturnPoint,
    RiskMetrics, VolatilityPoint,
};

/// Feature engine computing log returns, rolling annualized volatility and
/// full-window risk metrics.
#[derive(Debug, Clone, Default)]
pub struct StandardFeatureEngine {
    config: FeatureConfig,
}

impl StandardFeatureEngine {
    /// Create a feature engine.
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }
}

impl FeatureEngine for StandardFeatureEngine {
    fn compute(&self, bars: &[PriceBar]) -> Result<FeatureSet> {
        validate_series(bars)?;

        let ticker = bars[0].ticker.clone();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let returns = log_returns(&closes);
        let volatility = rolling_volatility(
            &returns,
            self.config.volatility_window,
            self.config.annualization_factor,
        );

        let return_points: Vec<ReturnPoint> = bars
            .iter()
            .skip(1)
            .zip(&returns)
            .map(|(bar, &log_return)| ReturnPoint {
                date: bar.date,
                log_return,
            })
            .collect();

        let volatility_points: Vec<VolatilityPoint> = return_points
            .iter()
            .zip(&volatility)
            .map(|(point, &annualized_vol)| VolatilityPoint {
                date: point.date,
                annualized_vol,
            })
            .collect();

        let first_close = closes[0];
        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let (log_return, rolling_volatility) = if i == 0 {
                    (None, None)
                } else {
                    (Some(returns[i - 1]), volatility[i - 1])
                };
                FeatureRow {
                    ticker: bar.ticker.clone(),
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    log_return,
                    rolling_volatility,
                    cumulative_return: bar.close / first_close - 1.0,
                }
            })
            .collect();

        Ok(FeatureSet {
            ticker,
            window: self.config.volatility_window,
            risk: risk_metrics(&returns),
            returns: return_points,
            volatility: volatility_points,
            rows,
        })
    }
}

/// Log returns `ln(p[t] / p[t-1])`. Empty below two prices.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

/// Rolling sample standard deviation of `returns` scaled by `sqrt(annualization_factor)`.
///
/// Entry `i` is `None` while `i < window - 1`.
pub fn rolling_volatility(
    returns: &[f64],
    window: usize,
    annualization_factor: f64,
) -> Vec<Option<f64>> {
    let scale = annualization_factor.sqrt();
    (0..returns.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                None
            } else {
                Some(sample_std(&returns[i + 1 - window..=i]) * scale)
            }
        })
        .collect()
}

/// Max loss, max gain and cumulative return over a full return series.
pub fn risk_metrics(returns: &[f64]) -> Option<RiskMetrics> {
    if returns.is_empty() {
        return None;
    }
    let max_daily_loss = returns.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_daily_gain = returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let cumulative_return = returns.iter().sum::<f64>().exp() - 1.0;

    Some(RiskMetrics {
        max_daily_loss,
        max_daily_gain,
        cumulative_return,
    })
}
