//! AIC ranking of fitted models.

use volatility_api::ComparisonConfig;
use volatility_spi::{GarchModel, ModelComparator, ModelComparisonRow};

/// Ranks models by ascending AIC, ties broken by ticker.
#[derive(Debug, Clone, Default)]
pub struct AicComparator {
    config: ComparisonConfig,
}

impl AicComparator {
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    fn is_igarch_like(&self, model: &GarchModel) -> bool {
        model.alpha < self.config.igarch_alpha_max && model.beta > self.config.igarch_beta_min
    }
}

impl ModelComparator for AicComparator {
    fn compare(&self, models: &[GarchModel]) -> Vec<ModelComparisonRow> {
        let mut ranked: Vec<&GarchModel> = models.iter().collect();
        ranked.sort_by(|a, b| a.aic.total_cmp(&b.aic).then_with(|| a.ticker.cmp(&b.ticker)));

        ranked
            .into_iter()
            .enumerate()
            .map(|(i, m)| ModelComparisonRow {
                ticker: m.ticker.clone(),
                aic: m.aic,
                persistence: m.persistence,
                rank: i + 1,
                high_persistence_flag: m.persistence > self.config.persistence_threshold,
                igarch_like_flag: self.is_igarch_like(m),
            })
            .collect()
    }
}
