//! Model comparator trait.

use crate::model::{GarchModel, ModelComparisonRow};

/// Ranks fitted models against each other.
pub trait ModelComparator: Send + Sync {
    /// One row per model, ordered by rank.
    fn compare(&self, models: &[GarchModel]) -> Vec<ModelComparisonRow>;
}
