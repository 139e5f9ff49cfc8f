//! Trait contracts for the pipeline stages.

mod comparator;
mod feature_engine;
mod forecaster;
mod model_fitter;

pub use comparator::*;
pub use feature_engine::*;
pub use forecaster::*;
pub use model_fitter::*;
