//! Volatility Analytics Core
//!
//! Implementations for feature engineering, GARCH(1,1) fitting, volatility
//! forecasting, model comparison, diagnostics and the per-ticker pipeline.

pub mod comparison;
pub mod diagnostics;
pub mod features;
pub mod forecast;
pub mod garch;
pub mod optimizer;
pub mod pipeline;
pub mod stats;

pub use comparison::*;
pub use diagnostics::*;
pub use features::*;
pub use forecast::*;
pub use garch::*;
pub use optimizer::*;
pub use pipeline::*;
