//! Volatility Analytics Service Provider Interface
//!
//! Defines the data model, error taxonomy and trait contracts shared by the
//! feature engine, GARCH fitter, forecaster and model comparator.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::*;
pub use error::*;
pub use model::*;
