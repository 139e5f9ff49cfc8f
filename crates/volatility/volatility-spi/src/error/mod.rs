//! Error types for volatility analytics.

mod volatility_error;

pub use volatility_error::*;
