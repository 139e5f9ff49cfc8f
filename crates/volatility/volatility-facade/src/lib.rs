//! Volatility Analytics Facade
//!
//! Unified re-exports for the volatility module.
//!
//! This facade provides access to all volatility analytics components:
//! - `features` - Log returns, rolling volatility, risk metrics (StandardFeatureEngine)
//! - `garch` - GARCH(1,1) maximum-likelihood fitting (GarchFitter)
//! - `forecast` - Multi-step variance forecasts (GarchForecaster)
//! - `comparison` - AIC ranking with persistence flags (AicComparator)
//! - `diagnostics` - Model validation and return summaries
//! - `pipeline` - Per-ticker orchestration (VolatilityPipeline)

// Re-export everything from SPI (traits, errors, types)
pub use volatility_spi::*;

// Re-export everything from API (configs)
pub use volatility_api::*;

// Re-export everything from Core (implementations)
pub use volatility_core::*;
