//! Volatility Analytics Consumer API
//!
//! Configuration types threaded through every pipeline stage.
//! Nothing here reads ambient state except [`PipelineConfig::from_env`].

mod config;

pub use config::*;
