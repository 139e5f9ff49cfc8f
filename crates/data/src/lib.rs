//! Data adapters for volatility runs
//!
//! Loads daily OHLCV price tables from CSV and writes pipeline results back
//! out as CSV tables and a JSON run summary.

pub mod error;
pub mod source;
pub mod writer;

pub use error::{DataError, Result};
pub use source::{read_prices, CsvPriceSource, LoadedPrices, PriceSource};
pub use writer::{
    read_models, write_comparison, write_features, write_forecasts, write_models, write_report,
    write_summary, ForecastRecord, ReportFiles,
};
