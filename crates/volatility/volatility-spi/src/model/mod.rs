//! Data models for volatility analytics.

mod comparison;
mod diagnostics;
mod features;
mod forecast;
mod garch;
mod price_bar;
mod report;

pub use comparison::*;
pub use diagnostics::*;
pub use features::*;
pub use forecast::*;
pub use garch::*;
pub use price_bar::*;
pub use report::*;
