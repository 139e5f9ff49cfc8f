//! Daily OHLCV price bar.

use crate::error::{Result, VolatilityError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Create a new price bar.
    pub fn new(
        ticker: &str,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the bar invariants: finite positive prices and `high >= low`.
    pub fn validate(&self) -> Result<()> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(VolatilityError::integrity(
                    &self.ticker,
                    format!("{} price {} on {} is not a positive number", name, value, self.date),
                ));
            }
        }
        if self.high < self.low {
            return Err(VolatilityError::integrity(
                &self.ticker,
                format!("high {} below low {} on {}", self.high, self.low, self.date),
            ));
        }
        Ok(())
    }
}

/// Validate a single ticker's bar sequence.
///
/// Requires a non-empty sequence, one ticker throughout, valid bars and
/// strictly increasing dates.
pub fn validate_series(bars: &[PriceBar]) -> Result<()> {
    let first = bars.first().ok_or(VolatilityError::InsufficientData {
        required: 1,
        actual: 0,
    })?;

    for bar in bars {
        if bar.ticker != first.ticker {
            return Err(VolatilityError::integrity(
                &first.ticker,
                format!("series mixes tickers '{}' and '{}'", first.ticker, bar.ticker),
            ));
        }
        bar.validate()?;
    }

    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(VolatilityError::integrity(
                &first.ticker,
                format!(
                    "dates not strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                ),
            ));
        }
    }

    Ok(())
}
