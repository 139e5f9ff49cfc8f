//! Volatility forecast points.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How forecast dates are spaced after the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ForecastCalendar {
    /// Every calendar day
    #[default]
    Calendar,
    /// Monday through Friday; no holiday awareness
    Weekdays,
}

impl ForecastCalendar {
    /// The `count` dates following `last`.
    pub fn dates_after(&self, last: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(count);
        let mut current = last;
        while dates.len() < count {
            current = match current.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
            let is_weekend = matches!(current.weekday(), Weekday::Sat | Weekday::Sun);
            if *self == ForecastCalendar::Calendar || !is_weekend {
                dates.push(current);
            }
        }
        dates
    }
}

impl FromStr for ForecastCalendar {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calendar" => Ok(ForecastCalendar::Calendar),
            "weekdays" | "business" => Ok(ForecastCalendar::Weekdays),
            other => Err(format!("unknown forecast calendar '{}'", other)),
        }
    }
}

/// One day of a ticker's volatility forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ticker: String,
    /// 1-based step ahead
    pub horizon_day: usize,
    pub forecast_date: NaiveDate,
    /// Annualized volatility on the unscaled return axis
    pub predicted_volatility: f64,
    /// Daily conditional variance on the scaled axis
    pub predicted_variance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_dates() {
        // Friday
        let last = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let dates = ForecastCalendar::Calendar.dates_after(last, 3);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_weekday_dates_skip_weekend() {
        let last = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let dates = ForecastCalendar::Weekdays.dates_after(last, 2);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_calendar() {
        assert_eq!("business".parse::<ForecastCalendar>(), Ok(ForecastCalendar::Weekdays));
        assert!("lunar".parse::<ForecastCalendar>().is_err());
    }
}
