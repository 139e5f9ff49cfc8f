//! CSV price loading and cleaning.
//!
//! Expected columns (case-insensitive, any order, extras ignored):
//! `ticker, date, open, high, low, close, volume`. Rows with a missing or
//! unparseable field are dropped and counted. Price sanity (positive,
//! `high >= low`) is left to the feature engine, which reports it as a
//! per-ticker data integrity failure.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use volatility::PriceBar;

const EXPECTED_COLUMNS: [&str; 7] = ["ticker", "date", "open", "high", "low", "close", "volume"];

/// Drop share above which the loader logs an error rather than a warning.
const HIGH_LOSS_RATIO: f64 = 0.10;

/// Source of daily price bars.
pub trait PriceSource: Send + Sync {
    /// Source name.
    fn name(&self) -> &str;

    /// Load every bar, sorted by ticker then date.
    fn load(&self) -> Result<LoadedPrices>;
}

/// Cleaned bars plus row accounting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedPrices {
    /// Bars sorted by ticker then date
    pub bars: Vec<PriceBar>,
    /// Data rows read, excluding the header
    pub total_rows: usize,
    /// Rows dropped for missing or unparseable fields
    pub dropped_rows: usize,
}

impl LoadedPrices {
    /// Share of rows dropped during cleaning.
    pub fn drop_ratio(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.dropped_rows as f64 / self.total_rows as f64
        }
    }

    /// Distinct tickers in sorted order.
    pub fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.bars.iter().map(|b| b.ticker.clone()).collect();
        tickers.dedup();
        tickers
    }

    /// Bars grouped per ticker, preserving date order.
    pub fn by_ticker(&self) -> BTreeMap<String, Vec<PriceBar>> {
        let mut groups: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();
        for bar in &self.bars {
            groups.entry(bar.ticker.clone()).or_default().push(bar.clone());
        }
        groups
    }

    fn extend(&mut self, other: LoadedPrices) {
        self.bars.extend(other.bars);
        self.total_rows += other.total_rows;
        self.dropped_rows += other.dropped_rows;
    }

    fn sort(&mut self) {
        self.bars
            .sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));
    }
}

/// Price source backed by a CSV file or a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_file(path: &Path) -> Result<LoadedPrices> {
        let file = File::open(path)
            .map_err(|e| DataError::Io(format!("{}: {}", path.display(), e)))?;
        read_prices(file, &path.display().to_string())
    }

    fn load_dir(dir: &Path) -> Result<LoadedPrices> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .map(|ext| ext.eq_ignore_ascii_case("csv"))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(DataError::NoData(dir.display().to_string()));
        }
        tracing::info!("Found {} CSV files in {}", files.len(), dir.display());

        let mut combined = LoadedPrices::default();
        let mut failed = Vec::new();
        for path in &files {
            match Self::load_file(path) {
                Ok(loaded) => combined.extend(loaded),
                Err(e) => {
                    tracing::error!("Failed to load {}: {}", path.display(), e);
                    failed.push(path.display().to_string());
                }
            }
        }

        if !failed.is_empty() {
            tracing::warn!("Skipped {} files: {:?}", failed.len(), failed);
        }
        if combined.bars.is_empty() {
            return Err(DataError::NoData(dir.display().to_string()));
        }
        combined.sort();
        Ok(combined)
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<LoadedPrices> {
        if self.path.is_dir() {
            Self::load_dir(&self.path)
        } else {
            Self::load_file(&self.path)
        }
    }
}

/// Read and clean a price table from any reader.
///
/// `origin` names the input in errors and log lines.
pub fn read_prices<R: Read>(reader: R, origin: &str) -> Result<LoadedPrices> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut index = [0usize; EXPECTED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, name) in EXPECTED_COLUMNS.iter().enumerate() {
        match headers.iter().position(|h| h == name) {
            Some(i) => index[slot] = i,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            origin: origin.to_string(),
            columns: missing,
        });
    }

    let mut loaded = LoadedPrices::default();
    for record in rdr.records() {
        let record = record?;
        loaded.total_rows += 1;
        match parse_row(&record, &index) {
            Some(bar) => loaded.bars.push(bar),
            None => loaded.dropped_rows += 1,
        }
    }

    if loaded.dropped_rows > 0 {
        let pct = loaded.drop_ratio() * 100.0;
        tracing::warn!(
            "{}: Dropped {}/{} rows ({:.1}%)",
            origin,
            loaded.dropped_rows,
            loaded.total_rows,
            pct
        );
        if loaded.drop_ratio() > HIGH_LOSS_RATIO {
            tracing::error!("High data loss in {}: {:.1}% - check data quality", origin, pct);
        }
    }

    if loaded.bars.is_empty() {
        return Err(DataError::NoData(origin.to_string()));
    }

    loaded.sort();
    tracing::info!(
        "Loaded {}: {} rows, {} tickers",
        origin,
        loaded.bars.len(),
        loaded.tickers().len()
    );
    Ok(loaded)
}

fn parse_row(record: &csv::StringRecord, index: &[usize; EXPECTED_COLUMNS.len()]) -> Option<PriceBar> {
    let field = |slot: usize| {
        record
            .get(index[slot])
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let ticker = field(0)?.to_uppercase();
    let date = parse_date(field(1)?)?;
    let open = parse_number(field(2)?)?;
    let high = parse_number(field(3)?)?;
    let low = parse_number(field(4)?)?;
    let close = parse_number(field(5)?)?;
    let volume = parse_number(field(6)?)?;
    if volume < 0.0 {
        return None;
    }

    Some(PriceBar::new(
        &ticker,
        date,
        open,
        high,
        low,
        close,
        volume.round() as u64,
    ))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// ISO dates, ISO timestamps (date part only) and US `m/d/Y`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            raw.get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("2024-03-05"), expected);
        assert_eq!(parse_date("2024-03-05 00:00:00-05:00"), expected);
        assert_eq!(parse_date("03/05/2024"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_parse_number_rejects_nan() {
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_read_prices_drops_and_sorts() {
        let csv = "\
Ticker,Date,Open,High,Low,Close,Volume
msft,2024-01-03,10,11,9,10.5,100
AAPL,2024-01-03,20,21,19,20.5,200
AAPL,2024-01-02,19,20,18,19.5,150
AAPL,2024-01-04,,21,19,20.5,200
MSFT,2024-01-02,9,10,8,9.5,abc
";
        let loaded = read_prices(csv.as_bytes(), "inline").unwrap();

        assert_eq!(loaded.total_rows, 5);
        assert_eq!(loaded.dropped_rows, 2);
        assert!((loaded.drop_ratio() - 0.4).abs() < 1e-12);
        assert_eq!(loaded.tickers(), vec!["AAPL", "MSFT"]);

        let aapl = &loaded.by_ticker()["AAPL"];
        assert_eq!(aapl.len(), 2);
        assert!(aapl[0].date < aapl[1].date);
        assert_eq!(loaded.bars[2].ticker, "MSFT");
    }

    #[test]
    fn test_missing_columns() {
        let csv = "ticker,date,close\nAAPL,2024-01-02,10\n";
        match read_prices(csv.as_bytes(), "thin.csv") {
            Err(DataError::MissingColumns { origin, columns }) => {
                assert_eq!(origin, "thin.csv");
                assert_eq!(columns, vec!["open", "high", "low", "volume"]);
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_all_rows_dropped() {
        let csv = "ticker,date,open,high,low,close,volume\nAAPL,bad,1,1,1,1,1\n";
        assert_eq!(
            read_prices(csv.as_bytes(), "bad.csv"),
            Err(DataError::NoData("bad.csv".to_string()))
        );
    }

    #[test]
    fn test_fractional_volume_rounds() {
        let csv = "ticker,date,open,high,low,close,volume\nAAPL,2024-01-02,1,1,1,1,1500.0\n";
        let loaded = read_prices(csv.as_bytes(), "v.csv").unwrap();
        assert_eq!(loaded.bars[0].volume, 1500);
    }
}
