//! Result table writers.

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use volatility::{FeatureSet, ForecastPoint, GarchModel, ModelComparisonRow, RunReport, RunSummary};

pub const FEATURES_FILE: &str = "features.csv";
pub const FORECASTS_FILE: &str = "volatility_forecasts.csv";
pub const COMPARISON_FILE: &str = "model_comparison.csv";
pub const MODELS_FILE: &str = "garch_models.csv";
pub const SUMMARY_FILE: &str = "run_summary.json";

/// Forecast table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub ticker: String,
    pub forecast_date: NaiveDate,
    pub horizon_day: usize,
    pub predicted_volatility: f64,
}

impl From<&ForecastPoint> for ForecastRecord {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            ticker: point.ticker.clone(),
            forecast_date: point.forecast_date,
            horizon_day: point.horizon_day,
            predicted_volatility: point.predicted_volatility,
        }
    }
}

fn write_rows<W, T, I>(writer: W, rows: I) -> Result<()>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Feature table: one row per bar, all tickers.
pub fn write_features<W: Write>(writer: W, features: &[&FeatureSet]) -> Result<()> {
    write_rows(writer, features.iter().flat_map(|f| f.rows.iter()))
}

/// Forecast table: one row per ticker and horizon day.
pub fn write_forecasts<W: Write>(writer: W, forecasts: &[ForecastPoint]) -> Result<()> {
    write_rows(writer, forecasts.iter().map(ForecastRecord::from))
}

/// Comparison table in rank order.
pub fn write_comparison<W: Write>(writer: W, rows: &[ModelComparisonRow]) -> Result<()> {
    write_rows(writer, rows)
}

/// Model table with every fitted parameter, readable by [`read_models`].
pub fn write_models<W: Write>(writer: W, models: &[&GarchModel]) -> Result<()> {
    write_rows(writer, models.iter().copied())
}

/// Read a model table written by [`write_models`].
pub fn read_models<R: Read>(reader: R) -> Result<Vec<GarchModel>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let models = rdr
        .deserialize::<GarchModel>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(models)
}

/// Pretty-printed JSON run summary.
pub fn write_summary<W: Write>(writer: W, summary: &RunSummary) -> Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Paths written by [`write_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFiles {
    pub features: PathBuf,
    pub forecasts: PathBuf,
    pub comparison: PathBuf,
    pub models: PathBuf,
    pub summary: PathBuf,
}

/// Write every output table of a run into `dir`, creating it if needed.
pub fn write_report(dir: &Path, report: &RunReport) -> Result<ReportFiles> {
    fs::create_dir_all(dir)?;
    let files = ReportFiles {
        features: dir.join(FEATURES_FILE),
        forecasts: dir.join(FORECASTS_FILE),
        comparison: dir.join(COMPARISON_FILE),
        models: dir.join(MODELS_FILE),
        summary: dir.join(SUMMARY_FILE),
    };

    let features: Vec<&FeatureSet> = report.successes().map(|a| &a.features).collect();
    write_features(File::create(&files.features)?, &features)?;

    let forecasts: Vec<ForecastPoint> = report
        .successes()
        .flat_map(|a| a.forecast.iter().cloned())
        .collect();
    write_forecasts(File::create(&files.forecasts)?, &forecasts)?;

    write_comparison(File::create(&files.comparison)?, &report.comparison)?;

    let models: Vec<&GarchModel> = report.successes().map(|a| &a.fit.model).collect();
    write_models(File::create(&files.models)?, &models)?;

    write_summary(File::create(&files.summary)?, &report.summary())?;

    tracing::info!(
        "Wrote {} forecasts for {} tickers to {}",
        forecasts.len(),
        models.len(),
        dir.display()
    );
    Ok(files)
}
