//! # volforecast
//!
//! Command-line driver for GARCH(1,1) volatility runs over CSV price tables.

use clap::{Args, Parser, Subcommand};
use data::{read_models, write_comparison, write_features, write_report, CsvPriceSource, PriceSource};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use volatility::{
    AicComparator, ComparisonConfig, Distribution, FeatureEngine, FeatureSet, FeatureConfig,
    ForecastCalendar, ModelComparator, ModelComparisonRow, PipelineConfig, RunReport,
    StandardFeatureEngine, VolatilityError, VolatilityPipeline,
};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "volforecast")]
#[command(about = "GARCH(1,1) volatility features, forecasts and model comparison", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write every output table
    Run {
        /// Price CSV file or directory of CSV files
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for output tables
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Compute the feature table only
    Features {
        /// Price CSV file or directory of CSV files
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Rolling volatility window in returns
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// Re-rank a saved model table by AIC
    Compare {
        /// Model table written by `run`
        #[arg(short, long)]
        models: PathBuf,

        /// High-persistence threshold
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output CSV file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Flags layered over environment configuration.
#[derive(Args)]
struct Overrides {
    /// Comma-separated tickers (default: every ticker in the input)
    #[arg(short, long)]
    tickers: Option<String>,

    /// Rolling volatility window in returns
    #[arg(short, long)]
    window: Option<usize>,

    /// Forecast horizon in days
    #[arg(long, allow_negative_numbers = true)]
    horizon: Option<i64>,

    /// High-persistence threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Minimum returns required to fit
    #[arg(long)]
    min_obs: Option<usize>,

    /// Innovation distribution (normal, t)
    #[arg(long)]
    dist: Option<String>,

    /// Forecast date spacing (calendar, weekdays)
    #[arg(long)]
    calendar: Option<String>,

    /// Process tickers one at a time
    #[arg(long)]
    sequential: bool,
}

/// Environment configuration with command-line overrides applied.
fn build_config(overrides: &Overrides) -> CliResult<PipelineConfig> {
    let mut config = PipelineConfig::from_env().map_err(|e| e.to_string())?;

    if let Some(tickers) = &overrides.tickers {
        config.tickers = tickers
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
    }
    if let Some(window) = overrides.window {
        config.features.volatility_window = window;
    }
    if let Some(horizon) = overrides.horizon {
        if horizon <= 0 {
            return Err(VolatilityError::InvalidHorizon { horizon }.to_string());
        }
        config.forecast.horizon = horizon as usize;
    }
    if let Some(threshold) = overrides.threshold {
        config.comparison.persistence_threshold = threshold;
    }
    if let Some(min_obs) = overrides.min_obs {
        config.fit.min_observations = min_obs;
    }
    if let Some(dist) = &overrides.dist {
        config.fit.distribution = dist.parse::<Distribution>()?;
    }
    if let Some(calendar) = &overrides.calendar {
        config.forecast.calendar = calendar.parse::<ForecastCalendar>()?;
    }
    if overrides.sequential {
        config.parallel = false;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn run_pipeline(input: PathBuf, output_dir: PathBuf, overrides: Overrides) -> CliResult<()> {
    let config = build_config(&overrides)?;
    let loaded = CsvPriceSource::new(&input)
        .load()
        .map_err(|e| format!("Failed to load {}: {}", input.display(), e))?;

    println!(
        "Loaded {} bars for {} tickers ({} rows dropped)",
        loaded.bars.len(),
        loaded.tickers().len(),
        loaded.dropped_rows
    );

    let pipeline = VolatilityPipeline::new(config).map_err(|e| e.to_string())?;
    let report = pipeline.run_grouped(loaded.by_ticker());
    let files = write_report(&output_dir, &report).map_err(|e| e.to_string())?;

    print_report(&report);
    println!("\nResults written to {:?}", output_dir);
    println!("  {:?}", files.forecasts);
    println!("  {:?}", files.comparison);
    println!("  {:?}", files.summary);

    if report.successes().next().is_none() {
        return Err("No ticker produced a model".to_string());
    }
    Ok(())
}

fn run_features(input: PathBuf, output: PathBuf, window: Option<usize>) -> CliResult<()> {
    let config = match window {
        Some(w) => FeatureConfig::new(w),
        None => PipelineConfig::from_env().map_err(|e| e.to_string())?.features,
    };
    config.validate().map_err(|e| e.to_string())?;

    let loaded = CsvPriceSource::new(&input)
        .load()
        .map_err(|e| format!("Failed to load {}: {}", input.display(), e))?;

    let engine = StandardFeatureEngine::new(config);
    let mut computed: Vec<FeatureSet> = Vec::new();
    for (ticker, bars) in loaded.by_ticker() {
        match engine.compute(&bars) {
            Ok(features) => computed.push(features),
            Err(e) => {
                tracing::warn!(ticker = %ticker, "skipped: {}", e);
                eprintln!("Skipped {}: {}", ticker, e);
            }
        }
    }

    let refs: Vec<&FeatureSet> = computed.iter().collect();
    let file = File::create(&output).map_err(|e| format!("Failed to create output file: {}", e))?;
    write_features(file, &refs).map_err(|e| e.to_string())?;

    let rows: usize = computed.iter().map(|f| f.rows.len()).sum();
    println!(
        "Features for {} tickers ({} rows) written to {:?}",
        computed.len(),
        rows,
        output
    );
    Ok(())
}

fn run_compare(models: PathBuf, threshold: Option<f64>, output: Option<PathBuf>) -> CliResult<()> {
    let file = File::open(&models).map_err(|e| format!("Failed to open file: {}", e))?;
    let fitted = read_models(file).map_err(|e| e.to_string())?;

    let config = match threshold {
        Some(t) => ComparisonConfig::new(t),
        None => PipelineConfig::from_env().map_err(|e| e.to_string())?.comparison,
    };
    config.validate().map_err(|e| e.to_string())?;

    let rows = AicComparator::new(config).compare(&fitted);
    print_comparison(&rows);

    if let Some(path) = output {
        let file = File::create(&path).map_err(|e| format!("Failed to create output file: {}", e))?;
        write_comparison(file, &rows).map_err(|e| e.to_string())?;
        println!("\nComparison written to {:?}", path);
    }
    Ok(())
}

fn print_comparison(rows: &[ModelComparisonRow]) {
    println!("\n=== Model Comparison (by AIC) ===");
    println!(
        "{:>4}  {:<8} {:>12} {:>12}  Flags",
        "Rank", "Ticker", "AIC", "Persistence"
    );
    for row in rows {
        let mut flags = Vec::new();
        if row.high_persistence_flag {
            flags.push("high-persistence");
        }
        if row.igarch_like_flag {
            flags.push("igarch-like");
        }
        println!(
            "{:>4}  {:<8} {:>12.2} {:>12.4}  {}",
            row.rank,
            row.ticker,
            row.aic,
            row.persistence,
            flags.join(", ")
        );
    }
}

fn print_report(report: &RunReport) {
    print_comparison(&report.comparison);

    for analysis in report.successes() {
        if let (Some(first), Some(last)) = (analysis.forecast.first(), analysis.forecast.last()) {
            println!(
                "{:<8} forecast vol {:.2}% -> {:.2}% over {} days",
                analysis.ticker,
                first.predicted_volatility * 100.0,
                last.predicted_volatility * 100.0,
                analysis.forecast.len()
            );
        }
        match analysis.fit.model.half_life() {
            Some(days) => println!("{:<8} shock half-life {:.1} days", analysis.ticker, days),
            None => println!("{:<8} shock half-life n/a (non-stationary)", analysis.ticker),
        }
    }

    let summary = report.summary();
    if !summary.failed.is_empty() {
        println!("\nExcluded tickers:");
        for failed in &summary.failed {
            println!("  {}: {}", failed.ticker, failed.reason);
        }
    }
    if !summary.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &summary.warnings {
            println!("  {}: {}", warning.ticker, warning.message);
        }
    }
}

fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volforecast=info,volatility_core=info,data=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output_dir,
            overrides,
        } => run_pipeline(input, output_dir, overrides),

        Commands::Features {
            input,
            output,
            window,
        } => run_features(input, output, window),

        Commands::Compare {
            models,
            threshold,
            output,
        } => run_compare(models, threshold, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
