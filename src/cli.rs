//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{validate_screener_config, MAX_LOOKBACK_DAYS};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::{DEFAULT_ADX_WINDOW, MAX_ADX_WINDOW};
use crate::domain::interval::Interval;
use crate::domain::request::{
    build_requests, parse_symbols, DEFAULT_LOOKBACK_DAYS, DEFAULT_SYMBOLS,
};
use crate::domain::screener::{BatchResult, InstrumentStatus, Screener, ScreenerConfig};
use crate::domain::signal::DEFAULT_ADX_THRESHOLD;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_OUTPUT: &str = "screen.html";
pub const DEFAULT_MAX_RETRIES: u32 = 2;

#[derive(Parser, Debug)]
#[command(name = "vwapscreen", about = "Momentum screener with VWAP breakout detection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen symbols for VWAP breakouts and breakdowns
    Screen {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: ScreenOverrides,
    },
    /// List symbols available in a CSV data directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(short, long, default_value = "5m")]
        interval: String,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ScreenOverrides {
    /// Comma-separated symbols, e.g. RELIANCE.NS,TATASTEEL.NS
    #[arg(short, long)]
    pub symbols: Option<String>,
    /// Bar interval: 5m, 15m, 1h or 1d
    #[arg(short, long)]
    pub interval: Option<String>,
    /// Lookback window in days
    #[arg(short, long)]
    pub lookback: Option<u32>,
    #[arg(long)]
    pub adx_window: Option<usize>,
    #[arg(long)]
    pub adx_threshold: Option<f64>,
    /// Per-symbol fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Data source: yahoo or csv
    #[arg(long)]
    pub source: Option<String>,
    /// Directory of <SYMBOL>_<interval>.csv files (implies --source csv)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// HTML report path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Yahoo { max_retries: u32 },
    Csv { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSettings {
    pub symbols: Vec<String>,
    pub interval: Interval,
    pub lookback_days: u32,
    pub screener: ScreenerConfig,
    pub source: DataSource,
    pub output: PathBuf,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen { config, overrides } => run_screen(config.as_ref(), &overrides),
        Command::ListSymbols { data_dir, interval } => run_list_symbols(data_dir, &interval),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ScreenerError> {
    FileConfigAdapter::from_file(path).map_err(|e| ScreenerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn invalid_override(key: &str, reason: &str) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: "cli".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Merges the config file with command-line overrides and validates the result.
pub fn build_settings(
    config: &dyn ConfigPort,
    overrides: &ScreenOverrides,
) -> Result<ScreenSettings, ScreenerError> {
    validate_screener_config(config)?;

    let symbols_str = match &overrides.symbols {
        Some(s) => s.clone(),
        None => config.get_string_or("screener", "symbols", DEFAULT_SYMBOLS),
    };
    let symbols = parse_symbols(&symbols_str)?;

    let interval: Interval = match &overrides.interval {
        Some(s) => s.parse()?,
        None => config.get_string_or("screener", "interval", "5m").parse()?,
    };

    let lookback_days = match overrides.lookback {
        Some(days) if days == 0 || i64::from(days) > MAX_LOOKBACK_DAYS => {
            return Err(invalid_override(
                "lookback",
                "lookback must be between 1 and 60 days",
            ));
        }
        Some(days) => days,
        None => config.get_int("screener", "lookback_days", i64::from(DEFAULT_LOOKBACK_DAYS)) as u32,
    };

    let adx_window = match overrides.adx_window {
        Some(w) if w == 0 || w > MAX_ADX_WINDOW => {
            return Err(invalid_override(
                "adx-window",
                &format!("adx window must be between 1 and {}", MAX_ADX_WINDOW),
            ));
        }
        Some(w) => w,
        None => config.get_int("screener", "adx_window", DEFAULT_ADX_WINDOW as i64) as usize,
    };

    let adx_threshold = match overrides.adx_threshold {
        Some(t) if !(0.0..=100.0).contains(&t) => {
            return Err(invalid_override(
                "adx-threshold",
                "adx threshold must be between 0 and 100",
            ));
        }
        Some(t) => t,
        None => config.get_double("screener", "adx_threshold", DEFAULT_ADX_THRESHOLD),
    };

    let timeout_secs = match overrides.timeout {
        Some(0) => return Err(invalid_override("timeout", "timeout must be at least 1 second")),
        Some(t) => t,
        None => config.get_int("screener", "fetch_timeout_secs", 30) as u64,
    };

    let source = match (&overrides.data_dir, overrides.source.as_deref()) {
        (Some(dir), None | Some("csv")) => DataSource::Csv { dir: dir.clone() },
        (_, Some(name)) => source_from(name, config)?,
        (None, None) => source_from(&config.get_string_or("data", "source", "yahoo"), config)?,
    };

    let output = overrides.output.clone().unwrap_or_else(|| {
        PathBuf::from(config.get_string_or("report", "output", DEFAULT_OUTPUT))
    });

    Ok(ScreenSettings {
        symbols,
        interval,
        lookback_days,
        screener: ScreenerConfig {
            adx_window,
            adx_threshold,
            fetch_timeout: Duration::from_secs(timeout_secs),
        },
        source,
        output,
    })
}

fn source_from(name: &str, config: &dyn ConfigPort) -> Result<DataSource, ScreenerError> {
    match name.trim() {
        "yahoo" => Ok(DataSource::Yahoo {
            max_retries: config.get_int("data", "max_retries", i64::from(DEFAULT_MAX_RETRIES))
                .clamp(0, 10) as u32,
        }),
        "csv" => match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(DataSource::Csv {
                dir: PathBuf::from(dir.trim()),
            }),
            _ => Err(ScreenerError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            }),
        },
        other => Err(ScreenerError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown data source '{}' (expected yahoo or csv)", other),
        }),
    }
}

pub fn build_data_port(settings: &ScreenSettings) -> Result<Arc<dyn DataPort>, ScreenerError> {
    match &settings.source {
        DataSource::Csv { dir } => Ok(Arc::new(CsvAdapter::new(dir.clone()))),
        #[cfg(feature = "yahoo")]
        DataSource::Yahoo { max_retries } => {
            use crate::adapters::yahoo_adapter::YahooAdapter;
            let adapter = YahooAdapter::new(settings.screener.fetch_timeout, *max_retries)?;
            Ok(Arc::new(adapter))
        }
        #[cfg(not(feature = "yahoo"))]
        DataSource::Yahoo { .. } => Err(ScreenerError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: "yahoo feature is required for the yahoo data source".to_string(),
        }),
    }
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

/// Plain-text rendering of a batch: one line per instrument, then the summary.
pub fn format_batch(batch: &BatchResult) -> String {
    let mut out = String::from("=== Instruments ===\n");
    for result in &batch.instruments {
        let line = match &result.status {
            InstrumentStatus::Ok => {
                let point = result.series.as_ref().and_then(|s| s.last_point());
                format!(
                    "  {:<14} {:<9} close={} vwap={} adx={}\n",
                    result.symbol(),
                    result.signal.to_string(),
                    format_opt(point.map(|p| p.close)),
                    format_opt(point.and_then(|p| p.vwap)),
                    format_opt(point.and_then(|p| p.adx)),
                )
            }
            InstrumentStatus::NoData { reason } => {
                format!("  {:<14} NO DATA   {}\n", result.symbol(), reason)
            }
            InstrumentStatus::Error { message } => {
                format!("  {:<14} ERROR     {}\n", result.symbol(), message)
            }
        };
        out.push_str(&line);
    }

    out.push_str("\n=== Momentum Summary ===\n");
    if batch.summary.is_empty() {
        out.push_str("  (no signals)\n");
    }
    for entry in &batch.summary {
        out.push_str(&format!(
            "  {}: {} [{}]\n",
            entry.symbol,
            entry.signal.label(),
            entry.color
        ));
    }
    out
}

fn run_screen(config_path: Option<&PathBuf>, overrides: &ScreenOverrides) -> ExitCode {
    let config = match config_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(c) => c,
                Err(e) => {
                    error!("{e}");
                    return (&e).into();
                }
            }
        }
        None => FileConfigAdapter::empty(),
    };

    let settings = match build_settings(&config, overrides) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    let requests = match build_requests(&settings.symbols, settings.lookback_days, settings.interval)
    {
        Ok(r) => r,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    let data_port = match build_data_port(&settings) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    info!(
        interval = %settings.interval,
        lookback_days = settings.lookback_days,
        adx_window = settings.screener.adx_window,
        adx_threshold = settings.screener.adx_threshold,
        "Screening {} symbols",
        requests.len()
    );

    let screener = Screener::new(data_port, settings.screener.clone());
    let batch = screener.screen(&requests);

    print!("{}", format_batch(&batch));

    if let Err(e) = write_report(&batch, &settings) {
        error!("{e}");
        return (&e).into();
    }

    if !batch.instruments.is_empty() && batch.failed_count() == batch.instruments.len() {
        error!("no symbol could be evaluated");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

#[cfg(feature = "html")]
fn write_report(batch: &BatchResult, settings: &ScreenSettings) -> Result<(), ScreenerError> {
    use crate::adapters::html_report_adapter::HtmlReportAdapter;
    use crate::ports::report_port::ReportPort;

    let output = settings.output.display().to_string();
    HtmlReportAdapter::new(settings.screener.adx_threshold).write(batch, &output)?;
    info!("Report written to: {}", output);
    Ok(())
}

#[cfg(not(feature = "html"))]
fn write_report(_batch: &BatchResult, _settings: &ScreenSettings) -> Result<(), ScreenerError> {
    info!("html feature disabled, skipping report");
    Ok(())
}

fn run_list_symbols(data_dir: PathBuf, interval: &str) -> ExitCode {
    let interval: Interval = match interval.parse() {
        Ok(i) => i,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(data_dir);
    match adapter.list_symbols(interval) {
        Ok(symbols) => {
            if symbols.is_empty() {
                info!("No symbols found for interval {}", interval);
            }
            for symbol in &symbols {
                println!("{}", symbol);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}
