//! Configuration validation.
//!
//! Validates every screener setting before a batch runs. Missing keys fall
//! back to defaults; present keys must parse and lie in range.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::MAX_ADX_WINDOW;
use crate::domain::interval::Interval;
use crate::domain::request::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub const MAX_LOOKBACK_DAYS: i64 = 60;

pub fn validate_screener_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_symbols(config)?;
    validate_interval(config)?;
    validate_lookback(config)?;
    validate_adx_window(config)?;
    validate_adx_threshold(config)?;
    validate_fetch_timeout(config)?;
    validate_data_source(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_string("screener", "symbols") {
        None => Ok(()),
        Some(s) => parse_symbols(&s)
            .map(|_| ())
            .map_err(|e| invalid("screener", "symbols", e.to_string())),
    }
}

fn validate_interval(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_string("screener", "interval") {
        None => Ok(()),
        Some(s) => s
            .parse::<Interval>()
            .map(|_| ())
            .map_err(|e| invalid("screener", "interval", e.to_string())),
    }
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if config.get_string("screener", "lookback_days").is_none() {
        return Ok(());
    }
    let value = config.get_int("screener", "lookback_days", 0);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&value) {
        return Err(invalid(
            "screener",
            "lookback_days",
            format!("lookback_days must be between 1 and {}", MAX_LOOKBACK_DAYS),
        ));
    }
    Ok(())
}

fn validate_adx_window(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if config.get_string("screener", "adx_window").is_none() {
        return Ok(());
    }
    let value = config.get_int("screener", "adx_window", 0);
    if value < 1 || value > MAX_ADX_WINDOW as i64 {
        return Err(invalid(
            "screener",
            "adx_window",
            format!("adx_window must be between 1 and {}", MAX_ADX_WINDOW),
        ));
    }
    Ok(())
}

fn validate_adx_threshold(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if config.get_string("screener", "adx_threshold").is_none() {
        return Ok(());
    }
    let value = config.get_double("screener", "adx_threshold", -1.0);
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "screener",
            "adx_threshold",
            "adx_threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_fetch_timeout(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if config.get_string("screener", "fetch_timeout_secs").is_none() {
        return Ok(());
    }
    let value = config.get_int("screener", "fetch_timeout_secs", 0);
    if value < 1 {
        return Err(invalid(
            "screener",
            "fetch_timeout_secs",
            "fetch_timeout_secs must be at least 1",
        ));
    }
    Ok(())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_string("data", "source").as_deref().map(str::trim) {
        None | Some("yahoo") => Ok(()),
        Some("csv") => match config.get_string("data", "csv_dir") {
            Some(dir) if !dir.trim().is_empty() => Ok(()),
            _ => Err(ScreenerError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            }),
        },
        Some(other) => Err(invalid(
            "data",
            "source",
            format!("unknown data source '{}' (expected yahoo or csv)", other),
        )),
    }
}
