//! CSV file data adapter.
//!
//! Reads `<base>/<SYMBOL>_<interval>.csv` with header
//! `timestamp,open,high,low,close,volume`. Blank or unparseable cells are
//! passed on as missing fields. Only bars within `lookback_days` of the newest
//! timestamp in the file are returned.

use crate::domain::error::ScreenerError;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::RawBar;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(ndt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: Interval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.to_uppercase(), interval))
    }

    /// Symbols with a file for `interval`, sorted.
    pub fn list_symbols(&self, interval: Interval) -> Result<Vec<String>, ScreenerError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScreenerError::Retrieval {
            symbol: "*".into(),
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", interval);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(&suffix) {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ScreenerError> {
        let path = self.csv_path(symbol, interval);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScreenerError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            Err(e) => {
                return Err(ScreenerError::Retrieval {
                    symbol: symbol.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScreenerError::Retrieval {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            bars.push(RawBar {
                timestamp: record.get(0).and_then(parse_timestamp),
                open: parse_number(record.get(1)),
                high: parse_number(record.get(2)),
                low: parse_number(record.get(3)),
                close: parse_number(record.get(4)),
                volume: parse_number(record.get(5)),
            });
        }

        let Some(newest) = bars.iter().filter_map(|b| b.timestamp).max() else {
            return Err(ScreenerError::NoData {
                symbol: symbol.to_string(),
            });
        };
        let cutoff = newest - Duration::days(i64::from(lookback_days));
        bars.retain(|b| b.timestamp.is_none_or(|ts| ts > cutoff));
        bars.sort_by_key(|b| b.timestamp);

        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
