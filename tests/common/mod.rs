#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use vwapscreen::domain::error::ScreenerError;
use vwapscreen::domain::interval::Interval;
pub use vwapscreen::domain::ohlcv::{OhlcvBar, RawBar};
use vwapscreen::domain::request::ScreeningRequest;
use vwapscreen::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<RawBar>>,
    pub errors: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        _lookback_days: u32,
        _interval: Interval,
    ) -> Result<Vec<RawBar>, ScreenerError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScreenerError::Retrieval {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) => Ok(bars.clone()),
            None => Err(ScreenerError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 3, 45, 0).unwrap()
}

pub fn raw(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> RawBar {
    RawBar::complete(
        start() + Duration::minutes(5 * i as i64),
        open,
        high,
        low,
        close,
        volume,
    )
}

/// Strictly rising closes; -DM is zero throughout so ADX saturates.
pub fn rising_bars(count: usize, start_price: f64) -> Vec<RawBar> {
    (0..count)
        .map(|i| {
            let c = start_price + i as f64;
            raw(i, c - 0.5, c + 0.5, c - 1.0, c, 1_000.0)
        })
        .collect()
}

/// Strictly falling closes; +DM is zero throughout so ADX saturates.
pub fn falling_bars(count: usize, start_price: f64) -> Vec<RawBar> {
    (0..count)
        .map(|i| {
            let c = start_price - i as f64;
            raw(i, c + 0.5, c + 1.0, c - 0.5, c, 1_000.0)
        })
        .collect()
}

/// Alternating one-point swings; +DM and -DM cancel out and ADX stays low.
pub fn choppy_bars(count: usize) -> Vec<RawBar> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                raw(i, 100.0, 101.0, 99.0, 100.0, 1_000.0)
            } else {
                raw(i, 101.0, 102.0, 100.0, 101.0, 1_000.0)
            }
        })
        .collect()
}

pub fn to_bars(raw: &[RawBar]) -> Vec<OhlcvBar> {
    raw.iter().filter_map(RawBar::to_bar).collect()
}

pub fn request(symbol: &str) -> ScreeningRequest {
    ScreeningRequest::new(symbol, 2, Interval::M5).unwrap()
}

pub fn requests(symbols: &[&str]) -> Vec<ScreeningRequest> {
    symbols.iter().map(|s| request(s)).collect()
}
