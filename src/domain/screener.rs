//! Batch screening: fetch, clean, enrich and classify each instrument.
//!
//! Instruments are processed one at a time in input order. Each one ends in an
//! [`InstrumentResult`] carrying an explicit status, so a failing symbol never
//! aborts the batch. The summary is assembled in a single pass over the
//! finished results and keeps input order.

use crate::domain::enriched::{enrich, EnrichedSeries};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::DEFAULT_ADX_WINDOW;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::RawBar;
use crate::domain::request::ScreeningRequest;
use crate::domain::series::clean_bars;
use crate::domain::signal::{classify, Signal, SignalColor, DEFAULT_ADX_THRESHOLD};
use crate::ports::data_port::DataPort;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerConfig {
    pub adx_window: usize,
    pub adx_threshold: f64,
    pub fetch_timeout: Duration,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            adx_window: DEFAULT_ADX_WINDOW,
            adx_threshold: DEFAULT_ADX_THRESHOLD,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentStatus {
    Ok,
    NoData { reason: String },
    Error { message: String },
}

impl InstrumentStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, InstrumentStatus::Ok)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            InstrumentStatus::Ok => "ok",
            InstrumentStatus::NoData { .. } => "no-data",
            InstrumentStatus::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstrumentResult {
    pub request: ScreeningRequest,
    pub status: InstrumentStatus,
    pub signal: Signal,
    /// Present whenever the status is `Ok`.
    pub series: Option<EnrichedSeries>,
    pub dropped_bars: usize,
}

impl InstrumentResult {
    fn failed(request: ScreeningRequest, status: InstrumentStatus) -> Self {
        Self {
            request,
            status,
            signal: Signal::Neutral,
            series: None,
            dropped_bars: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.request.symbol
    }

    pub fn color(&self) -> Option<SignalColor> {
        self.signal.color()
    }

    /// Chart title: `SYMBOL - Breakout ↑`, or just the symbol when neutral.
    pub fn title(&self) -> String {
        if self.signal.is_neutral() {
            self.request.symbol.clone()
        } else {
            format!("{} - {}", self.request.symbol, self.signal.label())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    pub symbol: String,
    pub signal: Signal,
    pub color: SignalColor,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub instruments: Vec<InstrumentResult>,
    pub summary: Vec<SummaryEntry>,
    /// True if cancellation stopped the batch before every request ran.
    pub cancelled: bool,
}

impl BatchResult {
    pub fn from_instruments(instruments: Vec<InstrumentResult>, cancelled: bool) -> Self {
        let summary = instruments
            .iter()
            .filter(|r| r.status.is_ok())
            .filter_map(|r| {
                r.signal.color().map(|color| SummaryEntry {
                    symbol: r.request.symbol.clone(),
                    signal: r.signal,
                    color,
                })
            })
            .collect();
        Self {
            instruments,
            summary,
            cancelled,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.instruments.iter().filter(|r| !r.status.is_ok()).count()
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentResult> {
        self.instruments.iter().find(|r| r.request.symbol == symbol)
    }
}

pub struct Screener {
    data_port: Arc<dyn DataPort>,
    config: ScreenerConfig,
}

impl Screener {
    pub fn new(data_port: Arc<dyn DataPort>, config: ScreenerConfig) -> Self {
        Self { data_port, config }
    }

    pub fn screen(&self, requests: &[ScreeningRequest]) -> BatchResult {
        self.screen_until(requests, &AtomicBool::new(false))
    }

    /// Like [`Screener::screen`], but checks `cancel` before starting each
    /// instrument. An instrument already in flight runs to completion.
    pub fn screen_until(&self, requests: &[ScreeningRequest], cancel: &AtomicBool) -> BatchResult {
        info!(
            instruments = requests.len(),
            source = self.data_port.name(),
            "Screening batch"
        );

        let mut results = Vec::with_capacity(requests.len());
        let mut cancelled = false;
        for request in requests {
            if cancel.load(Ordering::Relaxed) {
                warn!(remaining = requests.len() - results.len(), "Batch cancelled");
                cancelled = true;
                break;
            }
            let result = self.screen_one(request);
            debug!(symbol = %result.symbol(), status = result.status.tag(), "Instrument done");
            results.push(result);
        }

        let batch = BatchResult::from_instruments(results, cancelled);
        info!(
            signals = batch.summary.len(),
            failed = batch.failed_count(),
            "Batch complete"
        );
        batch
    }

    pub fn screen_one(&self, request: &ScreeningRequest) -> InstrumentResult {
        let request = ScreeningRequest {
            symbol: request.symbol.trim().to_string(),
            ..request.clone()
        };
        let symbol = request.symbol.clone();

        let raw = match self.fetch_with_timeout(&symbol, request.lookback_days, request.interval) {
            Ok(raw) => raw,
            Err(e) if e.is_no_data() => {
                warn!(%symbol, "No data for {}: {}", symbol, e);
                return InstrumentResult::failed(
                    request,
                    InstrumentStatus::NoData {
                        reason: e.to_string(),
                    },
                );
            }
            Err(e) => {
                warn!(%symbol, "Error with {}: {}", symbol, e);
                return InstrumentResult::failed(
                    request,
                    InstrumentStatus::Error {
                        message: e.to_string(),
                    },
                );
            }
        };

        let cleaned = clean_bars(&raw);
        if cleaned.is_empty() {
            warn!(%symbol, received = raw.len(), "No usable bars for {}", symbol);
            return InstrumentResult::failed(
                request,
                InstrumentStatus::NoData {
                    reason: ScreenerError::NoData {
                        symbol: symbol.clone(),
                    }
                    .to_string(),
                },
            );
        }
        if cleaned.dropped > 0 {
            debug!(%symbol, dropped = cleaned.dropped, "Dropped incomplete or malformed bars");
        }

        let dropped_bars = cleaned.dropped;
        let series = enrich(cleaned.bars, self.config.adx_window);
        let signal = series
            .last_point()
            .map(|p| classify(p.close, p.vwap, p.adx, self.config.adx_threshold))
            .unwrap_or(Signal::Neutral);

        info!(
            %symbol,
            bars = series.len(),
            adx_defined = series.adx.defined_count(),
            signal = %signal,
            "Classified"
        );

        InstrumentResult {
            request,
            status: InstrumentStatus::Ok,
            signal,
            series: Some(series),
            dropped_bars,
        }
    }

    /// Runs the fetch on a helper thread so a stalled data source costs at
    /// most `fetch_timeout`. The helper is left detached on timeout.
    fn fetch_with_timeout(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ScreenerError> {
        let (tx, rx) = mpsc::channel();
        let port = Arc::clone(&self.data_port);
        let owned_symbol = symbol.to_string();

        thread::Builder::new()
            .name(format!("fetch-{}", symbol))
            .spawn(move || {
                let _ = tx.send(port.fetch_ohlcv(&owned_symbol, lookback_days, interval));
            })
            .map_err(|e| ScreenerError::Retrieval {
                symbol: symbol.to_string(),
                reason: format!("failed to start fetch: {}", e),
            })?;

        match rx.recv_timeout(self.config.fetch_timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ScreenerError::Timeout {
                symbol: symbol.to_string(),
                secs: self.config.fetch_timeout.as_secs(),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(ScreenerError::Retrieval {
                symbol: symbol.to_string(),
                reason: "data source aborted unexpectedly".into(),
            }),
        }
    }
}
