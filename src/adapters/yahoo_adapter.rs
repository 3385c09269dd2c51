//! Yahoo Finance data adapter.
//!
//! Fetches intraday or daily bars from Yahoo's v8 chart API using a relative
//! range (`range=<n>d`). Null cells in the quote arrays become missing fields.
//! Retries connection failures and 5xx/429 responses with exponential backoff.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use crate::domain::error::ScreenerError;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::RawBar;
use crate::ports::data_port::DataPort;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Per-request timeout such that every attempt plus the backoff sleeps fits
/// inside `budget`. If the backoff alone exceeds it, attempts share half the
/// budget.
fn attempt_timeout(budget: Duration, max_retries: u32, base_delay: Duration) -> Duration {
    let attempts = max_retries.saturating_add(1);
    let backoff = base_delay.saturating_mul(2u32.saturating_pow(max_retries).saturating_sub(1));
    budget.saturating_sub(backoff).max(budget / attempts / 2) / attempts
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooAdapter {
    /// `budget` bounds the whole fetch, retries and backoff included.
    pub fn new(budget: Duration, max_retries: u32) -> Result<Self, ScreenerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(attempt_timeout(budget, max_retries, BASE_DELAY))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ScreenerError::Retrieval {
                symbol: "*".into(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            max_retries,
            base_delay: BASE_DELAY,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chart_url(&self, symbol: &str, lookback_days: u32, interval: Interval) -> String {
        format!(
            "{}/{}?range={}d&interval={}&includePrePost=false",
            self.base_url, symbol, lookback_days, interval
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, ScreenerError> {
        let no_data = || ScreenerError::NoData {
            symbol: symbol.to_string(),
        };

        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => return Err(no_data()),
            (None, Some(err)) => {
                return Err(ScreenerError::Retrieval {
                    symbol: symbol.to_string(),
                    reason: format!("{}: {}", err.code, err.description),
                });
            }
            (None, None) => return Err(no_data()),
        };

        let data = result.into_iter().next().ok_or_else(no_data)?;
        // Yahoo omits timestamps entirely when the window had no trading
        let timestamps = data.timestamp.ok_or_else(no_data)?;
        let quote = data.indicators.quote.into_iter().next().ok_or_else(no_data)?;

        let cell = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

        let bars: Vec<RawBar> = timestamps
            .iter()
            .enumerate()
            .map(|(i, &ts)| RawBar {
                timestamp: DateTime::from_timestamp(ts, 0),
                open: cell(&quote.open, i),
                high: cell(&quote.high, i),
                low: cell(&quote.low, i),
                close: cell(&quote.close, i),
                volume: cell(&quote.volume, i),
            })
            .filter(|bar| !bar.is_empty())
            .collect();

        if bars.is_empty() {
            return Err(no_data());
        }
        Ok(bars)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ScreenerError> {
        let url = self.chart_url(symbol, lookback_days, interval);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(%symbol, attempt, delay_ms = delay.as_millis() as u64, "Retrying");
                std::thread::sleep(delay);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(ScreenerError::Retrieval {
                        symbol: symbol.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => {
                    return Err(ScreenerError::Retrieval {
                        symbol: symbol.to_string(),
                        reason: e.to_string(),
                    });
                }
            };

            let status = resp.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScreenerError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                warn!(%symbol, %status, "Yahoo request failed");
                last_error = Some(ScreenerError::Retrieval {
                    symbol: symbol.to_string(),
                    reason: format!("HTTP {}", status),
                });
                continue;
            }
            if !status.is_success() {
                return Err(ScreenerError::Retrieval {
                    symbol: symbol.to_string(),
                    reason: format!("HTTP {}", status),
                });
            }

            let chart: ChartResponse = resp.json().map_err(|e| ScreenerError::Retrieval {
                symbol: symbol.to_string(),
                reason: format!("failed to parse response: {}", e),
            })?;
            return Self::parse_response(symbol, chart);
        }

        Err(last_error.unwrap_or_else(|| ScreenerError::Retrieval {
            symbol: symbol.to_string(),
            reason: "max retries exceeded".into(),
        }))
    }
}

impl DataPort for YahooAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ScreenerError> {
        self.fetch_with_retry(symbol, lookback_days, interval)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
