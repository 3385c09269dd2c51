//! Screening requests and symbol-list parsing.

use crate::domain::error::ScreenerError;
use crate::domain::interval::Interval;
use std::collections::HashSet;

pub const DEFAULT_SYMBOLS: &str = "RELIANCE.NS,TATASTEEL.NS,HDFCBANK.NS";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningRequest {
    pub symbol: String,
    pub lookback_days: u32,
    pub interval: Interval,
}

impl ScreeningRequest {
    /// Builds a request with the symbol trimmed. The symbol must be non-empty
    /// and the lookback at least one day.
    pub fn new(
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Self, ScreenerError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ScreenerError::InvalidRequest {
                reason: "symbol is empty".into(),
            });
        }
        if lookback_days == 0 {
            return Err(ScreenerError::InvalidRequest {
                reason: format!("lookback for {} must be at least 1 day", symbol),
            });
        }
        Ok(Self {
            symbol: symbol.to_string(),
            lookback_days,
            interval,
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SymbolListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

impl From<SymbolListError> for ScreenerError {
    fn from(err: SymbolListError) -> Self {
        ScreenerError::InvalidRequest {
            reason: err.to_string(),
        }
    }
}

/// Splits a comma-separated symbol list, trimming and uppercasing each token.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, SymbolListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SymbolListError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(SymbolListError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// One request per symbol, all sharing the same lookback and interval.
pub fn build_requests(
    symbols: &[String],
    lookback_days: u32,
    interval: Interval,
) -> Result<Vec<ScreeningRequest>, ScreenerError> {
    symbols
        .iter()
        .map(|s| ScreeningRequest::new(s, lookback_days, interval))
        .collect()
}
