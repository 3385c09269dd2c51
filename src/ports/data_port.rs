//! Market data retrieval port trait.

use crate::domain::error::ScreenerError;
use crate::domain::interval::Interval;
use crate::domain::ohlcv::RawBar;

/// Source of OHLCV history for one symbol.
///
/// Implementations return bars time-ordered ascending covering at most
/// `lookback_days` of trading history at `interval` granularity. An unknown
/// symbol or a window with no trading yields `ScreenerError::NoData`, never a
/// panic. Rows may carry missing fields; the screener cleans them.
pub trait DataPort: Send + Sync {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<Vec<RawBar>, ScreenerError>;

    fn name(&self) -> &str;
}
