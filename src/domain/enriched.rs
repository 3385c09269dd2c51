//! Bars plus their aligned VWAP and ADX columns.

use crate::domain::indicator::adx::calculate_adx;
use crate::domain::indicator::vwap::calculate_vwap;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    pub bars: Vec<OhlcvBar>,
    pub vwap: IndicatorSeries,
    pub adx: IndicatorSeries,
}

/// Close, VWAP and ADX at the most recent bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPoint {
    pub close: f64,
    pub vwap: Option<f64>,
    pub adx: Option<f64>,
}

impl EnrichedSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last_point(&self) -> Option<DecisionPoint> {
        let last = self.bars.last()?;
        Some(DecisionPoint {
            close: last.close,
            vwap: self.vwap.last(),
            adx: self.adx.last(),
        })
    }
}

pub fn enrich(bars: Vec<OhlcvBar>, adx_window: usize) -> EnrichedSeries {
    let vwap = calculate_vwap(&bars);
    let adx = calculate_adx(&bars, adx_window);
    EnrichedSeries { bars, vwap, adx }
}
