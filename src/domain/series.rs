//! Bar-level integrity checks applied before indicator computation.
//!
//! Offending bars are dropped rather than failing the instrument. A bar is
//! kept only if every field is present, prices are finite and positive,
//! volume is finite and non-negative, `low <= open, close <= high`, and its
//! timestamp is strictly after the previously kept bar.

use crate::domain::ohlcv::{OhlcvBar, RawBar};

#[derive(Debug, Clone, Default)]
pub struct CleanedSeries {
    pub bars: Vec<OhlcvBar>,
    pub dropped: usize,
}

impl CleanedSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn is_well_formed(bar: &OhlcvBar) -> bool {
    let prices = [bar.open, bar.high, bar.low, bar.close];
    if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return false;
    }
    if !bar.volume.is_finite() || bar.volume < 0.0 {
        return false;
    }
    bar.low <= bar.high
        && bar.low <= bar.open
        && bar.open <= bar.high
        && bar.low <= bar.close
        && bar.close <= bar.high
}

pub fn clean_bars(raw: &[RawBar]) -> CleanedSeries {
    let mut bars: Vec<OhlcvBar> = Vec::with_capacity(raw.len());
    let mut dropped = 0;

    for candidate in raw {
        let Some(bar) = candidate.to_bar() else {
            dropped += 1;
            continue;
        };
        if !is_well_formed(&bar) {
            dropped += 1;
            continue;
        }
        if let Some(prev) = bars.last() {
            if bar.timestamp <= prev.timestamp {
                dropped += 1;
                continue;
            }
        }
        bars.push(bar);
    }

    CleanedSeries { bars, dropped }
}
