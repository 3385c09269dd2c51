//! Cumulative VWAP anchored at the first bar of the series.
//!
//! VWAP[i] = Σ(tp[j] * vol[j]) / Σ vol[j] for j in 0..=i, tp = (H + L + C) / 3.
//! The anchor is the series start, not the trading session: a multi-day
//! lookback produces one running VWAP across all of it.
//!
//! Bars where cumulative volume is still zero are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_vwap(bars: &[OhlcvBar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;

    for bar in bars {
        cum_pv += bar.typical_price() * bar.volume;
        cum_vol += bar.volume;
        values.push(if cum_vol > 0.0 {
            Some(cum_pv / cum_vol)
        } else {
            None
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Vwap,
        values,
    }
}
