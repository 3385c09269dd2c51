//! ADX (Average Directional Index) indicator implementation.
//!
//! Per bar i >= 1:
//! - up = high[i] - high[i-1], down = low[i-1] - low[i]
//! - +DM = up if up > down and up > 0, else 0
//! - -DM = down if down > up and down > 0, else 0
//! - TR = max(high - low, |high - prev_close|, |low - prev_close|)
//!
//! TR, +DM and -DM are Wilder-smoothed over `n` bars: the first smoothed value
//! (at bar n) is the sum of the first n raw values, thereafter
//! S = S_prev - S_prev / n + raw.
//!
//! +DI = 100 * S(+DM) / S(TR), -DI = 100 * S(-DM) / S(TR),
//! DX = 100 * |+DI - -DI| / (+DI + -DI). Zero denominators yield 0.
//!
//! ADX averages DX: while fewer than n DX values exist it is their running
//! mean, after that ADX = (ADX_prev * (n-1) + DX) / n.
//!
//! Warmup: the first n bars are undefined. A series shorter than n + 1 bars is
//! entirely undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

fn directional_movement(prev: &OhlcvBar, bar: &OhlcvBar) -> (f64, f64) {
    let up = bar.high - prev.high;
    let down = prev.low - bar.low;
    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };
    (plus, minus)
}

fn directional_index(tr: f64, plus_dm: f64, minus_dm: f64) -> f64 {
    if tr <= 0.0 {
        return 0.0;
    }
    let plus_di = 100.0 * plus_dm / tr;
    let minus_di = 100.0 * minus_dm / tr;
    let sum = plus_di + minus_di;
    if sum <= 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / sum
    }
}

pub fn calculate_adx(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Adx(window);
    if window == 0 || bars.len() <= window {
        return IndicatorSeries::undefined(indicator_type, bars.len());
    }

    let mut values: Vec<Option<f64>> = vec![None; window];
    values.reserve(bars.len() - window);

    let n = window as f64;
    let mut tr_s = 0.0;
    let mut plus_s = 0.0;
    let mut minus_s = 0.0;

    for i in 1..=window {
        let (plus, minus) = directional_movement(&bars[i - 1], &bars[i]);
        tr_s += bars[i].true_range(bars[i - 1].close);
        plus_s += plus;
        minus_s += minus;
    }

    let mut dx_count = 1usize;
    let mut dx_sum = directional_index(tr_s, plus_s, minus_s);
    let mut adx = dx_sum;
    values.push(Some(adx));

    for i in (window + 1)..bars.len() {
        let (plus, minus) = directional_movement(&bars[i - 1], &bars[i]);
        tr_s = tr_s - tr_s / n + bars[i].true_range(bars[i - 1].close);
        plus_s = plus_s - plus_s / n + plus;
        minus_s = minus_s - minus_s / n + minus;

        let dx = directional_index(tr_s, plus_s, minus_s);
        if dx_count < window {
            dx_count += 1;
            dx_sum += dx;
            adx = dx_sum / dx_count as f64;
        } else {
            adx = (adx * (n - 1.0) + dx) / n;
        }
        values.push(Some(adx));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
