//! Breakout / breakdown classification of the latest bar.

use std::fmt;

pub const DEFAULT_ADX_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Breakout,
    Breakdown,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalColor {
    Green,
    Red,
}

impl SignalColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalColor::Green => "green",
            SignalColor::Red => "red",
        }
    }
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Signal {
    pub fn color(&self) -> Option<SignalColor> {
        match self {
            Signal::Breakout => Some(SignalColor::Green),
            Signal::Breakdown => Some(SignalColor::Red),
            Signal::Neutral => None,
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Signal::Neutral)
    }

    /// Label shown in chart titles and the summary. Empty for neutral.
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Breakout => "Breakout ↑",
            Signal::Breakdown => "Breakdown ↓",
            Signal::Neutral => "",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Breakout => write!(f, "Breakout"),
            Signal::Breakdown => write!(f, "Breakdown"),
            Signal::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Close above VWAP with ADX strictly above the threshold is a breakout,
/// close below VWAP with the same trend strength a breakdown. Everything else,
/// including an undefined VWAP or ADX, is neutral.
pub fn classify(close: f64, vwap: Option<f64>, adx: Option<f64>, threshold: f64) -> Signal {
    let (Some(vwap), Some(adx)) = (vwap, adx) else {
        return Signal::Neutral;
    };
    if adx > threshold && close > vwap {
        Signal::Breakout
    } else if adx > threshold && close < vwap {
        Signal::Breakdown
    } else {
        Signal::Neutral
    }
}
