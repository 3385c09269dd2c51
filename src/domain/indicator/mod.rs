//! Technical indicator implementations.
//!
//! Every indicator produces an [`IndicatorSeries`] aligned one-to-one with the
//! input bars. A `None` slot marks a bar where the indicator is undefined
//! (warm-up, or zero cumulative volume for VWAP).

pub mod adx;
pub mod vwap;

use std::fmt;

pub const DEFAULT_ADX_WINDOW: usize = 14;
pub const MAX_ADX_WINDOW: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Vwap,
    Adx(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn undefined(indicator_type: IndicatorType, len: usize) -> Self {
        Self {
            indicator_type,
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value at the most recent bar, if defined.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Vwap => write!(f, "VWAP"),
            IndicatorType::Adx(window) => write!(f, "ADX({})", window),
        }
    }
}
