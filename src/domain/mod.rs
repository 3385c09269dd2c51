//! Core domain types and logic.

pub mod ohlcv;
pub mod series;
pub mod interval;
pub mod request;
pub mod indicator;
pub mod enriched;
pub mod signal;
pub mod screener;
pub mod config_validation;
pub mod error;
