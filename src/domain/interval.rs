//! Sampling interval of a bar series.

use crate::domain::error::ScreenerError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interval {
    #[default]
    M5,
    M15,
    H1,
    D1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5m" => Ok(Interval::M5),
            "15m" => Ok(Interval::M15),
            "1h" | "60m" => Ok(Interval::H1),
            "1d" => Ok(Interval::D1),
            other => Err(ScreenerError::InvalidInterval(other.to_string())),
        }
    }
}
