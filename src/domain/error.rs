//! Domain error types.

/// Top-level error type for vwapscreen.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid screening request: {reason}")]
    InvalidRequest { reason: String },

    #[error("invalid interval '{0}' (expected one of 5m, 15m, 1h, 1d)")]
    InvalidInterval(String),

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("retrieval failed for {symbol}: {reason}")]
    Retrieval { symbol: String, reason: String },

    #[error("retrieval for {symbol} timed out after {secs}s")]
    Timeout { symbol: String, secs: u64 },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenerError {
    /// True for the failures that mean "the collaborator had nothing to give".
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            ScreenerError::NoData { .. } | ScreenerError::Timeout { .. }
        )
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) | ScreenerError::Report { .. } => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. }
            | ScreenerError::InvalidRequest { .. }
            | ScreenerError::InvalidInterval(_) => 2,
            ScreenerError::NoData { .. }
            | ScreenerError::Retrieval { .. }
            | ScreenerError::Timeout { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
