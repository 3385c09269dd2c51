//! Report generation port trait.

use crate::domain::error::ScreenerError;
use crate::domain::screener::BatchResult;

/// Port for rendering a screening batch (summary plus per-instrument charts).
pub trait ReportPort {
    fn write(&self, batch: &BatchResult, output_path: &str) -> Result<(), ScreenerError>;
}
