//! HTML report adapter implementing ReportPort.
//!
//! Generates a single page using an Askama template: the momentum summary
//! first, then one section per instrument with an inline SVG candlestick chart
//! or an explicit no-data / error notice.

use std::fs;
use std::path::Path;

use crate::adapters::chart_svg::candlestick_svg;
use crate::domain::error::ScreenerError;
use crate::domain::screener::{BatchResult, InstrumentResult, InstrumentStatus};
use crate::ports::report_port::ReportPort;

use askama::Template;

struct SummaryView {
    symbol: String,
    label: String,
    color: String,
}

struct InstrumentView {
    symbol: String,
    title: String,
    is_ok: bool,
    is_no_data: bool,
    message: String,
    chart_svg: String,
    bars: usize,
    last_close: String,
    last_vwap: String,
    last_adx: String,
}

#[derive(Template)]
#[template(path = "screen.html")]
struct ScreenTemplate {
    generated_at: String,
    adx_threshold: String,
    cancelled: bool,
    summary: Vec<SummaryView>,
    instruments: Vec<InstrumentView>,
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn instrument_view(result: &InstrumentResult) -> InstrumentView {
    let title = result.title();
    let (is_ok, is_no_data, message) = match &result.status {
        InstrumentStatus::Ok => (true, false, String::new()),
        InstrumentStatus::NoData { reason } => (false, true, reason.clone()),
        InstrumentStatus::Error { message } => (false, false, message.clone()),
    };

    let (chart_svg, bars, point) = match &result.series {
        Some(series) => (
            candlestick_svg(series, &title),
            series.len(),
            series.last_point(),
        ),
        None => (String::new(), 0, None),
    };

    InstrumentView {
        symbol: result.symbol().to_string(),
        title,
        is_ok,
        is_no_data,
        message,
        chart_svg,
        bars,
        last_close: format_value(point.map(|p| p.close)),
        last_vwap: format_value(point.and_then(|p| p.vwap)),
        last_adx: format_value(point.and_then(|p| p.adx)),
    }
}

pub struct HtmlReportAdapter {
    adx_threshold: f64,
}

impl HtmlReportAdapter {
    pub fn new(adx_threshold: f64) -> Self {
        Self { adx_threshold }
    }

    pub fn render(&self, batch: &BatchResult) -> Result<String, ScreenerError> {
        let template = ScreenTemplate {
            generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            adx_threshold: format!("{}", self.adx_threshold),
            cancelled: batch.cancelled,
            summary: batch
                .summary
                .iter()
                .map(|entry| SummaryView {
                    symbol: entry.symbol.clone(),
                    label: entry.signal.label().to_string(),
                    color: entry.color.as_str().to_string(),
                })
                .collect(),
            instruments: batch.instruments.iter().map(instrument_view).collect(),
        };

        template.render().map_err(|e| ScreenerError::Report {
            reason: e.to_string(),
        })
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, batch: &BatchResult, output_path: &str) -> Result<(), ScreenerError> {
        let html = self.render(batch)?;

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;

        Ok(())
    }
}
