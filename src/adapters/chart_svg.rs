//! SVG candlestick charts with a VWAP overlay.

use crate::domain::enriched::EnrichedSeries;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 320.0;
const PADDING: f64 = 40.0;
const UP_COLOR: &str = "#26a69a";
const DOWN_COLOR: &str = "#ef5350";
const VWAP_COLOR: &str = "blue";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders candles for every bar and the VWAP line wherever it is defined.
pub fn candlestick_svg(series: &EnrichedSeries, title: &str) -> String {
    if series.is_empty() {
        return "<p>No chart data available.</p>".to_string();
    }

    let lows = series
        .bars
        .iter()
        .map(|b| b.low)
        .chain(series.vwap.values.iter().flatten().copied());
    let highs = series
        .bars
        .iter()
        .map(|b| b.high)
        .chain(series.vwap.values.iter().flatten().copied());
    let min_price = lows.fold(f64::INFINITY, f64::min);
    let max_price = highs.fold(f64::NEG_INFINITY, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max_price - min_price;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let slot = plot_width / series.len() as f64;
    let body_width = (slot * 0.6).max(1.0);

    let y = |price: f64| HEIGHT - PADDING - (price - min_price) * scale_y;
    let x = |i: usize| PADDING + (i as f64 + 0.5) * slot;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r#"<text x="{:.0}" y="20" font-family="sans-serif" font-size="14">{}</text>"#,
        PADDING,
        escape(title)
    ));
    svg.push_str(&format!(
        r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#ccc"/>"##,
        PADDING, PADDING, plot_width, plot_height
    ));
    svg.push_str(&format!(
        r#"<text x="2" y="{:.1}" font-size="10">{:.2}</text><text x="2" y="{:.1}" font-size="10">{:.2}</text>"#,
        PADDING + 4.0,
        max_price,
        HEIGHT - PADDING,
        min_price
    ));

    for (i, bar) in series.bars.iter().enumerate() {
        let color = if bar.close >= bar.open { UP_COLOR } else { DOWN_COLOR };
        let top = y(bar.open.max(bar.close));
        let bottom = y(bar.open.min(bar.close));
        svg.push_str(&format!(
            r#"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="{c}"/>"#,
            y(bar.high),
            y(bar.low),
            cx = x(i),
            c = color
        ));
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x(i) - body_width / 2.0,
            top,
            body_width,
            (bottom - top).max(1.0),
            color
        ));
    }

    let vwap_points: Vec<String> = (0..series.len())
        .filter_map(|i| series.vwap.get(i).map(|price| format!("{:.1},{:.1}", x(i), y(price))))
        .collect();
    if !vwap_points.is_empty() {
        svg.push_str(&format!(
            r#"<polyline class="vwap" fill="none" stroke="{}" stroke-width="1.5" points="{}"/>"#,
            VWAP_COLOR,
            vwap_points.join(" ")
        ));
        svg.push_str(&format!(
            r#"<text x="{:.0}" y="20" font-family="sans-serif" font-size="12" fill="{}">{}</text>"#,
            WIDTH - PADDING - 40.0,
            VWAP_COLOR,
            series.vwap.indicator_type
        ));
    }

    svg.push_str("</svg>");
    svg
}
