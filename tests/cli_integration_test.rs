mod common;

use common::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use vwapscreen::adapters::csv_adapter::CsvAdapter;
use vwapscreen::adapters::file_config_adapter::FileConfigAdapter;
#[cfg(feature = "html")]
use vwapscreen::adapters::html_report_adapter::HtmlReportAdapter;
use vwapscreen::cli::{
    build_data_port, build_settings, format_batch, load_config, DataSource, ScreenOverrides,
    ScreenSettings,
};
use vwapscreen::domain::error::ScreenerError;
use vwapscreen::domain::interval::Interval;
use vwapscreen::domain::request::build_requests;
use vwapscreen::domain::screener::{BatchResult, InstrumentStatus, Screener};
use vwapscreen::domain::signal::Signal;
use vwapscreen::ports::data_port::DataPort;
#[cfg(feature = "html")]
use vwapscreen::ports::report_port::ReportPort;

fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

fn write_csv(dir: &Path, symbol: &str, bars: &[RawBar]) {
    let mut content = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.unwrap().to_rfc3339(),
            cell(bar.open),
            cell(bar.high),
            cell(bar.low),
            cell(bar.close),
            cell(bar.volume),
        ));
    }
    fs::write(dir.join(format!("{}_5m.csv", symbol)), content).unwrap();
}

#[test]
fn defaults_without_config() {
    let settings = build_settings(&FileConfigAdapter::empty(), &ScreenOverrides::default()).unwrap();

    assert_eq!(
        settings.symbols,
        vec!["RELIANCE.NS", "TATASTEEL.NS", "HDFCBANK.NS"]
    );
    assert_eq!(settings.interval, Interval::M5);
    assert_eq!(settings.lookback_days, 2);
    assert_eq!(settings.screener.adx_window, 14);
    assert_eq!(settings.screener.adx_threshold, 20.0);
    assert_eq!(settings.screener.fetch_timeout, Duration::from_secs(30));
    assert_eq!(settings.source, DataSource::Yahoo { max_retries: 2 });
    assert_eq!(settings.output, PathBuf::from("screen.html"));
}

#[test]
fn config_file_values_are_used() {
    let cfg = config(
        r#"
[screener]
symbols = infy.ns, tcs.ns
interval = 15m
lookback_days = 5
adx_window = 10
adx_threshold = 25
fetch_timeout_secs = 12

[data]
source = csv
csv_dir = /tmp/bars

[report]
output = out/report.html
"#,
    );
    let settings = build_settings(&cfg, &ScreenOverrides::default()).unwrap();

    assert_eq!(settings.symbols, vec!["INFY.NS", "TCS.NS"]);
    assert_eq!(settings.interval, Interval::M15);
    assert_eq!(settings.lookback_days, 5);
    assert_eq!(settings.screener.adx_window, 10);
    assert_eq!(settings.screener.adx_threshold, 25.0);
    assert_eq!(settings.screener.fetch_timeout, Duration::from_secs(12));
    assert_eq!(
        settings.source,
        DataSource::Csv {
            dir: PathBuf::from("/tmp/bars")
        }
    );
    assert_eq!(settings.output, PathBuf::from("out/report.html"));
}

#[test]
fn overrides_take_precedence() {
    let cfg = config("[screener]\nsymbols = INFY.NS\ninterval = 15m\n");
    let overrides = ScreenOverrides {
        symbols: Some("sbin.ns".into()),
        interval: Some("1h".into()),
        lookback: Some(10),
        adx_threshold: Some(30.0),
        data_dir: Some(PathBuf::from("data")),
        ..Default::default()
    };
    let settings = build_settings(&cfg, &overrides).unwrap();

    assert_eq!(settings.symbols, vec!["SBIN.NS"]);
    assert_eq!(settings.interval, Interval::H1);
    assert_eq!(settings.lookback_days, 10);
    assert_eq!(settings.screener.adx_threshold, 30.0);
    assert_eq!(
        settings.source,
        DataSource::Csv {
            dir: PathBuf::from("data")
        }
    );
}

#[test]
fn invalid_inputs_are_rejected() {
    let empty = FileConfigAdapter::empty();
    let cases = [
        ScreenOverrides {
            symbols: Some("A.NS,,B.NS".into()),
            ..Default::default()
        },
        ScreenOverrides {
            symbols: Some("A.NS,a.ns".into()),
            ..Default::default()
        },
        ScreenOverrides {
            interval: Some("7m".into()),
            ..Default::default()
        },
        ScreenOverrides {
            lookback: Some(0),
            ..Default::default()
        },
        ScreenOverrides {
            lookback: Some(61),
            ..Default::default()
        },
        ScreenOverrides {
            adx_window: Some(0),
            ..Default::default()
        },
        ScreenOverrides {
            adx_window: Some(usize::MAX),
            ..Default::default()
        },
        ScreenOverrides {
            adx_threshold: Some(150.0),
            ..Default::default()
        },
        ScreenOverrides {
            timeout: Some(0),
            ..Default::default()
        },
        ScreenOverrides {
            source: Some("bloomberg".into()),
            ..Default::default()
        },
        ScreenOverrides {
            source: Some("csv".into()),
            ..Default::default()
        },
    ];

    for overrides in &cases {
        let err = build_settings(&empty, overrides).unwrap_err();
        assert!(
            matches!(
                err,
                ScreenerError::ConfigInvalid { .. }
                    | ScreenerError::ConfigMissing { .. }
                    | ScreenerError::InvalidRequest { .. }
                    | ScreenerError::InvalidInterval(_)
            ),
            "{:?} -> {}",
            overrides,
            err
        );
    }
}

#[test]
fn invalid_config_values_are_rejected() {
    let cfg = config("[screener]\nlookback_days = 90\n");
    assert!(matches!(
        build_settings(&cfg, &ScreenOverrides::default()),
        Err(ScreenerError::ConfigInvalid { .. })
    ));
}

#[test]
fn missing_config_file_is_a_parse_error() {
    let err = load_config(&PathBuf::from("/nonexistent/screener.ini")).unwrap_err();
    assert!(matches!(err, ScreenerError::ConfigParse { .. }));
}

fn screen_csv_fixture(dir: &Path) -> (ScreenSettings, BatchResult) {
    write_csv(dir, "UP.NS", &rising_bars(30, 100.0));
    write_csv(dir, "DOWN.NS", &falling_bars(30, 250.0));
    write_csv(dir, "FLAT.NS", &choppy_bars(40));

    let overrides = ScreenOverrides {
        symbols: Some("up.ns, flat.ns, missing.ns, down.ns".into()),
        data_dir: Some(dir.to_path_buf()),
        output: Some(dir.join("report").join("screen.html")),
        ..Default::default()
    };
    let settings = build_settings(&FileConfigAdapter::empty(), &overrides).unwrap();
    let requests =
        build_requests(&settings.symbols, settings.lookback_days, settings.interval).unwrap();
    let port = build_data_port(&settings).unwrap();
    let batch = Screener::new(port, settings.screener.clone()).screen(&requests);
    (settings, batch)
}

#[test]
fn csv_screen_end_to_end() {
    let dir = tempdir().unwrap();
    let (_, batch) = screen_csv_fixture(dir.path());

    assert_eq!(batch.get("UP.NS").unwrap().signal, Signal::Breakout);
    assert_eq!(batch.get("DOWN.NS").unwrap().signal, Signal::Breakdown);
    assert_eq!(batch.get("FLAT.NS").unwrap().signal, Signal::Neutral);
    assert!(matches!(
        batch.get("MISSING.NS").unwrap().status,
        InstrumentStatus::NoData { .. }
    ));

    let text = format_batch(&batch);
    assert!(text.contains("=== Momentum Summary ==="));
    let up = text.find("UP.NS: Breakout ↑ [green]").unwrap();
    let down = text.find("DOWN.NS: Breakdown ↓ [red]").unwrap();
    assert!(up < down);
    let missing = text.lines().find(|l| l.contains("MISSING.NS")).unwrap();
    assert!(missing.contains("NO DATA"));
}

#[cfg(feature = "html")]
#[test]
fn csv_screen_writes_html_report() {
    let dir = tempdir().unwrap();
    let (settings, batch) = screen_csv_fixture(dir.path());

    let output = settings.output.display().to_string();
    HtmlReportAdapter::new(settings.screener.adx_threshold)
        .write(&batch, &output)
        .unwrap();
    let html = fs::read_to_string(&settings.output).unwrap();
    assert!(html.contains("<h3>UP.NS - Breakout ↑</h3>"));
    assert!(html.contains("<h3>FLAT.NS</h3>"));
    assert!(html.contains("No data for MISSING.NS"));
}

#[test]
fn format_batch_without_signals() {
    let port = MockDataPort::new()
        .with_bars("FLAT.NS", choppy_bars(40))
        .with_error("BAD.NS", "HTTP 500");
    let batch = Screener::new(Arc::new(port), Default::default())
        .screen(&requests(&["FLAT.NS", "BAD.NS"]));

    let text = format_batch(&batch);
    assert!(text.contains("(no signals)"));
    let bad = text.lines().find(|l| l.contains("BAD.NS")).unwrap();
    assert!(bad.contains("ERROR"));
    assert!(bad.contains("HTTP 500"));
}

#[test]
fn csv_lookback_is_relative_to_newest_bar() {
    let dir = tempdir().unwrap();
    let bars: Vec<RawBar> = (0..3)
        .map(|day| {
            let mut bar = raw(0, 100.0, 101.0, 99.0, 100.5, 500.0);
            bar.timestamp = Some(start() + chrono::Duration::days(day));
            bar
        })
        .collect();
    write_csv(dir.path(), "DAILY.NS", &bars);

    let adapter = CsvAdapter::new(dir.path().to_path_buf());
    let fetched = adapter.fetch_ohlcv("daily.ns", 1, Interval::M5).unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(adapter.list_symbols(Interval::M5).unwrap(), vec!["DAILY.NS"]);
}
