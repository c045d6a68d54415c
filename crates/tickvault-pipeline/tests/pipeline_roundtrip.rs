//! End-to-end pipeline properties: ordering, header-once, flush triggers,
//! filtering, rotation, and finalize naming, exercised through the public
//! pipeline API with real files.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tickvault_core::{Granularity, Instrument, Price, StreamKind, TickRecord};
use tickvault_pipeline::format::{LineFormatter, TICK_HEADER};
use tickvault_pipeline::{
    CompressionMode, Pipeline, PipelineConfig, RotationMode, TickFilterMode,
};

fn eurusd() -> Instrument {
    Instrument::new("EURUSD", 5).unwrap()
}

fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()
}

fn tick(offset_ms: i64, bid: Decimal, ask: Decimal) -> TickRecord {
    TickRecord::new(
        session_start() + Duration::milliseconds(offset_ms),
        Price::new(bid),
        Price::new(ask),
        1,
    )
}

fn config() -> PipelineConfig {
    PipelineConfig {
        flush_every_record: true,
        ..PipelineConfig::default()
    }
}

fn start_tick_pipeline(root: &TempDir, config: &PipelineConfig) -> Pipeline {
    Pipeline::start(
        eurusd(),
        Granularity::Tick,
        StreamKind::Ticks,
        root.path(),
        config,
        session_start(),
    )
}

#[tokio::test]
async fn ordering_matches_arrival_order() {
    let root = TempDir::new().unwrap();
    let config = config();
    let formatter = LineFormatter::new(eurusd(), Granularity::Tick, 0);

    let ticks: Vec<TickRecord> = (0..25)
        .map(|i| {
            tick(
                i * 137,
                dec!(1.1000) + Decimal::new(i, 4),
                dec!(1.1002) + Decimal::new(i, 4),
            )
        })
        .collect();

    let mut pipeline = start_tick_pipeline(&root, &config);
    for t in &ticks {
        pipeline.log_tick(t);
    }
    let path = pipeline.stop().await;

    let expected: String = ticks.iter().map(|t| formatter.tick_line(t)).collect();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("{TICK_HEADER}\r\n{expected}"));
}

#[tokio::test]
async fn empty_run_leaves_header_only_provisional_file() {
    let root = TempDir::new().unwrap();
    let pipeline = start_tick_pipeline(&root, &config());
    let path = pipeline.stop().await;

    // No records: finalize is skipped, the provisional name survives.
    assert!(path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .contains("_to_RUNNING_"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{TICK_HEADER}\r\n")
    );
}

#[tokio::test]
async fn size_trigger_flushes_both_lines_as_one_chunk() {
    let root = TempDir::new().unwrap();
    let config = PipelineConfig {
        flush_buffer_size: 100,
        flush_interval_secs: 0,
        async_writes: false,
        ..PipelineConfig::default()
    };

    let mut pipeline = start_tick_pipeline(&root, &config);
    let path = pipeline.active_path().to_path_buf();

    // Each formatted line is 60 bytes: below the 100-byte threshold alone,
    // over it together.
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.10023)));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{TICK_HEADER}\r\n"),
        "nothing flushed after the first append"
    );
    assert_eq!(pipeline.buffered_bytes(), 60);

    pipeline.log_tick(&tick(1, dec!(1.1001), dec!(1.10033)));
    assert_eq!(pipeline.buffered_bytes(), 0, "second append tripped the flush");
    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.trim_end().split("\r\n").collect();
    assert_eq!(lines.len(), 3); // header + both lines in one chunk

    pipeline.stop().await;
}

#[tokio::test]
async fn bid_only_filter_suppresses_unchanged_bid() {
    let root = TempDir::new().unwrap();
    let config = PipelineConfig {
        tick_filter: TickFilterMode::BidOnly,
        flush_every_record: true,
        ..PipelineConfig::default()
    };

    let mut pipeline = start_tick_pipeline(&root, &config);
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.1002)));
    pipeline.log_tick(&tick(1, dec!(1.1000), dec!(1.1005)));
    pipeline.log_tick(&tick(2, dec!(1.1001), dec!(1.1005)));
    let path = pipeline.stop().await;

    let content = std::fs::read_to_string(&path).unwrap();
    let data_lines: Vec<&str> = content
        .trim_end()
        .split("\r\n")
        .skip(1) // header
        .collect();
    assert_eq!(data_lines.len(), 2);
    assert!(data_lines[0].contains("1.10000,1.10020"));
    assert!(data_lines[1].contains("1.10010,1.10050"));
}

#[tokio::test]
async fn finalize_renames_to_observed_time_range() {
    let root = TempDir::new().unwrap();
    let config = config();

    let mut pipeline = Pipeline::start(
        eurusd(),
        Granularity::M1,
        StreamKind::Ticks,
        root.path(),
        &config,
        session_start(),
    );
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.1002)));
    // Last record at 23:59:59.000Z.
    pipeline.log_tick(&tick(86_399_000, dec!(1.1001), dec!(1.1003)));
    let path = pipeline.stop().await;

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "EURUSD_M1_20250801_000000_to_20250801_235959_ticks.csv"
    );
    assert!(path.exists());
}

#[tokio::test]
async fn finalize_collision_takes_suffixed_name() {
    let root = TempDir::new().unwrap();
    let config = config();

    let mut pipeline = Pipeline::start(
        eurusd(),
        Granularity::M1,
        StreamKind::Ticks,
        root.path(),
        &config,
        session_start(),
    );
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.1002)));
    pipeline.log_tick(&tick(86_399_000, dec!(1.1001), dec!(1.1003)));

    // Occupy the first-choice final name before shutdown.
    let taken = root
        .path()
        .join("market_data")
        .join("EURUSD_M1_20250801_000000_to_20250801_235959_ticks.csv");
    std::fs::write(&taken, "occupied").unwrap();

    let path = pipeline.stop().await;
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "EURUSD_M1_20250801_000000_to_20250801_235959_ticks_1.csv"
    );
    assert_eq!(std::fs::read_to_string(&taken).unwrap(), "occupied");
}

#[tokio::test]
async fn gzip_output_decompresses_to_ordered_lines() {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let root = TempDir::new().unwrap();
    let config = PipelineConfig {
        compression: CompressionMode::Gzip,
        flush_every_record: true,
        ..PipelineConfig::default()
    };
    let formatter = LineFormatter::new(eurusd(), Granularity::Tick, 0);

    let ticks: Vec<TickRecord> = (0..10)
        .map(|i| {
            tick(
                i * 500,
                dec!(1.1000) + Decimal::new(i, 4),
                dec!(1.1002) + Decimal::new(i, 4),
            )
        })
        .collect();

    let mut pipeline = start_tick_pipeline(&root, &config);
    for t in &ticks {
        pipeline.log_tick(t);
    }
    let path = pipeline.stop().await;
    assert!(path.to_str().unwrap().ends_with(".csv.gz"));

    let mut decoder = GzDecoder::new(std::fs::File::open(&path).unwrap());
    let mut content = String::new();
    decoder.read_to_string(&mut content).unwrap();

    let expected: String = ticks.iter().map(|t| formatter.tick_line(t)).collect();
    assert_eq!(content, format!("{TICK_HEADER}\r\n{expected}"));
}

#[tokio::test]
async fn daily_rotation_splits_on_utc_date_boundary() {
    let root = TempDir::new().unwrap();
    let config = PipelineConfig {
        rotation: RotationMode::Daily,
        flush_every_record: true,
        ..PipelineConfig::default()
    };

    let mut pipeline = start_tick_pipeline(&root, &config);
    // Day one.
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.1002)));
    // First record of August 2nd triggers rotation.
    pipeline.log_tick(&tick(86_400_500, dec!(1.1005), dec!(1.1007)));
    pipeline.log_tick(&tick(86_401_000, dec!(1.1006), dec!(1.1008)));
    let path = pipeline.stop().await;

    let day1 = root
        .path()
        .join("market_data")
        .join("EURUSD_TICK_20250801_ticks.csv");
    let day2 = root
        .path()
        .join("market_data")
        .join("EURUSD_TICK_20250802_ticks.csv");
    assert_eq!(path, day2);

    let day1_content = std::fs::read_to_string(&day1).unwrap();
    let day1_lines: Vec<&str> = day1_content.trim_end().split("\r\n").collect();
    assert_eq!(day1_lines.len(), 2); // header + one record
    assert!(day1_lines[1].starts_with("2025-08-01"));

    let day2_content = std::fs::read_to_string(&day2).unwrap();
    let day2_lines: Vec<&str> = day2_content.trim_end().split("\r\n").collect();
    assert_eq!(day2_lines.len(), 3); // header + two records
    assert!(day2_lines[1].starts_with("2025-08-02"));
    assert!(day2_lines[2].starts_with("2025-08-02"));
}

#[tokio::test]
async fn session_rotation_keeps_stamped_name() {
    let root = TempDir::new().unwrap();
    let config = PipelineConfig {
        rotation: RotationMode::Session,
        flush_every_record: true,
        ..PipelineConfig::default()
    };

    let mut pipeline = start_tick_pipeline(&root, &config);
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.1002)));
    let path = pipeline.stop().await;

    // Session files are named at start and never renamed.
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "EURUSD_TICK_20250801_000000_ticks.csv"
    );
}

#[tokio::test]
async fn synchronous_mode_full_lifecycle() {
    let root = TempDir::new().unwrap();
    let config = PipelineConfig {
        async_writes: false,
        flush_every_record: true,
        ..PipelineConfig::default()
    };
    let formatter = LineFormatter::new(eurusd(), Granularity::Tick, 0);

    let ticks: Vec<TickRecord> = (0..5)
        .map(|i| {
            tick(
                i * 1000,
                dec!(1.1000) + Decimal::new(i, 4),
                dec!(1.1002) + Decimal::new(i, 4),
            )
        })
        .collect();

    let mut pipeline = start_tick_pipeline(&root, &config);
    for t in &ticks {
        pipeline.log_tick(t);
    }
    let path = pipeline.stop().await;

    let expected: String = ticks.iter().map(|t| formatter.tick_line(t)).collect();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{TICK_HEADER}\r\n{expected}")
    );
}

#[tokio::test]
async fn timer_flushes_pending_lines() {
    let root = TempDir::new().unwrap();
    // Large threshold, no per-record flushing: only the timer can flush.
    let config = PipelineConfig {
        flush_buffer_size: 1_000_000,
        flush_interval_secs: 1,
        async_writes: false,
        ..PipelineConfig::default()
    };

    let mut pipeline = start_tick_pipeline(&root, &config);
    let path = pipeline.active_path().to_path_buf();
    pipeline.log_tick(&tick(0, dec!(1.1000), dec!(1.1002)));
    assert_eq!(pipeline.buffered_bytes(), 60);

    // Wait out the interval, then deliver the host timer tick.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    pipeline.on_timer();
    assert_eq!(pipeline.buffered_bytes(), 0);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("1.10000,1.10020"));

    pipeline.stop().await;
}

#[tokio::test]
async fn bar_on_tick_pipeline_is_ignored() {
    use tickvault_core::BarRecord;

    let root = TempDir::new().unwrap();
    let mut pipeline = start_tick_pipeline(&root, &config());
    pipeline.log_bar(&BarRecord::new(
        session_start(),
        Price::new(dec!(1.1)),
        Price::new(dec!(1.2)),
        Price::new(dec!(1.0)),
        Price::new(dec!(1.1)),
        dec!(1.0),
        10,
    ));
    let path = pipeline.stop().await;

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{TICK_HEADER}\r\n")
    );
}
