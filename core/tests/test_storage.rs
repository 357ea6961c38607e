// core/tests/test_storage.rs
use std::path::PathBuf;

use chrono::{Duration, FixedOffset, NaiveTime, TimeZone};

use sailperf_core::models::FusedRecord;
use sailperf_core::storage::{load_config, read_dataset_csv, save_config, write_dataset_csv, DatasetRow};
use sailperf_core::summary::summarize_bins;
use sailperf_core::types::{PerfConfig, TimeWindow};
use sailperf_core::PerfError;

fn tmp(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sailperf_{}_{name}", std::process::id()))
}

fn record(secs: i64, bin: Option<&str>, ratio: Option<f64>, boat_kts: f64) -> FusedRecord {
    let base = FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2025, 6, 4, 18, 0, 0)
        .unwrap();
    FusedRecord {
        time: base + Duration::seconds(secs),
        lat: 52.43,
        lon: 13.17,
        boat_heading_deg: bin.map(|_| 12.5),
        boat_speed_kts: boat_kts,
        wind_speed_kts: ratio.map(|r| boat_kts / r),
        wind_dir_deg: ratio.map(|_| 225.0),
        wind_boat_angle_deg: bin.map(|_| 47.25),
        angle_bin: bin.map(str::to_string),
        speed_ratio: ratio,
    }
}

#[test]
fn config_roundtrip_via_disk() {
    let path = tmp("cfg.json");
    let cfg = PerfConfig {
        window: Some(
            TimeWindow::new(NaiveTime::from_hms_opt(18, 1, 0).unwrap(), NaiveTime::from_hms_opt(18, 43, 0).unwrap())
                .unwrap(),
        ),
        timezone: "Europe/Oslo".into(),
        smooth_window: 5,
        angle_bin_deg: 15,
        ..Default::default()
    };

    save_config(&cfg, &path).unwrap();
    let loaded = load_config(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, cfg);
}

#[test]
fn missing_config_file_gives_defaults() {
    let cfg = load_config(tmp("does_not_exist.json")).unwrap();
    assert_eq!(cfg, PerfConfig::default());
}

#[test]
fn invalid_config_file_is_rejected() {
    let path = tmp("bad_cfg.json");
    std::fs::write(&path, r#"{ "timezone": "Mars/Olympus" }"#).unwrap();
    let res = load_config(&path);
    let _ = std::fs::remove_file(&path);
    assert!(matches!(res, Err(PerfError::InvalidConfig(_))), "fikk {res:?}");

    let path = tmp("typo_cfg.json");
    std::fs::write(&path, r#"{ "smooth_window": "seven" }"#).unwrap();
    let res = load_config(&path);
    let _ = std::fs::remove_file(&path);
    match res {
        Err(PerfError::Json { path, .. }) => assert_eq!(path, "smooth_window"),
        other => panic!("forventet Json-feil, fikk {other:?}"),
    }
}

#[test]
fn dataset_csv_roundtrip_keeps_empty_fields() {
    let rows = vec![
        DatasetRow::new("tour_a.gpx", &record(0, Some("40-50"), Some(0.61), 5.5)),
        DatasetRow::new("tour_a.gpx", &record(8, None, None, 4.0)),
    ];

    let mut buf: Vec<u8> = Vec::new();
    write_dataset_csv(&mut buf, &rows).unwrap();

    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.starts_with("tour,time,lat,lon,boat_heading_deg"), "header: {text}");

    let back = read_dataset_csv(buf.as_slice()).unwrap();
    assert_eq!(back, rows);
    assert_eq!(back[1].record().angle_bin, None);
}

#[test]
fn summary_groups_by_bin_in_numeric_order() {
    let recs = vec![
        record(0, Some("100-110"), Some(0.8), 6.0),
        record(8, Some("90-100"), Some(0.4), 4.0),
        record(16, Some("90-100"), Some(0.6), 6.0),
        record(24, None, Some(0.9), 7.0),
        record(32, Some("90-100"), None, 7.0),
    ];
    let s = summarize_bins(&recs);

    assert_eq!(s.len(), 2);
    assert_eq!(s[0].bin, "90-100", "numerisk rekkefølge, ikke leksikografisk");
    assert_eq!(s[0].count, 2);
    assert!((s[0].mean_ratio - 0.5).abs() < 1e-12);
    assert!((s[0].max_ratio - 0.6).abs() < 1e-12);
    assert!((s[0].mean_boat_speed_kts - 5.0).abs() < 1e-12);
    assert_eq!(s[1].bin, "100-110");
    assert_eq!(s[1].low_deg, 100);
}
