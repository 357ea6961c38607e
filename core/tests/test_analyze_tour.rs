// core/tests/test_analyze_tour.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use sailperf_core::analyze_tour::{analyze_tour, analyze_track, date_from_path, point_speeds, TourInputs};
use sailperf_core::geo::EARTH_RADIUS_M;
use sailperf_core::metrics::metrics;
use sailperf_core::models::{RawPoint, RawSegment, WindObservation};
use sailperf_core::types::{PerfConfig, TimeWindow};
use sailperf_core::wind::{StaticWindProvider, WindArchive, WindSeries};
use sailperf_core::{gather_text, PerfError};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
}

fn clock(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Ett punkt i sekundet rett nordover i 3 m/s, start 16:00Z (18:00 i Berlin).
fn northward_segments(secs: i64) -> Vec<RawSegment> {
    let start: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 6, 4, 16, 0, 0).unwrap();
    let step = (3.0 / EARTH_RADIUS_M).to_degrees();
    vec![(0..=secs)
        .map(|s| RawPoint { lat: 52.43 + s as f64 * step, lon: 13.17, time: start + Duration::seconds(s) })
        .collect()]
}

fn beam_wind() -> StaticWindProvider {
    let obs = |h, m| WindObservation { time: clock(h, m), speed_kts: 10.0, direction_deg: 90.0, gust_kts: None };
    StaticWindProvider { series: Some(WindSeries::new(day(), vec![obs(18, 0), obs(18, 10)])) }
}

#[test]
fn point_speeds_align_segments_to_points() {
    assert_eq!(point_speeds(&[1.0, 2.0, 3.0]), vec![1.0, 1.0, 2.0, 3.0]);
    assert!(point_speeds(&[]).is_empty());
}

#[test]
fn track_pipeline_decimates_and_keeps_lengths() {
    let cfg = PerfConfig::default();
    let a = analyze_track(&northward_segments(60), &cfg).unwrap();

    // 0, 8, ..., 56
    assert_eq!(a.points.len(), 8);
    assert_eq!(a.speeds_raw.len(), 7);
    assert_eq!(a.accelerations.len(), 6);
    assert_eq!(a.speeds_clean.len(), 7);
    assert_eq!(a.speeds_smooth.len(), 7);
    assert_eq!(a.speeds_norm.len(), 7);

    for v in &a.speeds_raw {
        assert!((v - 3.0).abs() < 1e-6, "fart {v}");
    }
    assert!(a.speeds_norm.iter().all(|x| (0.0..=1.0).contains(x)));
}

#[test]
fn tour_with_beam_wind_lands_in_ninety_bin() {
    let cfg = PerfConfig::default();
    let segs = northward_segments(60);
    let wind = beam_wind();

    let out = analyze_tour(TourInputs { segments: &segs, date: None, wind: Some(&wind), cfg: &cfg }).unwrap();

    assert_eq!(out.date, day(), "dato fra første punkt i lokal tid");
    assert!(!out.wind_missing);
    assert_eq!(out.records.len(), out.analysis.points.len());

    for r in &out.records {
        assert_eq!(r.angle_bin.as_deref(), Some("90-100"));
        assert!(r.speed_ratio.unwrap() > 0.0);
    }
    assert_eq!(out.summary.len(), 1);
    assert_eq!(out.summary[0].bin, "90-100");
    assert_eq!(out.summary[0].count, out.records.len());
}

#[test]
fn tour_without_wind_still_produces_records() {
    let cfg = PerfConfig::default();
    let segs = northward_segments(40);

    let out = analyze_tour(TourInputs { segments: &segs, date: Some(day()), wind: None, cfg: &cfg }).unwrap();
    assert!(out.wind_missing);
    assert!(!out.records.is_empty());
    assert!(out.records.iter().all(|r| r.wind_speed_kts.is_none() && r.angle_bin.is_none()));
    assert!(out.summary.is_empty());
}

#[test]
fn wind_window_outside_observations_counts_as_missing() {
    let cfg = PerfConfig { wind_window: Some(TimeWindow::new(clock(12, 0), clock(13, 0)).unwrap()), ..Default::default() };
    let segs = northward_segments(40);
    let wind = beam_wind();

    let out = analyze_tour(TourInputs { segments: &segs, date: None, wind: Some(&wind), cfg: &cfg }).unwrap();
    assert!(out.wind_missing);
}

#[test]
fn empty_window_is_insufficient_data() {
    let cfg = PerfConfig { window: Some(TimeWindow::new(clock(9, 0), clock(10, 0)).unwrap()), ..Default::default() };
    let segs = northward_segments(60);
    let res = analyze_tour(TourInputs { segments: &segs, date: None, wind: None, cfg: &cfg });
    assert!(matches!(res, Err(PerfError::InsufficientData { found: 0 })), "fikk {res:?}");
}

#[test]
fn decimation_below_two_points_is_insufficient_data() {
    // 5 s spor, 8 s intervall → bare første punkt igjen
    let res = analyze_track(&northward_segments(5), &PerfConfig::default());
    assert!(matches!(res, Err(PerfError::InsufficientData { found: 1 })), "fikk {res:?}");
}

#[test]
fn invalid_config_is_rejected_before_work() {
    let cfg = PerfConfig { smooth_window: 4, ..Default::default() };
    let res = analyze_track(&northward_segments(60), &cfg);
    assert!(matches!(res, Err(PerfError::InvalidConfig(_))));
}

#[test]
fn archive_day_is_picked_from_date() {
    let json = r#"{ "2025-06-04": { "records": [
        { "Time": "18:00", "Wind Speed (kts)": 12, "Wind Direction": "180° S" }
    ] } }"#;
    let archive = WindArchive::from_json_str(json).unwrap();
    let cfg = PerfConfig::default();
    let segs = northward_segments(40);

    let out = analyze_tour(TourInputs { segments: &segs, date: Some(day()), wind: Some(&archive), cfg: &cfg }).unwrap();
    assert!(out.records.iter().all(|r| r.wind_dir_deg == Some(180.0)));
    // nordover med vind fra sør
    assert_eq!(out.records[1].angle_bin.as_deref(), Some("170-180"));

    let other = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
    let out = analyze_tour(TourInputs { segments: &segs, date: Some(other), wind: Some(&archive), cfg: &cfg }).unwrap();
    assert!(out.wind_missing);
}

#[test]
fn date_is_found_in_file_names() {
    assert_eq!(
        date_from_path("tracks/2025-05-14T14-38-24.075Z_Watersports_sailing.gpx"),
        NaiveDate::from_ymd_opt(2025, 5, 14)
    );
    assert_eq!(date_from_path("2025-06-04"), Some(day()));
    assert_eq!(date_from_path("sailing.gpx"), None);
    assert_eq!(date_from_path("2025-13-40.gpx"), None);
}

#[test]
fn metrics_are_exported() {
    let _ = analyze_track(&northward_segments(60), &PerfConfig::default()).unwrap();
    assert!(metrics().tracks_processed.get() >= 1);

    let text = gather_text();
    for name in [
        "sailperf_tracks_processed_total",
        "sailperf_tracks_insufficient_data_total",
        "sailperf_speed_outliers_replaced_total",
        "sailperf_points_fused_total",
        "sailperf_wind_missing_points_total",
    ] {
        assert!(text.contains(name), "mangler {name} i:\n{text}");
    }
}
