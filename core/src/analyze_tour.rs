use chrono::NaiveDate;
use log::{info, warn};

use crate::error::{PerfError, Result};
use crate::fusion::fuse;
use crate::kinematics::{accelerations, speeds};
use crate::metrics::metrics;
use crate::models::{FusedRecord, RawSegment, Track, TrackPoint};
use crate::smoothing::{clean_speed_outliers, moving_average, normalize};
use crate::summary::{summarize_bins, BinStat};
use crate::track::{decimate, extract_track};
use crate::types::PerfConfig;
use crate::wind::WindProvider;

/// Alle mellomsteg fra spor-pipelinen (for plotting/feilsøking).
#[derive(Debug, Clone)]
pub struct TrackAnalysis {
    /// Nedsamplede punkter
    pub points: Vec<TrackPoint>,
    /// Rå fart (m/s), én per strekning → `points[1..]`
    pub speeds_raw: Vec<f64>,
    /// → `points[2..]`
    pub accelerations: Vec<f64>,
    pub speeds_clean: Vec<f64>,
    pub speeds_smooth: Vec<f64>,
    /// [0, 1]
    pub speeds_norm: Vec<f64>,
    pub outliers_replaced: Vec<usize>,
}

/// Flytter strekningsfarter over på punkter: punkt 0 får første strekning,
/// punkt i får strekningen som ender i i.
pub fn point_speeds(segment_speeds: &[f64]) -> Vec<f64> {
    let Some(&first) = segment_speeds.first() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(segment_speeds.len() + 1);
    out.push(first);
    out.extend_from_slice(segment_speeds);
    out
}

/// extract → decimate → fart → akselerasjon → outlier-vask → glatting → normalisering
pub fn analyze_track(segments: &[RawSegment], cfg: &PerfConfig) -> Result<TrackAnalysis> {
    cfg.validate()?;
    let res = run_track(segments, cfg);
    match &res {
        Ok(a) => {
            metrics().tracks_processed.inc();
            metrics().outliers_replaced.inc_by(a.outliers_replaced.len() as u64);
        }
        Err(PerfError::InsufficientData { .. }) => metrics().tracks_insufficient.inc(),
        Err(_) => {}
    }
    res
}

fn run_track(segments: &[RawSegment], cfg: &PerfConfig) -> Result<TrackAnalysis> {
    let tz = cfg.tz()?;
    let track = extract_track(segments, cfg.window.as_ref(), tz)?;
    let extracted = track.len();

    // Nedsampling kan i seg selv etterlate < 2 punkter
    let track = Track::new(decimate(track.points(), cfg.decimate_secs))?;
    let points = track.into_points();

    let speeds_raw = speeds(&points);
    let accelerations = accelerations(&points, &speeds_raw);
    let cleaned = clean_speed_outliers(&points, &speeds_raw, cfg.outlier_k);
    let speeds_smooth = moving_average(&cleaned.speeds, cfg.smooth_window);
    let speeds_norm = normalize(&speeds_smooth);

    info!(
        "track: {extracted} point(s) in window, {} after decimation ({}s), {} outlier(s) replaced (threshold {:.3} m/s²)",
        points.len(),
        cfg.decimate_secs,
        cleaned.replaced.len(),
        cleaned.threshold
    );

    Ok(TrackAnalysis {
        points,
        speeds_raw,
        accelerations,
        speeds_clean: cleaned.speeds,
        speeds_smooth,
        speeds_norm,
        outliers_replaced: cleaned.replaced,
    })
}

#[derive(Clone)]
pub struct TourInputs<'a> {
    pub segments: &'a [RawSegment],
    /// Vinddag. `None` → lokal dato for første beholdte punkt.
    pub date: Option<NaiveDate>,
    /// Vindtilbyder (prod: WindArchive, test: StaticWindProvider)
    pub wind: Option<&'a dyn WindProvider>,
    pub cfg: &'a PerfConfig,
}

#[derive(Debug, Clone)]
pub struct TourOutputs {
    pub date: NaiveDate,
    pub analysis: TrackAnalysis,
    pub records: Vec<FusedRecord>,
    pub summary: Vec<BinStat>,
    /// Ingen vinddata for dagen/vinduet → alle vindfelt er `None`
    pub wind_missing: bool,
}

/// Hele turen: spor-pipeline + dagens vind → datasett.
pub fn analyze_tour(inputs: TourInputs) -> Result<TourOutputs> {
    let cfg = inputs.cfg;
    let analysis = analyze_track(inputs.segments, cfg)?;

    let date = match inputs.date {
        Some(d) => d,
        None => analysis.points[0].time.date_naive(),
    };

    let series = inputs
        .wind
        .and_then(|w| w.series_for_day(date))
        .map(|s| match &cfg.wind_window {
            Some(w) => s.range(w.start, w.end),
            None => s,
        });
    let wind_missing = series.as_ref().map_or(true, |s| s.is_empty());
    if wind_missing {
        warn!("wind: no observations for {date}, wind fields will be empty");
    }

    let boat_speeds = point_speeds(&analysis.speeds_smooth);
    let records = fuse(&analysis.points, &boat_speeds, series.as_ref(), cfg.angle_bin_deg)?;

    metrics().points_fused.inc_by(records.len() as u64);
    metrics()
        .wind_missing_points
        .inc_by(records.iter().filter(|r| r.wind_speed_kts.is_none()).count() as u64);

    let summary = summarize_bins(&records);
    info!("tour {date}: {} record(s), {} angle bin(s)", records.len(), summary.len());

    Ok(TourOutputs { date, analysis, records, summary, wind_missing })
}

/// Første `YYYY-MM-DD` i et filnavn, f.eks.
/// "2025-05-14T14-38-24.075Z_Watersports_sailing.gpx" → 2025-05-14.
pub fn date_from_path(path: &str) -> Option<NaiveDate> {
    let b = path.as_bytes();
    (0..b.len().saturating_sub(9)).find_map(|i| {
        let w = &b[i..i + 10];
        let shape = w.iter().enumerate().all(|(j, c)| match j {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        });
        if !shape {
            return None;
        }
        // w er ren ASCII her
        std::str::from_utf8(w)
            .ok()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    })
}
