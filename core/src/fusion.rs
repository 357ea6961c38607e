// core/src/fusion.rs
use log::debug;

use crate::error::{PerfError, Result};
use crate::geo::{angular_difference, bearing};
use crate::models::{FusedRecord, TrackPoint};
use crate::wind::WindSeries;

/// m/s → knop
pub const MS_TO_KNOTS: f64 = 1.943_844;

/// Bøtte-etikett for vind/båt-vinkel, f.eks. 47° → "40-50".
/// Vinkelen klemmes til [0, 180) slik at 180° havner i siste bøtte;
/// etiketten kuttes ved 180.
pub fn angle_bin(angle_deg: Option<f64>, width_deg: u32) -> Option<String> {
    let a = angle_deg.filter(|a| a.is_finite())?;
    if width_deg == 0 {
        return None;
    }
    let a = a.clamp(0.0, 180.0 - 1e-6);
    let w = width_deg as f64;
    let low = ((a / w).floor() * w) as u32;
    let high = (low + width_deg).min(180);
    Some(format!("{low}-{high}"))
}

/// Kurs i punkt `i` med sentrert differanse (i-1 → i+1); første punkt bruker
/// 0 → 1, siste bruker n-2 → n-1. `None` når endepunktene er like.
pub fn heading_at(points: &[TrackPoint], i: usize) -> Option<f64> {
    let n = points.len();
    if n < 2 || i >= n {
        return None;
    }
    let (a, b) = if i == 0 {
        (0, 1)
    } else if i == n - 1 {
        (n - 2, n - 1)
    } else {
        (i - 1, i + 1)
    };
    let (p, q) = (&points[a], &points[b]);
    if p.same_position(q) {
        return None;
    }
    Some(bearing(p.lat, p.lon, q.lat, q.lon))
}

/// Båtfart / vindfart (begge i knop). Uklemt; `None` ved vindstille.
#[inline]
pub fn speed_ratio(boat_kts: f64, wind_kts: f64) -> Option<f64> {
    if wind_kts > 0.0 {
        Some(boat_kts / wind_kts)
    } else {
        None
    }
}

/// Slår sammen spor og vind til ett datapunkt per sporpunkt.
///
/// `boat_speeds_ms` må ha én verdi per punkt (se `analyze_tour::point_speeds`).
/// Mangler vind (ingen serie eller tom serie) blir alle vindavhengige felt `None`.
pub fn fuse(
    points: &[TrackPoint],
    boat_speeds_ms: &[f64],
    wind: Option<&WindSeries>,
    angle_bin_deg: u32,
) -> Result<Vec<FusedRecord>> {
    if boat_speeds_ms.len() != points.len() {
        return Err(PerfError::LengthMismatch {
            what: "boat_speeds_ms",
            got: boat_speeds_ms.len(),
            expected: points.len(),
        });
    }

    let mut out = Vec::with_capacity(points.len());
    for (i, (p, &v_ms)) in points.iter().zip(boat_speeds_ms).enumerate() {
        let est = wind.and_then(|w| w.interpolate(p.local_time()));
        let heading = heading_at(points, i);

        let wind_boat_angle = match (heading, est) {
            (Some(h), Some(e)) => Some(angular_difference(h, e.direction_deg)),
            _ => None,
        };

        let boat_kts = v_ms * MS_TO_KNOTS;
        out.push(FusedRecord {
            time: p.time,
            lat: p.lat,
            lon: p.lon,
            boat_heading_deg: heading,
            boat_speed_kts: boat_kts,
            wind_speed_kts: est.map(|e| e.speed_kts),
            wind_dir_deg: est.map(|e| e.direction_deg),
            wind_boat_angle_deg: wind_boat_angle,
            angle_bin: angle_bin(wind_boat_angle, angle_bin_deg),
            speed_ratio: est.and_then(|e| speed_ratio(boat_kts, e.speed_kts)),
        });
    }

    debug!(
        "fusion: {} record(s), {} without heading",
        out.len(),
        out.iter().filter(|r| r.boat_heading_deg.is_none()).count()
    );
    Ok(out)
}
