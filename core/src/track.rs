// core/src/track.rs
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, warn};

use crate::error::{PerfError, Result};
use crate::models::{RawPoint, RawSegment, Track, TrackPoint};
use crate::types::TimeWindow;

/// Leser alle spor-segmenter fra en GPX-strøm, i filrekkefølge.
/// Punkter uten tidsstempel hoppes over.
pub fn read_gpx_segments<R: Read>(reader: R) -> Result<Vec<RawSegment>> {
    let doc = gpx::read(reader).map_err(|e| PerfError::GpxParse(e.to_string()))?;

    let mut segments = Vec::new();
    let mut skipped = 0usize;

    for trk in doc.tracks {
        for seg in trk.segments {
            let mut out = Vec::with_capacity(seg.points.len());
            for wp in seg.points {
                let Some(time) = wp.time.as_ref() else {
                    skipped += 1;
                    continue;
                };
                let iso = time.format().map_err(|e| PerfError::GpxParse(e.to_string()))?;
                let utc = DateTime::parse_from_rfc3339(&iso)
                    .map_err(|e| PerfError::GpxParse(format!("bad timestamp `{iso}`: {e}")))?
                    .with_timezone(&Utc);
                let p = wp.point();
                out.push(RawPoint { lat: p.y(), lon: p.x(), time: utc });
            }
            segments.push(out);
        }
    }

    if skipped > 0 {
        debug!("gpx: skipped {skipped} point(s) without timestamp");
    }
    Ok(segments)
}

pub fn load_gpx<P: AsRef<Path>>(path: P) -> Result<Vec<RawSegment>> {
    let file = File::open(path.as_ref())?;
    read_gpx_segments(BufReader::new(file))
}

/// Flater ut segmentene, konverterer til `tz` og beholder punkter med lokal
/// klokketid innenfor `window` (inklusive). `None` = hele døgnet.
pub fn extract_track(segments: &[RawSegment], window: Option<&TimeWindow>, tz: Tz) -> Result<Track> {
    if let Some(w) = window {
        w.check()?;
    }

    let mut points: Vec<TrackPoint> = segments
        .iter()
        .flatten()
        .map(|p| TrackPoint {
            lat: p.lat,
            lon: p.lon,
            time: p.time.with_timezone(&tz).fixed_offset(),
        })
        .filter(|p| window.map_or(true, |w| w.contains(p.local_time())))
        .collect();

    // Segmenter kan overlappe i tid
    if points.windows(2).any(|w| w[1].time < w[0].time) {
        warn!("track: timestamps out of order, sorting {} points", points.len());
        points.sort_by_key(|p| p.time);
    }

    debug!(
        "track: {} of {} point(s) inside window",
        points.len(),
        segments.iter().map(Vec::len).sum::<usize>()
    );
    Track::new(points)
}

/// Grådig tidsfilter: første punkt beholdes alltid, deretter neste punkt
/// som ligger minst `interval_secs` etter forrige beholdte.
pub fn decimate(points: &[TrackPoint], interval_secs: f64) -> Vec<TrackPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    if interval_secs <= 0.0 {
        return points.to_vec();
    }

    let mut out = vec![*first];
    let mut last = *first;
    for p in &points[1..] {
        if last.seconds_until(p) >= interval_secs {
            out.push(*p);
            last = *p;
        }
    }
    out
}
