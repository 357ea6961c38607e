use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PerfError, Result};

/// Rå GPS-punkt slik filparseren leverer det (UTC).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub lat: f64,
    pub lon: f64,
    pub time: DateTime<Utc>,
}

/// Ett segment fra sporfilen, i filrekkefølge.
pub type RawSegment = Vec<RawPoint>;

/// Punkt i et ekstrahert spor. Tidsstempelet bærer offset for mål-tidssonen,
/// så `time.time()` er lokal klokketid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub time: DateTime<FixedOffset>,
}

impl TrackPoint {
    /// Sekunder fra `self` til `other` (negativ hvis `other` er tidligere).
    #[inline]
    pub fn seconds_until(&self, other: &TrackPoint) -> f64 {
        (other.time - self.time).num_milliseconds() as f64 / 1000.0
    }

    #[inline]
    pub fn same_position(&self, other: &TrackPoint) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }

    #[inline]
    pub fn local_time(&self) -> NaiveTime {
        self.time.time()
    }
}

/// Tidsordnet spor med minst to punkter.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(points: Vec<TrackPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(PerfError::InsufficientData { found: points.len() });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<TrackPoint> {
        self.points
    }
}

/// Én vindobservasjon (klokkeslett, knop, grader "fra").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindObservation {
    pub time: NaiveTime,
    pub speed_kts: f64,
    pub direction_deg: f64,
    #[serde(default)]
    pub gust_kts: Option<f64>,
}

/// Interpolert vind på et vilkårlig tidspunkt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindEstimate {
    pub speed_kts: f64,
    pub direction_deg: f64,
}

/// Ferdig datapunkt – én per sporpunkt. Bygges én gang, muteres aldri.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedRecord {
    pub time: DateTime<FixedOffset>,
    pub lat: f64,
    pub lon: f64,
    pub boat_heading_deg: Option<f64>,
    pub boat_speed_kts: f64,
    pub wind_speed_kts: Option<f64>,
    pub wind_dir_deg: Option<f64>,
    /// 0–180
    pub wind_boat_angle_deg: Option<f64>,
    pub angle_bin: Option<String>,
    pub speed_ratio: Option<f64>,
}
