use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PerfError, Result};

/// Standardverdier fra regatta-kjøringene (8 s nedsampling, k=2, vindu 7).
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";
pub const DEFAULT_DECIMATE_SECS: f64 = 8.0;
pub const DEFAULT_OUTLIER_K: f64 = 2.0;
pub const DEFAULT_SMOOTH_WINDOW: usize = 7;
pub const DEFAULT_ANGLE_BIN_DEG: u32 = 10;

/// Parser "HH:MM" eller "HH:MM:SS" (med valgfri brøkdel).
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// serde-hjelper: klokkeslett som tekst.
pub(crate) mod clock {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_clock(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid clock time `{raw}`")))
    }
}

/// Lokalt tidsvindu [start, end], inklusive i begge ender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "clock")]
    pub start: NaiveTime,
    #[serde(with = "clock")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let w = Self { start, end };
        w.check()?;
        Ok(w)
    }

    pub fn check(&self) -> Result<()> {
        if self.start > self.end {
            return Err(PerfError::InvalidTimeWindow {
                start: self.start.to_string(),
                end: self.end.to_string(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Konfigurasjon for én analyse. Alle felt har defaults, så en tom
/// JSON-fil (`{}`) er gyldig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfConfig {
    /// Lokal klokketid som beholdes fra sporet. `None` = hele døgnet.
    pub window: Option<TimeWindow>,
    /// IANA-navn, f.eks. "Europe/Berlin"
    pub timezone: String,
    /// Minste tid mellom beholdte punkter (sek)
    pub decimate_secs: f64,
    /// Terskel = mean + k·std for akselerasjon
    pub outlier_k: f64,
    /// Bredde på glidende snitt (oddetall; < 2 slår av glatting)
    pub smooth_window: usize,
    /// Bredde på vinkelbøtter i grader
    pub angle_bin_deg: u32,
    /// Valgfritt utsnitt av vinddagen før interpolasjon
    pub wind_window: Option<TimeWindow>,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            window: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            decimate_secs: DEFAULT_DECIMATE_SECS,
            outlier_k: DEFAULT_OUTLIER_K,
            smooth_window: DEFAULT_SMOOTH_WINDOW,
            angle_bin_deg: DEFAULT_ANGLE_BIN_DEG,
            wind_window: None,
        }
    }
}

impl PerfConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| PerfError::InvalidConfig(format!("unknown timezone `{}`: {e}", self.timezone)))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(w) = &self.window {
            w.check()?;
        }
        if let Some(w) = &self.wind_window {
            w.check()?;
        }
        self.tz()?;
        if !self.decimate_secs.is_finite() || self.decimate_secs < 0.0 {
            return Err(PerfError::InvalidConfig(format!(
                "decimate_secs must be >= 0, got {}",
                self.decimate_secs
            )));
        }
        if !self.outlier_k.is_finite() || self.outlier_k < 0.0 {
            return Err(PerfError::InvalidConfig(format!(
                "outlier_k must be >= 0, got {}",
                self.outlier_k
            )));
        }
        if self.smooth_window >= 2 && self.smooth_window % 2 == 0 {
            return Err(PerfError::InvalidConfig(format!(
                "smooth_window must be odd, got {}",
                self.smooth_window
            )));
        }
        // Bøttene skal dekke [0, 180) uten en avkuttet siste bøtte
        if self.angle_bin_deg == 0 || 180 % self.angle_bin_deg != 0 {
            return Err(PerfError::InvalidConfig(format!(
                "angle_bin_deg must divide 180, got {}",
                self.angle_bin_deg
            )));
        }
        Ok(())
    }
}
