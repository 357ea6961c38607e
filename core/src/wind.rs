// core/src/wind.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime, Timelike};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PerfError, Result};
use crate::geo::{interpolate_direction, normalize_deg};
use crate::models::{WindEstimate, WindObservation};
use crate::types::parse_clock;

#[inline]
fn secs_of_day(t: NaiveTime) -> f64 {
    t.num_seconds_from_midnight() as f64 + t.nanosecond() as f64 * 1e-9
}

/// Vindobservasjoner for én kalenderdag, sortert på klokkeslett.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSeries {
    date: NaiveDate,
    observations: Vec<WindObservation>,
}

impl WindSeries {
    pub fn new(date: NaiveDate, mut observations: Vec<WindObservation>) -> Self {
        observations.sort_by_key(|o| o.time);
        Self { date, observations }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn observations(&self) -> &[WindObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Utsnitt [start, end] inklusive, rekkefølgen beholdes.
    pub fn range(&self, start: NaiveTime, end: NaiveTime) -> WindSeries {
        let observations = self
            .observations
            .iter()
            .filter(|o| start <= o.time && o.time <= end)
            .copied()
            .collect();
        WindSeries { date: self.date, observations }
    }

    /// Eksakt oppslag på klokkeslett (f.eks. "18:00").
    pub fn observation_at(&self, time: NaiveTime) -> Option<&WindObservation> {
        self.observations.iter().find(|o| o.time == time)
    }

    /// Lineær interpolasjon av fart og sirkulær interpolasjon av retning.
    /// Utenfor serien holdes endeverdien (ingen ekstrapolasjon).
    /// `None` når serien er tom.
    pub fn interpolate(&self, t: NaiveTime) -> Option<WindEstimate> {
        let first = self.observations.first()?;
        let last = self.observations.last()?;
        let ts = secs_of_day(t);

        if ts <= secs_of_day(first.time) {
            return Some(estimate(first));
        }
        if ts >= secs_of_day(last.time) {
            return Some(estimate(last));
        }

        // første indeks med tid >= t; 1 <= i < len pga. sjekkene over
        let i = self.observations.partition_point(|o| secs_of_day(o.time) < ts);
        let a = &self.observations[i - 1];
        let b = &self.observations[i];

        let (ta, tb) = (secs_of_day(a.time), secs_of_day(b.time));
        let frac = if tb > ta { (ts - ta) / (tb - ta) } else { 0.0 };

        Some(WindEstimate {
            speed_kts: a.speed_kts + frac * (b.speed_kts - a.speed_kts),
            direction_deg: interpolate_direction(a.direction_deg, b.direction_deg, frac),
        })
    }
}

#[inline]
fn estimate(o: &WindObservation) -> WindEstimate {
    WindEstimate { speed_kts: o.speed_kts, direction_deg: o.direction_deg }
}

/// Kilde for vinddata per dag (prod: WindArchive, test: StaticWindProvider).
pub trait WindProvider {
    fn series_for_day(&self, date: NaiveDate) -> Option<WindSeries>;
}

/// Fast serie uavhengig av dato.
#[derive(Debug, Clone, Default)]
pub struct StaticWindProvider {
    pub series: Option<WindSeries>,
}

impl WindProvider for StaticWindProvider {
    fn series_for_day(&self, _date: NaiveDate) -> Option<WindSeries> {
        self.series.clone()
    }
}

/* -------------------------------------------------------------------------
   Arkiv-format (eksport fra vindstasjonen):
   { "2025-06-04": { "records": [ { "Time": "18:00",
                                    "Wind Speed (kts)": 9.1,
                                    "Wind Direction": "225° SW" }, ... ] } }
   ------------------------------------------------------------------------- */

#[derive(Debug, Deserialize, Default)]
struct DayDoc {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    records: RecordList,
}

// Poster kan komme som liste eller som objekt { "0": {...}, "1": {...} }
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordList {
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Default for RecordList {
    fn default() -> Self {
        RecordList::List(Vec::new())
    }
}

impl RecordList {
    fn into_values(self) -> Vec<Value> {
        match self {
            RecordList::List(v) => v,
            RecordList::Map(m) => m.into_values().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Num(f64),
    Text(String),
}

impl NumOrText {
    fn value(&self) -> Option<f64> {
        match self {
            NumOrText::Num(x) => Some(*x),
            NumOrText::Text(s) => leading_number(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawWindRecord {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Wind Speed (kts)")]
    speed: NumOrText,
    #[serde(rename = "Wind Direction")]
    direction: NumOrText,
    #[serde(rename = "Wind Gusts (kts)", default)]
    gusts: Option<NumOrText>,
}

/// Tallet foran evt. tekst: "225° SW" → 225, " 9.5 kts" → 9.5
pub(crate) fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

fn to_observation(raw: RawWindRecord) -> Option<WindObservation> {
    let time = parse_clock(&raw.time)?;
    let speed_kts = raw.speed.value().filter(|v| v.is_finite() && *v >= 0.0)?;
    let direction_deg = raw.direction.value().filter(|v| v.is_finite()).map(normalize_deg)?;
    let gust_kts = raw.gusts.as_ref().and_then(NumOrText::value);
    Some(WindObservation { time, speed_kts, direction_deg, gust_kts })
}

/// Alle vinddager, lest én gang og delt read-only mellom analyser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindArchive {
    days: BTreeMap<NaiveDate, WindSeries>,
}

impl WindArchive {
    pub fn from_series<I: IntoIterator<Item = WindSeries>>(series: I) -> Self {
        Self { days: series.into_iter().map(|s| (s.date(), s)).collect() }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let docs: BTreeMap<String, Value> =
            serde_path_to_error::deserialize(de).map_err(|e| {
                PerfError::WindParse(format!("at `{}`: {}", e.path(), e.inner()))
            })?;

        let mut days = BTreeMap::new();
        for (key, value) in docs {
            // Én ødelagt dag skal ikke velte hele arkivet
            let doc: DayDoc = match serde_json::from_value(value) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("wind: skipping malformed day `{key}`: {e}");
                    continue;
                }
            };
            let date = NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok().or_else(|| {
                doc.date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            });
            let Some(date) = date else {
                warn!("wind: skipping day with unparseable key `{key}`");
                continue;
            };

            let mut obs = Vec::new();
            let mut bad = 0usize;
            for value in doc.records.into_values() {
                match serde_json::from_value::<RawWindRecord>(value).ok().and_then(to_observation) {
                    Some(o) => obs.push(o),
                    None => bad += 1,
                }
            }
            if bad > 0 {
                warn!("wind: {date}: skipped {bad} malformed record(s)");
            }
            debug!("wind: {date}: {} record(s)", obs.len());
            days.insert(date, WindSeries::new(date, obs));
        }

        Ok(Self { days })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&WindSeries> {
        self.days.get(&date)
    }

    /// Dagens serie avgrenset til [start, end].
    pub fn day_range(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Option<WindSeries> {
        self.day(date).map(|s| s.range(start, end))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl WindProvider for WindArchive {
    fn series_for_day(&self, date: NaiveDate) -> Option<WindSeries> {
        self.day(date).cloned()
    }
}
