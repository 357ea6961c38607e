use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{PerfError, Result};
use crate::models::FusedRecord;
use crate::types::PerfConfig;

/// Leser inn konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PerfConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("config: {} not found, using defaults", path.display());
        return Ok(PerfConfig::default());
    }
    let contents = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    let cfg: PerfConfig = serde_path_to_error::deserialize(de).map_err(PerfError::from_path_error)?;
    cfg.validate()?;
    info!("config: loaded {} (tz={})", path.display(), cfg.timezone);
    Ok(cfg)
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config<P: AsRef<Path>>(cfg: &PerfConfig, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(cfg).map_err(|e| PerfError::Json {
        path: ".".into(),
        message: e.to_string(),
    })?;
    std::fs::write(path.as_ref(), json)?;
    info!("config: saved {}", path.as_ref().display());
    Ok(())
}

/// CSV-rad i det samlede datasettet: ett datapunkt + hvilken tur det kom fra.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub tour: String,
    pub time: DateTime<FixedOffset>,
    pub lat: f64,
    pub lon: f64,
    pub boat_heading_deg: Option<f64>,
    pub boat_speed_kts: f64,
    pub wind_speed_kts: Option<f64>,
    pub wind_dir_deg: Option<f64>,
    pub wind_boat_angle_deg: Option<f64>,
    pub angle_bin: Option<String>,
    pub speed_ratio: Option<f64>,
}

impl DatasetRow {
    pub fn new(tour: &str, r: &FusedRecord) -> Self {
        Self {
            tour: tour.to_string(),
            time: r.time,
            lat: r.lat,
            lon: r.lon,
            boat_heading_deg: r.boat_heading_deg,
            boat_speed_kts: r.boat_speed_kts,
            wind_speed_kts: r.wind_speed_kts,
            wind_dir_deg: r.wind_dir_deg,
            wind_boat_angle_deg: r.wind_boat_angle_deg,
            angle_bin: r.angle_bin.clone(),
            speed_ratio: r.speed_ratio,
        }
    }

    pub fn record(&self) -> FusedRecord {
        FusedRecord {
            time: self.time,
            lat: self.lat,
            lon: self.lon,
            boat_heading_deg: self.boat_heading_deg,
            boat_speed_kts: self.boat_speed_kts,
            wind_speed_kts: self.wind_speed_kts,
            wind_dir_deg: self.wind_dir_deg,
            wind_boat_angle_deg: self.wind_boat_angle_deg,
            angle_bin: self.angle_bin.clone(),
            speed_ratio: self.speed_ratio,
        }
    }
}

/// Skriver rader som CSV med header. `None` blir tomme felt.
pub fn write_dataset_csv<W: Write>(writer: W, rows: &[DatasetRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_dataset_csv<P: AsRef<Path>>(path: P, rows: &[DatasetRow]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_dataset_csv(file, rows)?;
    info!("dataset: wrote {} row(s) to {}", rows.len(), path.as_ref().display());
    Ok(())
}

pub fn read_dataset_csv<R: Read>(reader: R) -> Result<Vec<DatasetRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
