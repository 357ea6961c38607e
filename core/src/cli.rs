use std::fmt::Write as _;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::analyze_tour::TourOutputs;
use crate::error::{PerfError, Result};
use crate::summary::BinStat;
use crate::types::clock;

/// Én tur i et batch-manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourEntry {
    pub gpx_path: String,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    /// Overstyrer dato fra filnavnet
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<TourEntry>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    serde_path_to_error::deserialize(de).map_err(PerfError::from_path_error)
}

/// Tabell over vinkelbøtter, én linje per bøtte.
pub fn format_bin_table(summary: &[BinStat]) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "{:>9} {:>6} {:>10} {:>10} {:>10}", "angle", "n", "ratio", "max", "boat kts");
    for b in summary {
        let _ = writeln!(
            s,
            "{:>9} {:>6} {:>10.3} {:>10.3} {:>10.2}",
            b.bin, b.count, b.mean_ratio, b.max_ratio, b.mean_boat_speed_kts
        );
    }
    s
}

pub fn print_tour_report(out: &TourOutputs) {
    let a = &out.analysis;
    let headings = out.records.iter().filter(|r| r.boat_heading_deg.is_some()).count();

    println!("--- Tour {} ---", out.date);
    println!("Points: {} (outliers replaced: {})", a.points.len(), a.outliers_replaced.len());
    println!("With heading: {headings}");
    if out.wind_missing {
        println!("Wind: missing for this day/window");
    }
    print!("{}", format_bin_table(&out.summary));
}
