use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::models::FusedRecord;

/// Aggregat per vinkelbøtte – tallene bak "speed ratio vs vinkel"-plottene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinStat {
    pub bin: String,
    pub low_deg: u32,
    pub high_deg: u32,
    pub count: usize,
    pub mean_ratio: f64,
    pub max_ratio: f64,
    pub mean_boat_speed_kts: f64,
}

fn parse_bin(label: &str) -> Option<(u32, u32)> {
    let (lo, hi) = label.split_once('-')?;
    Some((lo.parse().ok()?, hi.parse().ok()?))
}

/// Teller bare punkter som har både bøtte og fartsforhold.
pub fn summarize_bins(records: &[FusedRecord]) -> Vec<BinStat> {
    // (low, high) -> (ratioer, båtfart-sum)
    let mut acc: BTreeMap<(u32, u32), (Vec<f64>, f64)> = BTreeMap::new();

    for r in records {
        let (Some(bin), Some(ratio)) = (r.angle_bin.as_deref(), r.speed_ratio) else {
            continue;
        };
        let Some(key) = parse_bin(bin) else { continue };
        let e = acc.entry(key).or_default();
        e.0.push(ratio);
        e.1 += r.boat_speed_kts;
    }

    acc.into_iter()
        .map(|((low, high), (ratios, speed_sum))| {
            let n = ratios.len() as f64;
            BinStat {
                bin: format!("{low}-{high}"),
                low_deg: low,
                high_deg: high,
                count: ratios.len(),
                mean_ratio: ratios.iter().sum::<f64>() / n,
                max_ratio: ratios.iter().copied().map(OrderedFloat).max().map_or(0.0, |m| m.0),
                mean_boat_speed_kts: speed_sum / n,
            }
        })
        .collect()
}
