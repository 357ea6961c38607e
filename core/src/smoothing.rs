use ordered_float::OrderedFloat;

use crate::kinematics::{accelerations, speed_delta_rate};
use crate::models::TrackPoint;

/// Resultat av outlier-vask.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSpeeds {
    pub speeds: Vec<f64>,
    /// Indekser (i fartsserien) som ble erstattet
    pub replaced: Vec<usize>,
    pub threshold: f64,
}

fn mean_std(xs: &[f64]) -> (f64, f64) {
    if xs.is_empty() {
        return (0.0, 0.0);
    }
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Fjerner fartsspikes: terskel = mean + k·std over hele akselerasjonsserien
/// (populasjons-std). Indre sampler med |a| over terskelen erstattes av snittet
/// av naboene i INPUT-serien. Ett pass – erstatninger sjekkes ikke på nytt.
///
/// Lite k (2) vasker hardt og kan glatte ut skarpe vendinger; stort k (5)
/// tar bare ekstreme spikes.
pub fn clean_speed_outliers(points: &[TrackPoint], speeds: &[f64], k: f64) -> CleanedSpeeds {
    let acc = accelerations(points, speeds);
    if acc.is_empty() {
        return CleanedSpeeds { speeds: speeds.to_vec(), replaced: Vec::new(), threshold: 0.0 };
    }

    let (mean, std) = mean_std(&acc);
    let threshold = mean + k * std;

    let mut out = speeds.to_vec();
    let mut replaced = Vec::new();
    for i in 1..speeds.len() - 1 {
        let a = speed_delta_rate(points, speeds, i);
        if a.abs() > threshold {
            out[i] = (speeds[i - 1] + speeds[i + 1]) / 2.0;
            replaced.push(i);
        }
    }

    CleanedSpeeds { speeds: out, replaced, threshold }
}

/// Glidende snitt (boks-kjerne) med samme lengde ut som inn.
/// Kantene oppfører seg som sentrert konvolusjon med nullutfylling:
/// summen av samplene innenfor vinduet deles alltid på full vindusbredde.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || values.is_empty() {
        return values.to_vec();
    }
    let n = values.len() as isize;
    let w = window as isize;
    let offset = (w - 1) / 2;

    (0..n)
        .map(|i| {
            let hi = (i + offset).min(n - 1);
            let lo = (i + offset + 1 - w).max(0);
            let s: f64 = if lo <= hi {
                values[lo as usize..=hi as usize].iter().sum()
            } else {
                0.0
            };
            s / window as f64
        })
        .collect()
}

/// Min-max skalering til [0, 1]. Konstant serie gir bare nuller.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().map(OrderedFloat).min();
    let max = values.iter().copied().map(OrderedFloat).max();
    let (Some(OrderedFloat(vmin)), Some(OrderedFloat(vmax))) = (min, max) else {
        return Vec::new();
    };
    if vmax == vmin {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - vmin) / (vmax - vmin)).collect()
}
