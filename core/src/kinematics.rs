use crate::geo::distance_m;
use crate::models::TrackPoint;

/// Fart (m/s) for én strekning. 0 ved dt <= 0 (dupliserte tidsstempler).
#[inline]
pub fn segment_speed(distance_m: f64, elapsed_s: f64) -> f64 {
    if elapsed_s > 0.0 {
        distance_m / elapsed_s
    } else {
        0.0
    }
}

/// Fart per påfølgende punktpar, lengde `n-1`, indeksert som `points[1..]`.
pub fn speeds(points: &[TrackPoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| {
            let d = distance_m(w[0].lat, w[0].lon, w[1].lat, w[1].lon);
            segment_speed(d, w[0].seconds_until(&w[1]))
        })
        .collect()
}

/// Akselerasjon (m/s²) mellom påfølgende farter, lengde `len(speeds)-1`.
///
/// `speeds[i]` hører til `points[i+1]`, så tidssteget mellom `speeds[i-1]`
/// og `speeds[i]` er tiden fra `points[i]` til `points[i+1]`.
pub fn accelerations(points: &[TrackPoint], speeds: &[f64]) -> Vec<f64> {
    (1..speeds.len())
        .map(|i| speed_delta_rate(points, speeds, i))
        .collect()
}

/// Lokal akselerasjon for `speeds[i]` mot `speeds[i-1]`. 0 hvis dt <= 0
/// eller hvis punktene mangler.
pub(crate) fn speed_delta_rate(points: &[TrackPoint], speeds: &[f64], i: usize) -> f64 {
    let (Some(a), Some(b)) = (points.get(i), points.get(i + 1)) else {
        return 0.0;
    };
    let dt = a.seconds_until(b);
    if dt > 0.0 {
        (speeds[i] - speeds[i - 1]) / dt
    } else {
        0.0
    }
}
