// core/src/geo.rs
//! Sfærisk geodesi: kurs, vinkelforskjell, endepunkt og avstand.
//! NaN propageres; ingen av funksjonene feiler.

/// Jordradius i nautiske mil (middelradius).
pub const EARTH_RADIUS_NM: f64 = 3440.065;
/// Jordradius i meter (IUGG middelradius).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Normaliser vinkel til [0, 360)
#[inline]
pub fn normalize_deg(d: f64) -> f64 {
    let x = d.rem_euclid(360.0);
    // rem_euclid kan runde opp til nøyaktig 360.0 for små negative tall
    if x >= 360.0 { 0.0 } else { x }
}

/// Initiell storsirkelkurs fra punkt 1 til punkt 2.
/// 0° = nord, med klokka.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let x = dlon.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlon.cos();

    normalize_deg(x.atan2(y).to_degrees())
}

/// Minste absolutte forskjell mellom to kurser, [0, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

/// Signert korteste vinkel fra `from` til `to`, [-180, 180).
#[inline]
pub fn signed_difference(from: f64, to: f64) -> f64 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Sirkulær interpolasjon: 350° → 10° med frac=0.5 gir 0°, ikke 180°.
pub fn interpolate_direction(d1: f64, d2: f64, frac: f64) -> f64 {
    normalize_deg(d1 + frac * signed_difference(d1, d2))
}

/// Endepunkt for en storsirkel-strekning med gitt kurs og lengde (nm).
/// Brukes av visualisering (vindpiler).
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_nm: f64) -> (f64, f64) {
    let d = distance_nm / EARTH_RADIUS_NM;
    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let brng = bearing_deg.to_radians();

    let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * brng.cos()).asin();
    let lon2 = lon1
        + (brng.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Haversine-avstand i meter.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}
