// core/tests/test_geo.rs
use sailperf_core::geo::{
    angular_difference, bearing, destination_point, distance_m, interpolate_direction, normalize_deg,
};

#[test]
fn angular_difference_is_symmetric_and_bounded() {
    let angles = [0.0, 10.0, 89.5, 179.9, 180.0, 181.0, 270.0, 350.0, 359.99, -30.0, 725.0];
    for a in angles {
        for b in angles {
            let ab = angular_difference(a, b);
            let ba = angular_difference(b, a);
            assert!((ab - ba).abs() < 1e-9, "asymmetri for a={a}, b={b}: {ab} vs {ba}");
            assert!((0.0..=180.0).contains(&ab), "utenfor [0,180]: a={a}, b={b} -> {ab}");
        }
    }
}

#[test]
fn angular_difference_wraps_around_north() {
    assert!((angular_difference(350.0, 10.0) - 20.0).abs() < 1e-12);
    assert!((angular_difference(0.0, 180.0) - 180.0).abs() < 1e-12);
    assert!((angular_difference(90.0, 90.0)).abs() < 1e-12);
}

#[test]
fn bearing_cardinal_directions() {
    let north = bearing(59.0, 10.0, 59.001, 10.0);
    let east = bearing(59.0, 10.0, 59.0, 10.001);
    let south = bearing(59.001, 10.0, 59.0, 10.0);
    let west = bearing(59.0, 10.001, 59.0, 10.0);

    assert!(north.abs() < 1e-9, "nord: {north}");
    assert!((east - 90.0).abs() < 0.01, "øst: {east}");
    assert!((south - 180.0).abs() < 1e-9, "sør: {south}");
    assert!((west - 270.0).abs() < 0.01, "vest: {west}");
}

#[test]
fn bearing_is_always_in_range() {
    for (lat2, lon2) in [(52.0, 13.0), (51.9, 12.9), (52.1, 12.9), (51.9, 13.1)] {
        let b = bearing(52.0, 13.0, lat2, lon2);
        assert!((0.0..360.0).contains(&b), "bearing {b} utenfor [0,360)");
    }
}

#[test]
fn destination_point_lands_at_requested_distance_and_bearing() {
    let (lat, lon) = (52.43, 13.17);
    let (lat2, lon2) = destination_point(lat, lon, 45.0, 1.0);

    // 1 nm = 1852 m; modellene bruker litt ulik radius, så romslig toleranse
    let d = distance_m(lat, lon, lat2, lon2);
    assert!((d - 1852.0).abs() < 5.0, "avstand {d} m");
    let b = bearing(lat, lon, lat2, lon2);
    assert!((b - 45.0).abs() < 0.01, "kurs {b}");
}

#[test]
fn circular_interpolation_crosses_zero() {
    let mid = interpolate_direction(350.0, 10.0, 0.5);
    assert!(angular_difference(mid, 0.0) < 1e-9, "forventet 0°, fikk {mid}");

    let quarter = interpolate_direction(350.0, 10.0, 0.25);
    assert!((quarter - 355.0).abs() < 1e-9, "forventet 355°, fikk {quarter}");

    // motsatt vei
    let back = interpolate_direction(10.0, 350.0, 0.5);
    assert!(angular_difference(back, 0.0) < 1e-9);
}

#[test]
fn normalize_keeps_range() {
    for d in [-720.0, -1.0, 0.0, 359.999, 360.0, 1000.0] {
        let n = normalize_deg(d);
        assert!((0.0..360.0).contains(&n), "{d} -> {n}");
    }
}
