//! Great-circle formulas on a sphere
//!
//! Angles are in degrees at the API boundary and radians internally.
//! Bearings use the compass convention (0° = north, 90° = east) and are
//! reported in (-180°, 180°].

use nalgebra::Vector3;

/// Wrap any angle into (-180°, 180°].
///
/// Values already in range are returned unchanged, so the function is exactly
/// idempotent.
pub fn normalize_angle(deg: f64) -> f64 {
    if deg > -180.0 && deg <= 180.0 {
        return deg;
    }
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Haversine distance between two points in km
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_km: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius_km * c
}

/// Initial great-circle bearing from point 1 towards point 2
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let y = dlon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * dlon.cos();

    normalize_angle(y.atan2(x).to_degrees())
}

/// Planet-fixed Cartesian position of (lat, lon) on a sphere of the given radius
pub fn to_cartesian(lat: f64, lon: f64, radius_km: f64) -> Vector3<f64> {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    radius_km
        * Vector3::new(
            lat_rad.cos() * lon_rad.cos(),
            lat_rad.cos() * lon_rad.sin(),
            lat_rad.sin(),
        )
}

/// Radial projection of a Cartesian point back to (lat, lon) in degrees.
///
/// Works for points off the sphere surface (spline chords sit slightly
/// inside it). The origin maps to (0, 0).
pub fn from_cartesian(xyz: &Vector3<f64>) -> (f64, f64) {
    let horizontal = xyz.x.hypot(xyz.y);
    let lat = xyz.z.atan2(horizontal).to_degrees();
    let lon = xyz.y.atan2(xyz.x).to_degrees();
    (lat, normalize_angle(lon))
}

/// Local east/north/up unit vectors at (lat, lon), in planet-fixed axes
pub fn local_enu(lat: f64, lon: f64) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    let east = Vector3::new(-sin_lon, cos_lon, 0.0);
    let north = Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 2439.4;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_normalize_angle_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(190.0), -170.0);
        assert_eq!(normalize_angle(-190.0), 170.0);
        assert_eq!(normalize_angle(540.0), 180.0);
        assert_eq!(normalize_angle(-720.0), 0.0);
        assert!((normalize_angle(359.5) + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(haversine_km(-60.0, 45.0, -60.0, 45.0, R), 0.0);
    }

    #[test]
    fn test_haversine_quarter_circle() {
        // Equator to pole is a quarter of the circumference
        let dist = haversine_km(0.0, 0.0, 90.0, 0.0, R);
        assert!((dist - R * std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_antipodal() {
        let dist = haversine_km(0.0, 0.0, 0.0, 180.0, R);
        assert!((dist - R * std::f64::consts::PI).abs() < 1e-6);
        assert!(dist.is_finite());
    }

    #[test]
    fn test_haversine_small_separation() {
        // 1e-6 degrees of longitude on the equator
        let dist = haversine_km(0.0, 0.0, 0.0, 1e-6, R);
        let expected = R * 1e-6_f64.to_radians();
        assert!((dist - expected).abs() / expected < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        assert!(bearing_deg(0.0, 0.0, 1.0, 0.0).abs() < EPSILON);
        assert!((bearing_deg(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < EPSILON);
        assert!((bearing_deg(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < EPSILON);
        assert!((bearing_deg(0.0, 0.0, 0.0, -1.0) + 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_bearing_across_antimeridian() {
        // Heading east from 179.5° to -179.5° crosses the seam
        let b = bearing_deg(0.0, 179.5, 0.0, -179.5);
        assert!((b - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_cartesian_round_trip() {
        for &(lat, lon) in &[(-43.4, -78.0), (10.0, 170.0), (-89.0, 5.0), (0.0, -179.0)] {
            let xyz = to_cartesian(lat, lon, R);
            assert!((xyz.norm() - R).abs() < 1e-9);
            let (lat2, lon2) = from_cartesian(&xyz);
            assert!((lat2 - lat).abs() < 1e-9);
            assert!(normalize_angle(lon2 - lon).abs() < 1e-9);
        }
    }

    #[test]
    fn test_from_cartesian_inside_sphere() {
        // Scaling toward the origin must not change the projected position
        let xyz = to_cartesian(-50.0, 30.0, R) * 0.999;
        let (lat, lon) = from_cartesian(&xyz);
        assert!((lat + 50.0).abs() < 1e-9);
        assert!((lon - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_local_enu_orthonormal() {
        let (e, n, u) = local_enu(-35.0, 120.0);
        assert!((e.norm() - 1.0).abs() < EPSILON);
        assert!((n.norm() - 1.0).abs() < EPSILON);
        assert!((u.norm() - 1.0).abs() < EPSILON);
        assert!(e.dot(&n).abs() < EPSILON);
        assert!(e.dot(&u).abs() < EPSILON);
        assert!(n.dot(&u).abs() < EPSILON);
        // Right-handed: east x north = up
        assert!((e.cross(&n) - u).norm() < EPSILON);
    }
}
