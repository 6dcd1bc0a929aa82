//! Domain generators for property-based testing
//!
//! All angles are degrees, distances km, temperatures °C.

use proptest::prelude::*;

// ============================================================================
// Coordinate Generators
// ============================================================================

/// Latitude (-90 to 90 deg)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Longitude (-180 to 180 deg)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Southern mid-latitudes where the polar traverse runs
pub fn south_latitude_deg() -> impl Strategy<Value = f64> {
    -70.0f64..=-20.0
}

/// (lat, lon) anywhere on the sphere
pub fn coordinate() -> impl Strategy<Value = (f64, f64)> {
    (latitude_deg(), longitude_deg())
}

// ============================================================================
// Angle Generators
// ============================================================================

/// Arbitrary angle, several turns either side of zero
pub fn any_angle_deg() -> impl Strategy<Value = f64> {
    -3600.0f64..=3600.0
}

/// Whole number of turns, for periodicity checks
pub fn turns() -> impl Strategy<Value = i32> {
    -10i32..=10
}

/// Subsolar angle (-180 to 180 deg)
pub fn subsolar_angle_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Compass bearing (-180 to 180 deg)
pub fn bearing_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

// ============================================================================
// Thermal Generators
// ============================================================================

/// Planet-sun distance inside the Mercury orbit envelope (AU)
pub fn sun_distance_au() -> impl Strategy<Value = f64> {
    0.3075f64..=0.4667
}

/// Surface temperature from night side to subsolar (°C)
pub fn surface_temp_c() -> impl Strategy<Value = f64> {
    -180.0f64..=450.0
}

// ============================================================================
// Track Generators
// ============================================================================

/// One leg of a track: (dlat, dlon), each 0.05-0.5 deg with random sign
fn track_step() -> impl Strategy<Value = (f64, f64)> {
    (0.05f64..0.5, 0.05f64..0.5, any::<bool>(), any::<bool>()).prop_map(
        |(dlat, dlon, north, east)| {
            (
                if north { dlat } else { -dlat },
                if east { dlon } else { -dlon },
            )
        },
    )
}

/// Cleaned waypoint track with no repeated points, 2 to `max_points` long
pub fn waypoint_track(max_points: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    let max_steps = max_points.max(2) - 1;
    (
        south_latitude_deg(),
        -170.0f64..=170.0,
        prop::collection::vec(track_step(), 1..=max_steps),
    )
        .prop_map(|(lat0, lon0, steps)| {
            let mut track = vec![(lat0, lon0)];
            let (mut lat, mut lon) = (lat0, lon0);
            for (dlat, dlon) in steps {
                lat += dlat;
                lon += dlon;
                track.push((lat, lon));
            }
            track
        })
}
