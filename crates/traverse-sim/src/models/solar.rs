//! Local sun position seen from the rover
//!
//! The sun is treated as infinitely far away along the planet-centred unit
//! vector `ŝ` of the subsolar point, which sits 90° east of the terminator.
//! With `(ê, n̂, û)` the local east/north/up axes at the rover:
//!
//! ```text
//! elevation        = asin(ŝ · û)
//! compass azimuth  = atan2(ŝ · ê, ŝ · n̂)        (0 = north, 90 = east)
//! relative azimuth = compass azimuth - bearing  (0 = dead ahead, + = right)
//! ```
//!
//! The body-frame sun vector uses x forward, y left, z up.

use crate::config::PlanetConfig;
use nalgebra::Vector3;
use planet_geometry::spherical::{local_enu, to_cartesian};
use planet_geometry::{normalize_angle, Location};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarInput {
    pub position: Location,
    pub bearing_deg: f64,
    pub terminator_longitude_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunOutput {
    /// Elevation above the horizon, floored at zero
    pub elevation_deg: f64,
    /// Signed elevation; negative below the horizon
    pub true_elevation_deg: f64,
    /// Sun bearing relative to the rover heading
    pub azimuth_deg: f64,
    pub compass_azimuth_deg: f64,
    /// Unit vector towards the sun in body axes; `None` below the horizon
    pub vector: Option<Vector3<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarGeometryModel {
    subsolar_latitude_deg: f64,
}

impl SolarGeometryModel {
    pub fn new(planet: &PlanetConfig) -> Self {
        Self {
            subsolar_latitude_deg: planet.subsolar_latitude_deg,
        }
    }

    pub fn subsolar_longitude_deg(terminator_longitude_deg: f64) -> f64 {
        normalize_angle(terminator_longitude_deg + 90.0)
    }

    /// Planet-fixed unit vector towards the sun
    pub fn sun_direction(&self, terminator_longitude_deg: f64) -> Vector3<f64> {
        to_cartesian(
            self.subsolar_latitude_deg,
            Self::subsolar_longitude_deg(terminator_longitude_deg),
            1.0,
        )
    }

    pub fn compute(&self, input: &SolarInput) -> SunOutput {
        let sun = self.sun_direction(input.terminator_longitude_deg);
        let (east, north, up) = local_enu(input.position.lat, input.position.lon);

        let true_elevation = sun.dot(&up).clamp(-1.0, 1.0).asin().to_degrees();
        let compass = normalize_angle(sun.dot(&east).atan2(sun.dot(&north)).to_degrees());
        let azimuth = normalize_angle(compass - input.bearing_deg);

        let vector = (true_elevation >= 0.0).then(|| body_frame_vector(true_elevation, azimuth));

        SunOutput {
            elevation_deg: true_elevation.max(0.0),
            true_elevation_deg: true_elevation,
            azimuth_deg: azimuth,
            compass_azimuth_deg: compass,
            vector,
        }
    }
}

/// Unit vector for an elevation and a heading-relative azimuth, both degrees
pub fn body_frame_vector(elevation_deg: f64, azimuth_deg: f64) -> Vector3<f64> {
    let (sin_e, cos_e) = elevation_deg.to_radians().sin_cos();
    let (sin_az, cos_az) = azimuth_deg.to_radians().sin_cos();
    Vector3::new(cos_e * cos_az, -cos_e * sin_az, sin_e)
}
