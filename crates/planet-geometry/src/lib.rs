//! Planet Geometry Library
//!
//! Positions on a reference sphere, great-circle formulas, and traverse paths
//! that answer "where is the rover after travelling `d` km".
//!
//! # Path model
//!
//! ```text
//! waypoints ──haversine──▶ dists[i] (cumulative km)
//!     │
//!     └──to_cartesian──▶ xyz[i] ──cubic spline in d──▶ xyz(d) ──radial projection──▶ (lat, lon)
//! ```
//!
//! The spline interpolates (zero smoothing), so `point_at_distance(dists[i])`
//! returns waypoint `i`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod location;
pub mod path;
pub mod spherical;
pub mod spline;

pub use location::Location;
pub use path::{assemble_route, PathCurve, PathCursor, PathSegment, SegmentStats, Waypoint};
pub use spherical::{bearing_deg, haversine_km, normalize_angle};

/// Mercury equatorial radius (semi-major) in km
pub const MERCURY_EQUATORIAL_RADIUS_KM: f64 = 2440.5;

/// Mercury polar radius (semi-minor) in km
pub const MERCURY_POLAR_RADIUS_KM: f64 = 2438.3;

/// Segment endpoints closer than this are treated as the same waypoint
pub const JOINT_TOLERANCE_KM: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),
    #[error("Non-finite coordinate ({lat}, {lon})")]
    NonFiniteCoordinate { lat: f64, lon: f64 },
    #[error("Invalid sphere radius: {0} km")]
    InvalidRadius(f64),
    #[error("Path '{name}' needs at least 2 distinct waypoints, has {count}")]
    InsufficientWaypoints { name: String, count: usize },
    #[error("Path '{0}' has zero total length")]
    ZeroLength(String),
    #[error("Unknown path segment: {0}")]
    UnknownSegment(String),
    #[error("Route order is empty")]
    EmptyRoute,
    #[error("Spline knots must be strictly increasing (knot {0})")]
    NonMonotonicKnots(usize),
    #[error("Spline needs at least 2 knots, has {0}")]
    TooFewKnots(usize),
    #[error("Spline has {knots} knots but {values} values")]
    LengthMismatch { knots: usize, values: usize },
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Sphere used for all circular calculations.
///
/// Planets are slightly oblate; the traverse only needs a sphere, so the
/// radius is the mean of the equatorial and polar radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSphere {
    pub radius_km: f64,
}

impl ReferenceSphere {
    pub fn new(radius_km: f64) -> Result<Self> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius_km));
        }
        Ok(Self { radius_km })
    }

    /// Sphere with the mean of the two radii
    pub fn from_radii(equatorial_km: f64, polar_km: f64) -> Result<Self> {
        if !(equatorial_km.is_finite() && equatorial_km > 0.0) {
            return Err(GeometryError::InvalidRadius(equatorial_km));
        }
        if !(polar_km.is_finite() && polar_km > 0.0) {
            return Err(GeometryError::InvalidRadius(polar_km));
        }
        Self::new((equatorial_km + polar_km) / 2.0)
    }

    pub fn mercury() -> Self {
        Self {
            radius_km: (MERCURY_EQUATORIAL_RADIUS_KM + MERCURY_POLAR_RADIUS_KM) / 2.0,
        }
    }

    /// Great-circle distance in km
    pub fn distance_km(&self, a: &Location, b: &Location) -> f64 {
        haversine_km(a.lat, a.lon, b.lat, b.lon, self.radius_km)
    }

    /// Length in km of one degree of longitude along the given parallel
    pub fn parallel_km_per_deg(&self, lat_deg: f64) -> f64 {
        self.radius_km * lat_deg.to_radians().cos() * std::f64::consts::PI / 180.0
    }
}

impl Default for ReferenceSphere {
    fn default() -> Self {
        Self::mercury()
    }
}
