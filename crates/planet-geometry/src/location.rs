//! Immutable positions on the reference sphere

use crate::spherical::{bearing_deg, from_cartesian, normalize_angle, to_cartesian};
use crate::{GeometryError, ReferenceSphere, Result};
use nalgebra::Vector3;
use serde::Serialize;

/// A point on the reference sphere.
///
/// `lat` is in [-90, 90] and `lon` in (-180, 180]. `xyz` is derived once at
/// construction and always agrees with (lat, lon) at the sphere radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip)]
    xyz: Vector3<f64>,
    #[serde(skip)]
    sphere: ReferenceSphere,
}

impl Location {
    pub fn new(lat: f64, lon: f64, sphere: ReferenceSphere) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::InvalidLatitude(lat));
        }
        let lon = normalize_angle(lon);
        Ok(Self {
            lat,
            lon,
            xyz: to_cartesian(lat, lon, sphere.radius_km),
            sphere,
        })
    }

    /// Project an arbitrary Cartesian point radially onto the sphere
    pub fn from_cartesian(xyz: &Vector3<f64>, sphere: ReferenceSphere) -> Result<Self> {
        let (lat, lon) = from_cartesian(xyz);
        Self::new(lat, lon, sphere)
    }

    pub fn xyz(&self) -> &Vector3<f64> {
        &self.xyz
    }

    pub fn sphere(&self) -> ReferenceSphere {
        self.sphere
    }

    /// Great-circle distance in km
    pub fn distance_to(&self, other: &Location) -> f64 {
        self.sphere.distance_km(self, other)
    }

    /// Initial bearing towards `other`, in (-180°, 180°]
    pub fn bearing_to(&self, other: &Location) -> f64 {
        bearing_deg(self.lat, self.lon, other.lat, other.lon)
    }

    /// Signed longitude difference `self.lon - lon`, wrapped to (-180°, 180°]
    pub fn longitude_offset_from(&self, lon: f64) -> f64 {
        normalize_angle(self.lon - lon)
    }
}
