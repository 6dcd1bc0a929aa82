//! Flat sun-facing surfaces in the rover body frame
//!
//! Body frame: x forward, y left, z up.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Tolerance on |normal| when validating configured panels
pub const UNIT_NORMAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Area in m²
    pub area_m2: f64,
    /// Outward unit normal in body axes
    pub normal: [f64; 3],
}

impl Panel {
    pub fn new(area_m2: f64, normal: [f64; 3]) -> Self {
        Self { area_m2, normal }
    }

    pub fn normal(&self) -> Vector3<f64> {
        Vector3::from(self.normal)
    }

    pub fn has_unit_normal(&self) -> bool {
        (self.normal().norm() - 1.0).abs() <= UNIT_NORMAL_TOLERANCE
    }

    /// Sun-facing area, floored at zero. No sun vector means nothing is lit.
    pub fn projected_area(&self, sun: Option<&Vector3<f64>>) -> f64 {
        match sun {
            Some(s) => (self.area_m2 * self.normal().dot(s)).max(0.0),
            None => 0.0,
        }
    }
}

pub fn total_projected_area(panels: &[Panel], sun: Option<&Vector3<f64>>) -> f64 {
    panels.iter().map(|p| p.projected_area(sun)).sum()
}

/// Solar array of the reference rover: two forward panels, one per side
pub fn default_solar_array() -> Vec<Panel> {
    vec![
        Panel::new(0.06, [1.0, 0.0, 0.0]),
        Panel::new(0.06, [1.0, 0.0, 0.0]),
        Panel::new(0.08, [0.0, 1.0, 0.0]),
        Panel::new(0.08, [0.0, -1.0, 0.0]),
    ]
}

/// Six outward faces of an axis-aligned box with side lengths in m
pub fn box_faces(length_m: f64, width_m: f64, height_m: f64) -> Vec<Panel> {
    let yz = width_m * height_m;
    let xz = length_m * height_m;
    let xy = length_m * width_m;
    vec![
        Panel::new(yz, [1.0, 0.0, 0.0]),
        Panel::new(yz, [-1.0, 0.0, 0.0]),
        Panel::new(xz, [0.0, 1.0, 0.0]),
        Panel::new(xz, [0.0, -1.0, 0.0]),
        Panel::new(xy, [0.0, 0.0, 1.0]),
        Panel::new(xy, [0.0, 0.0, -1.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_projected_area_facing_sun() {
        let panel = Panel::new(0.08, [0.0, 1.0, 0.0]);
        let sun = Vector3::new(0.0, 1.0, 0.0);
        assert!((panel.projected_area(Some(&sun)) - 0.08).abs() < EPSILON);
    }

    #[test]
    fn test_projected_area_floors_at_zero() {
        let panel = Panel::new(0.08, [0.0, -1.0, 0.0]);
        let sun = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(panel.projected_area(Some(&sun)), 0.0);
    }

    #[test]
    fn test_projected_area_without_sun() {
        let panel = Panel::new(1.0, [0.0, 0.0, 1.0]);
        assert_eq!(panel.projected_area(None), 0.0);
    }

    #[test]
    fn test_oblique_incidence() {
        let panel = Panel::new(2.0, [1.0, 0.0, 0.0]);
        let e = 60f64.to_radians();
        let sun = Vector3::new(e.cos(), 0.0, e.sin());
        assert!((panel.projected_area(Some(&sun)) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_box_faces_lit_area_overhead() {
        let faces = box_faces(0.3, 0.2, 0.2);
        assert_eq!(faces.len(), 6);
        let overhead = Vector3::new(0.0, 0.0, 1.0);
        // Only the top face sees an overhead sun
        assert!((total_projected_area(&faces, Some(&overhead)) - 0.06).abs() < EPSILON);
    }

    #[test]
    fn test_default_array_normals() {
        let array = default_solar_array();
        assert_eq!(array.len(), 4);
        assert!(array.iter().all(Panel::has_unit_normal));
        let total: f64 = array.iter().map(|p| p.area_m2).sum();
        assert!((total - 0.28).abs() < EPSILON);
    }
}
