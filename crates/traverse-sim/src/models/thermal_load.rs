//! Solar heat load on the rover body

use super::panel::{total_projected_area, Panel};
use crate::config::ThermalLoadConfig;
use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalLoadInput {
    pub sun_vector: Option<Vector3<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThermalLoadOutput {
    /// Direct solar power absorbed by the body faces (W)
    pub power_sun_w: f64,
}

/// Incident flux on the six faces of the body box
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalLoadModel {
    flux_w_m2: f64,
    faces: Vec<Panel>,
}

impl ThermalLoadModel {
    pub fn new(config: &ThermalLoadConfig) -> Self {
        Self {
            flux_w_m2: config.solar_flux_w_m2,
            faces: config.faces(),
        }
    }

    pub fn compute(&self, input: &ThermalLoadInput) -> ThermalLoadOutput {
        ThermalLoadOutput {
            power_sun_w: self.flux_w_m2 * total_projected_area(&self.faces, input.sun_vector.as_ref()),
        }
    }
}
