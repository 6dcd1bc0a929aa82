//! Solar array output

use super::panel::{total_projected_area, Panel};
use crate::config::PowerConfig;
use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerInput {
    /// Body-frame sun vector; `None` when the sun is down
    pub sun_vector: Option<Vector3<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowerOutput {
    /// Solar power falling on the panels (W)
    pub received_w: f64,
    /// Electrical output (W)
    pub generated_w: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerModel {
    flux_w_m2: f64,
    efficiency: f64,
    panels: Vec<Panel>,
}

impl PowerModel {
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            flux_w_m2: config.solar_flux_w_m2,
            efficiency: config.efficiency,
            panels: config.panels.clone(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn compute(&self, input: &PowerInput) -> PowerOutput {
        let area = total_projected_area(&self.panels, input.sun_vector.as_ref());
        let received_w = self.flux_w_m2 * area;
        PowerOutput {
            received_w,
            generated_w: self.efficiency * received_w,
        }
    }
}
