//! Day/night boundary longitude

use crate::config::PlanetConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminatorOutput {
    pub longitude_deg: f64,
}

/// Terminator longitude, advanced at the planet's solar rotation rate.
///
/// The longitude is never wrapped; consumers normalize differences.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminatorModel {
    longitude_deg: f64,
    rate_deg_s: f64,
}

impl TerminatorModel {
    pub fn new(start_longitude_deg: f64, planet: &PlanetConfig) -> Self {
        Self {
            longitude_deg: start_longitude_deg - planet.terminator_bias_deg,
            rate_deg_s: planet.rotation_rate_deg_s(),
        }
    }

    pub fn rate_deg_s(&self) -> f64 {
        self.rate_deg_s
    }

    pub fn output(&self) -> TerminatorOutput {
        TerminatorOutput {
            longitude_deg: self.longitude_deg,
        }
    }

    pub fn step(&mut self, dt_s: f64) -> TerminatorOutput {
        self.longitude_deg += self.rate_deg_s * dt_s;
        self.output()
    }
}
