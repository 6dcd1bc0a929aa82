//! Surface temperature as a function of subsolar angle
//!
//! Radiative-equilibrium fit for the regolith surface:
//!
//! ```text
//! |phi| >= 90:  T = T_cold
//! otherwise:    T = T_sub(r) · cos(phi)^¼ + T_cold · (|phi| / 90)³
//!               T_sub(r) = 407 + 8 / √r
//! ```
//!
//! with `T_cold = 110 K` and `r` the planet-sun distance in AU. The fit is
//! only valid for `r` inside Mercury's orbit envelope, so models are built
//! through a constructor that rejects anything else.

use crate::config::{validate_sun_distance, PlanetConfig};
use crate::units::{celsius_to_kelvin, kelvin_to_celsius};
use crate::{Result, SimError};
use serde::Serialize;
use std::fmt;

/// Night-side surface temperature (K)
pub const T_COLD_K: f64 = 110.0;

const SUBSOLAR_BASE_K: f64 = 407.0;
const SUBSOLAR_DISTANCE_COEFF_K: f64 = 8.0;

/// Bisection stops once the bracket is narrower than this (deg)
const INVERSE_TOLERANCE_DEG: f64 = 1e-10;
const INVERSE_MAX_ITERATIONS: usize = 200;

/// Round-off allowed when a target sits exactly on the curve's end values (K)
const BOUND_SLACK_K: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceThermalInput {
    pub phi_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceThermalOutput {
    pub surface_temp_c: f64,
}

/// Source of the surface temperature under the rover
pub trait SurfaceTemperature: fmt::Debug {
    fn surface_temperature(&self, input: &SurfaceThermalInput) -> SurfaceThermalOutput;
}

/// Subsolar-point temperature at distance `r_au` (K)
pub fn subsolar_temperature_k(r_au: f64) -> f64 {
    SUBSOLAR_BASE_K + SUBSOLAR_DISTANCE_COEFF_K / r_au.sqrt()
}

fn radiative_temperature_k(phi_deg: f64, r_au: f64) -> f64 {
    let phi_abs = phi_deg.abs();
    if phi_abs >= 90.0 {
        return T_COLD_K;
    }
    subsolar_temperature_k(r_au) * phi_deg.to_radians().cos().powf(0.25)
        + T_COLD_K * (phi_abs / 90.0).powi(3)
}

/// Surface temperature in °C at subsolar angle `phi_deg`
pub fn surface_temperature_c(phi_deg: f64, r_au: f64) -> Result<f64> {
    validate_sun_distance(r_au)?;
    Ok(kelvin_to_celsius(radiative_temperature_k(phi_deg, r_au)))
}

/// Smallest subsolar angle in [0°, 90°] at which the surface is at `temp_c`.
///
/// The fit decreases monotonically on that interval, from `T(0)` down to
/// `T_cold`, so a bisection converges for any temperature between the two.
pub fn subsolar_angle_for_temperature(temp_c: f64, r_au: f64) -> Result<f64> {
    validate_sun_distance(r_au)?;
    let target_k = celsius_to_kelvin(temp_c);
    let hottest_k = radiative_temperature_k(0.0, r_au);
    if !target_k.is_finite()
        || target_k > hottest_k + BOUND_SLACK_K
        || target_k < T_COLD_K - BOUND_SLACK_K
    {
        return Err(SimError::TemperatureUnreachable {
            temp_c,
            sun_distance_au: r_au,
        });
    }

    let (mut lo, mut hi) = (0.0_f64, 90.0_f64);
    for _ in 0..INVERSE_MAX_ITERATIONS {
        if hi - lo < INVERSE_TOLERANCE_DEG {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if radiative_temperature_k(mid, r_au) > target_k {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Radiative surface fit at a fixed sun distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiativeSurfaceModel {
    sun_distance_au: f64,
}

impl RadiativeSurfaceModel {
    pub fn new(sun_distance_au: f64) -> Result<Self> {
        validate_sun_distance(sun_distance_au)?;
        Ok(Self { sun_distance_au })
    }

    pub fn from_config(planet: &PlanetConfig) -> Result<Self> {
        Self::new(planet.sun_distance_au)
    }

    pub fn sun_distance_au(&self) -> f64 {
        self.sun_distance_au
    }

    pub fn temperature_c(&self, phi_deg: f64) -> f64 {
        kelvin_to_celsius(radiative_temperature_k(phi_deg, self.sun_distance_au))
    }
}

impl SurfaceTemperature for RadiativeSurfaceModel {
    fn surface_temperature(&self, input: &SurfaceThermalInput) -> SurfaceThermalOutput {
        SurfaceThermalOutput {
            surface_temp_c: self.temperature_c(input.phi_deg),
        }
    }
}

/// Same temperature everywhere; for what-if runs and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSurfaceTemperature {
    pub temp_c: f64,
}

impl ConstantSurfaceTemperature {
    pub fn new(temp_c: f64) -> Self {
        Self { temp_c }
    }
}

impl SurfaceTemperature for ConstantSurfaceTemperature {
    fn surface_temperature(&self, _input: &SurfaceThermalInput) -> SurfaceThermalOutput {
        SurfaceThermalOutput {
            surface_temp_c: self.temp_c,
        }
    }
}

/// Strip of day side behind the terminator where the surface stays at or
/// below a temperature ceiling, evaluated at one latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalBand {
    pub ceiling_c: f64,
    pub latitude_deg: f64,
    /// The rover must keep |phi| at or above this
    pub min_subsolar_angle_deg: f64,
    /// Largest sunward offset from the terminator (alpha) inside the band
    pub max_terminator_offset_deg: f64,
    pub width_km: f64,
    /// Ground speed of the terminator along the parallel (m/s)
    pub terminator_speed_mps: f64,
}

impl ThermalBand {
    pub fn new(ceiling_c: f64, latitude_deg: f64, planet: &PlanetConfig) -> Result<Self> {
        let r = planet.sun_distance_au;
        validate_sun_distance(r)?;
        let sphere = planet.sphere()?;

        let hottest_c = kelvin_to_celsius(radiative_temperature_k(0.0, r));
        let min_phi = if ceiling_c >= hottest_c {
            0.0
        } else {
            subsolar_angle_for_temperature(ceiling_c, r)?
        };
        let offset = 90.0 - min_phi;
        let km_per_deg = sphere.parallel_km_per_deg(latitude_deg);

        Ok(Self {
            ceiling_c,
            latitude_deg,
            min_subsolar_angle_deg: min_phi,
            max_terminator_offset_deg: offset,
            width_km: offset * km_per_deg,
            terminator_speed_mps: planet.rotation_rate_deg_s() * km_per_deg * 1000.0,
        })
    }

    /// How long the band takes to sweep past a stationary point (s)
    pub fn dwell_time_s(&self) -> f64 {
        self.width_km * 1000.0 / self.terminator_speed_mps
    }

    /// Can a rover at `speed_mps` outrun the terminator here
    pub fn can_keep_pace(&self, speed_mps: f64) -> bool {
        speed_mps >= self.terminator_speed_mps
    }
}
