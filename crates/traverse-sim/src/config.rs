//! Simulation configuration
//!
//! One immutable [`SimConfig`] is built before the run and passed by
//! reference to every model. Every field has a default, so a JSON file only
//! needs to name what it overrides:
//!
//! ```json
//! { "clock": { "dt_s": 60.0 }, "speed": { "cold_zones": [{ "start_km": 40.0, "end_km": 55.0 }] } }
//! ```

use crate::models::panel::{box_faces, default_solar_array, Panel};
use crate::units::days_to_seconds;
use crate::{Result, SimError, SUN_DISTANCE_MAX_AU, SUN_DISTANCE_MIN_AU};
use planet_geometry::{ReferenceSphere, MERCURY_EQUATORIAL_RADIUS_KM, MERCURY_POLAR_RADIUS_KM};
use serde::{Deserialize, Serialize};

/// Mercury solar day in seconds (175.94 Earth days)
pub const MERCURY_SOLAR_DAY_S: f64 = 175.94 * 86_400.0;

/// Terminator phase at epoch relative to the start longitude (90 - 86.5)
pub const TERMINATOR_BIAS_DEG: f64 = 3.5;

/// Default planet-sun distance (AU)
pub const SUN_DISTANCE_AU: f64 = 0.38;

pub const DT_S: f64 = 300.0;
pub const MAX_DURATION_DAYS: f64 = 300.0;

pub const LOOKAHEAD_KM: f64 = 0.1;

pub const MAX_SPEED_MPS: f64 = 1.6;
pub const TEMP_MAX_C: f64 = 55.0;
pub const COLD_ZONE_TEMP_MAX_C: f64 = 65.0;
pub const TEMP_P_RANGE_C: f64 = 5.0;
pub const COLD_ZONE_LEAD_FACTOR: f64 = 2.0;

/// Solar flux at aphelion (W/m²)
pub const APHELION_FLUX_W_M2: f64 = 6278.0;
/// Solar flux at perihelion (W/m²)
pub const PERIHELION_FLUX_W_M2: f64 = 14462.0;
/// Cell efficiency times system efficiency (0.2 · 0.8)
pub const PANEL_EFFICIENCY: f64 = 0.2 * 0.8;

pub const BODY_LENGTH_M: f64 = 0.3;
pub const BODY_WIDTH_M: f64 = 0.2;
pub const BODY_HEIGHT_M: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub planet: PlanetConfig,
    pub clock: ClockConfig,
    pub traversal: TraversalConfig,
    pub speed: SpeedConfig,
    pub power: PowerConfig,
    pub thermal_load: ThermalLoadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub equatorial_radius_km: f64,
    pub polar_radius_km: f64,
    /// Solar day length; the terminator sweeps 360° per period
    pub rotation_period_s: f64,
    pub sun_distance_au: f64,
    pub subsolar_latitude_deg: f64,
    /// Initial terminator longitude is the start longitude minus this
    pub terminator_bias_deg: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            equatorial_radius_km: MERCURY_EQUATORIAL_RADIUS_KM,
            polar_radius_km: MERCURY_POLAR_RADIUS_KM,
            rotation_period_s: MERCURY_SOLAR_DAY_S,
            sun_distance_au: SUN_DISTANCE_AU,
            subsolar_latitude_deg: 0.0,
            terminator_bias_deg: TERMINATOR_BIAS_DEG,
        }
    }
}

impl PlanetConfig {
    pub fn sphere(&self) -> Result<ReferenceSphere> {
        Ok(ReferenceSphere::from_radii(
            self.equatorial_radius_km,
            self.polar_radius_km,
        )?)
    }

    /// Terminator sweep rate in deg/s
    pub fn rotation_rate_deg_s(&self) -> f64 {
        360.0 / self.rotation_period_s
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub dt_s: f64,
    /// Safety cap on simulated time
    pub max_duration_s: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            dt_s: DT_S,
            max_duration_s: days_to_seconds(MAX_DURATION_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Distance ahead of the rover used to derive its heading
    pub lookahead_km: f64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            lookahead_km: LOOKAHEAD_KM,
        }
    }
}

/// Stretch of path known to be cold enough to tolerate a higher ceiling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColdZone {
    pub start_km: f64,
    pub end_km: f64,
}

impl ColdZone {
    pub fn new(start_km: f64, end_km: f64) -> Self {
        Self { start_km, end_km }
    }

    /// Distance window where the raised ceiling applies. It opens early by
    /// `lead_factor` zone lengths.
    pub fn window(&self, lead_factor: f64) -> (f64, f64) {
        let length = self.end_km - self.start_km;
        (self.start_km - length * lead_factor, self.end_km)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub max_speed_mps: f64,
    pub temp_max_c: f64,
    pub cold_zone_temp_max_c: f64,
    /// Width of the proportional band below the ceiling
    pub temp_p_range_c: f64,
    pub cold_zone_lead_factor: f64,
    pub cold_zones: Vec<ColdZone>,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            max_speed_mps: MAX_SPEED_MPS,
            temp_max_c: TEMP_MAX_C,
            cold_zone_temp_max_c: COLD_ZONE_TEMP_MAX_C,
            temp_p_range_c: TEMP_P_RANGE_C,
            cold_zone_lead_factor: COLD_ZONE_LEAD_FACTOR,
            cold_zones: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub solar_flux_w_m2: f64,
    pub efficiency: f64,
    pub panels: Vec<Panel>,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            solar_flux_w_m2: APHELION_FLUX_W_M2,
            efficiency: PANEL_EFFICIENCY,
            panels: default_solar_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalLoadConfig {
    pub solar_flux_w_m2: f64,
    pub body_length_m: f64,
    pub body_width_m: f64,
    pub body_height_m: f64,
}

impl Default for ThermalLoadConfig {
    fn default() -> Self {
        Self {
            solar_flux_w_m2: PERIHELION_FLUX_W_M2,
            body_length_m: BODY_LENGTH_M,
            body_width_m: BODY_WIDTH_M,
            body_height_m: BODY_HEIGHT_M,
        }
    }
}

impl ThermalLoadConfig {
    pub fn faces(&self) -> Vec<Panel> {
        box_faces(self.body_length_m, self.body_width_m, self.body_height_m)
    }
}

fn require(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SimError::config(msg()))
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl SimConfig {
    /// Reject values no model can run with
    pub fn validate(&self) -> Result<()> {
        let planet = &self.planet;
        planet.sphere()?;
        require(positive(planet.rotation_period_s), || {
            format!("rotation period must be positive, got {}", planet.rotation_period_s)
        })?;
        validate_sun_distance(planet.sun_distance_au)?;
        require(
            (-90.0..=90.0).contains(&planet.subsolar_latitude_deg),
            || format!("subsolar latitude {} outside [-90, 90]", planet.subsolar_latitude_deg),
        )?;
        require(planet.terminator_bias_deg.is_finite(), || {
            "terminator bias must be finite".to_string()
        })?;

        let clock = &self.clock;
        require(positive(clock.dt_s), || {
            format!("time step must be positive, got {}", clock.dt_s)
        })?;
        require(
            clock.max_duration_s.is_finite() && clock.max_duration_s >= clock.dt_s,
            || {
                format!(
                    "max duration {} s is shorter than one step of {} s",
                    clock.max_duration_s, clock.dt_s
                )
            },
        )?;

        require(positive(self.traversal.lookahead_km), || {
            format!("lookahead must be positive, got {}", self.traversal.lookahead_km)
        })?;

        let speed = &self.speed;
        require(positive(speed.max_speed_mps), || {
            format!("max speed must be positive, got {}", speed.max_speed_mps)
        })?;
        require(
            speed.temp_max_c.is_finite() && speed.cold_zone_temp_max_c.is_finite(),
            || "temperature ceilings must be finite".to_string(),
        )?;
        require(positive(speed.temp_p_range_c), || {
            format!("temperature band must be positive, got {}", speed.temp_p_range_c)
        })?;
        require(non_negative(speed.cold_zone_lead_factor), || {
            format!("cold zone lead factor must be >= 0, got {}", speed.cold_zone_lead_factor)
        })?;
        for (i, zone) in speed.cold_zones.iter().enumerate() {
            require(
                zone.start_km.is_finite() && zone.end_km.is_finite() && zone.start_km < zone.end_km,
                || format!("cold zone {} [{}, {}] is inverted or empty", i, zone.start_km, zone.end_km),
            )?;
        }

        let power = &self.power;
        require(non_negative(power.solar_flux_w_m2), || {
            format!("power flux must be >= 0, got {}", power.solar_flux_w_m2)
        })?;
        require(
            power.efficiency.is_finite() && (0.0..=1.0).contains(&power.efficiency),
            || format!("efficiency {} outside [0, 1]", power.efficiency),
        )?;
        validate_panels("solar panel", &power.panels)?;

        let load = &self.thermal_load;
        require(non_negative(load.solar_flux_w_m2), || {
            format!("thermal flux must be >= 0, got {}", load.solar_flux_w_m2)
        })?;
        require(
            non_negative(load.body_length_m)
                && non_negative(load.body_width_m)
                && non_negative(load.body_height_m),
            || "body dimensions must be >= 0".to_string(),
        )?;

        Ok(())
    }
}

pub fn validate_sun_distance(r_au: f64) -> Result<()> {
    if r_au.is_finite() && (SUN_DISTANCE_MIN_AU..=SUN_DISTANCE_MAX_AU).contains(&r_au) {
        Ok(())
    } else {
        Err(SimError::SunDistanceOutOfRange(r_au))
    }
}

fn validate_panels(kind: &str, panels: &[Panel]) -> Result<()> {
    for (i, panel) in panels.iter().enumerate() {
        require(non_negative(panel.area_m2), || {
            format!("{} {} has negative area {}", kind, i, panel.area_m2)
        })?;
        require(panel.has_unit_normal(), || {
            format!("{} {} normal {:?} is not a unit vector", kind, i, panel.normal)
        })?;
    }
    Ok(())
}
