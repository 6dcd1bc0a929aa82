//! Published per-tick simulation state

use crate::models::{
    PowerOutput, SpeedOutput, SunOutput, SurfaceThermalOutput, TerminatorOutput,
    ThermalLoadOutput, TraversalOutput,
};
use crate::units::seconds_to_days;
use crate::{Result, SimError};
use planet_geometry::Location;
use serde::Serialize;

/// Snapshot of every model output after one tick.
///
/// Written only by the orchestrator. One row of the output series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    pub step: u64,
    pub t_s: f64,
    pub dist_km: f64,
    pub position: Location,
    pub speed_mps: f64,
    pub t_excess_s: f64,
    pub bearing_deg: f64,
    pub terminator_lon_deg: f64,
    pub alpha_deg: f64,
    pub phi_deg: f64,
    pub surface_temp_c: f64,
    pub temp_max_c: f64,
    pub sun_elevation_deg: f64,
    pub sun_azimuth_deg: f64,
    pub sun_vector: Option<[f64; 3]>,
    pub power_received_w: f64,
    pub power_generated_w: f64,
    pub thermal_power_sun_w: f64,
}

/// Outputs of one tick, in evaluation order
pub(crate) struct TickOutputs<'a> {
    pub terminator: &'a TerminatorOutput,
    pub thermal: &'a SurfaceThermalOutput,
    pub speed: &'a SpeedOutput,
    pub traversal: &'a TraversalOutput,
    pub sun: &'a SunOutput,
    pub power: &'a PowerOutput,
    pub thermal_load: &'a ThermalLoadOutput,
}

impl SimulationState {
    pub(crate) fn publish(step: u64, t_s: f64, out: TickOutputs<'_>) -> Self {
        Self {
            step,
            t_s,
            dist_km: out.traversal.dist_km,
            position: out.traversal.position,
            speed_mps: out.speed.speed_mps,
            t_excess_s: out.speed.t_excess_s,
            bearing_deg: out.traversal.bearing_deg,
            terminator_lon_deg: out.terminator.longitude_deg,
            alpha_deg: out.traversal.alpha_deg,
            phi_deg: out.traversal.phi_deg,
            surface_temp_c: out.thermal.surface_temp_c,
            temp_max_c: out.speed.temp_max_c,
            sun_elevation_deg: out.sun.elevation_deg,
            sun_azimuth_deg: out.sun.azimuth_deg,
            sun_vector: out.sun.vector.map(|v| [v.x, v.y, v.z]),
            power_received_w: out.power.received_w,
            power_generated_w: out.power.generated_w,
            thermal_power_sun_w: out.thermal_load.power_sun_w,
        }
    }

    pub fn t_days(&self) -> f64 {
        seconds_to_days(self.t_s)
    }

    pub fn is_sunlit(&self) -> bool {
        self.sun_vector.is_some()
    }

    /// Stop the run on the first NaN or infinity rather than carry it forward
    pub fn check_finite(&self) -> Result<()> {
        let fields = [
            ("time", self.t_s),
            ("distance", self.dist_km),
            ("speed", self.speed_mps),
            ("excess time", self.t_excess_s),
            ("bearing", self.bearing_deg),
            ("terminator longitude", self.terminator_lon_deg),
            ("subsolar angle", self.phi_deg),
            ("surface temperature", self.surface_temp_c),
            ("sun elevation", self.sun_elevation_deg),
            ("sun azimuth", self.sun_azimuth_deg),
            ("generated power", self.power_generated_w),
            ("thermal power", self.thermal_power_sun_w),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(field, _)) => Err(SimError::NonFinite {
                field,
                step: self.step,
            }),
            None => Ok(()),
        }
    }
}
