//! Result of a complete run

use crate::state::SimulationState;
use crate::units::seconds_to_days;
use serde::Serialize;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    PathComplete,
    TimeCapReached,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::PathComplete => write!(f, "path complete"),
            Termination::TimeCapReached => write!(f, "time cap reached"),
        }
    }
}

/// Aggregates over the output series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub termination: Termination,
    pub ticks: u64,
    pub elapsed_s: f64,
    pub elapsed_days: f64,
    pub distance_km: f64,
    pub path_length_km: f64,
    pub mean_speed_mps: f64,
    /// Sum of per-tick throttling losses
    pub total_excess_s: f64,
    /// Time spent fully stopped
    pub stopped_s: f64,
    pub max_surface_temp_c: f64,
    pub min_surface_temp_c: f64,
    pub max_sun_elevation_deg: f64,
    /// Left-rectangle integral of generated power
    pub energy_generated_wh: f64,
    pub peak_thermal_power_w: f64,
}

impl RunSummary {
    /// `series[0]` is the initial state; every later row is one tick of `dt_s`
    pub fn from_series(
        series: &[SimulationState],
        termination: Termination,
        path_length_km: f64,
        dt_s: f64,
    ) -> Self {
        let last = series.last();
        let elapsed_s = last.map_or(0.0, |s| s.t_s);
        let distance_km = last.map_or(0.0, |s| s.dist_km);
        let ticks = last.map_or(0, |s| s.step);

        let ticked = series.get(1..).unwrap_or(&[]);
        let total_excess_s = ticked.iter().map(|s| s.t_excess_s).sum();
        let stopped_s = ticked.iter().filter(|s| s.speed_mps == 0.0).count() as f64 * dt_s;

        let temps = series.iter().map(|s| s.surface_temp_c);
        let max_surface_temp_c = temps.clone().fold(f64::NEG_INFINITY, f64::max);
        let min_surface_temp_c = temps.fold(f64::INFINITY, f64::min);
        let max_sun_elevation_deg = series
            .iter()
            .map(|s| s.sun_elevation_deg)
            .fold(0.0, f64::max);
        let peak_thermal_power_w = series
            .iter()
            .map(|s| s.thermal_power_sun_w)
            .fold(0.0, f64::max);

        let energy_generated_wh = series
            .windows(2)
            .map(|w| w[0].power_generated_w * (w[1].t_s - w[0].t_s))
            .sum::<f64>()
            / 3600.0;

        Self {
            termination,
            ticks,
            elapsed_s,
            elapsed_days: seconds_to_days(elapsed_s),
            distance_km,
            path_length_km,
            mean_speed_mps: if elapsed_s > 0.0 {
                distance_km * 1000.0 / elapsed_s
            } else {
                0.0
            },
            total_excess_s,
            stopped_s,
            max_surface_temp_c,
            min_surface_temp_c,
            max_sun_elevation_deg,
            energy_generated_wh,
            peak_thermal_power_w,
        }
    }

    pub fn completion_fraction(&self) -> f64 {
        if self.path_length_km > 0.0 {
            self.distance_km / self.path_length_km
        } else {
            0.0
        }
    }
}

/// Full output of [`crate::Simulation::run`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    pub route: String,
    pub termination: Termination,
    pub summary: RunSummary,
    pub series: Vec<SimulationState>,
}

impl SimulationRun {
    pub fn final_state(&self) -> Option<&SimulationState> {
        self.series.last()
    }
}
