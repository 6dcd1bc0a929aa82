//! Orchestrator: owns the state and steps the models in a fixed order

use crate::clock::SimulationClock;
use crate::config::SimConfig;
use crate::models::{
    PowerInput, PowerModel, RadiativeSurfaceModel, SolarGeometryModel, SolarInput,
    SpeedControlModel, SpeedInput, SurfaceTemperature, SurfaceThermalInput, TerminatorModel,
    ThermalLoadInput, ThermalLoadModel, TraversalInput, TraversalModel,
};
use crate::run::{RunSummary, SimulationRun, Termination};
use crate::state::{SimulationState, TickOutputs};
use crate::units::km_travelled;
use crate::{Result, SimError};
use planet_geometry::PathCurve;
use tracing::{info, trace, warn};

/// One traverse of `path` under `config`
#[derive(Debug)]
pub struct Simulation<'a> {
    path: &'a PathCurve,
    clock: SimulationClock,
    terminator: TerminatorModel,
    surface: Box<dyn SurfaceTemperature + 'a>,
    speed: SpeedControlModel,
    traversal: TraversalModel,
    sun: SolarGeometryModel,
    power: PowerModel,
    thermal_load: ThermalLoadModel,
    state: SimulationState,
}

impl<'a> Simulation<'a> {
    /// Simulation with the radiative surface temperature fit
    pub fn new(config: &SimConfig, path: &'a PathCurve) -> Result<Self> {
        let surface = RadiativeSurfaceModel::from_config(&config.planet)?;
        Self::with_surface_model(config, path, Box::new(surface))
    }

    pub fn with_surface_model(
        config: &SimConfig,
        path: &'a PathCurve,
        surface: Box<dyn SurfaceTemperature + 'a>,
    ) -> Result<Self> {
        config.validate()?;
        let sphere = config.planet.sphere()?;
        if path.sphere() != sphere {
            return Err(SimError::config(format!(
                "path '{}' was built on a {} km sphere, config uses {} km",
                path.name(),
                path.sphere().radius_km,
                sphere.radius_km
            )));
        }

        let clock = SimulationClock::from_config(&config.clock)?;
        let terminator = TerminatorModel::new(path.start().lon, &config.planet);
        let traversal = TraversalModel::new(path, &config.traversal, terminator.output().longitude_deg)?;
        let speed = SpeedControlModel::new(&config.speed);
        let sun = SolarGeometryModel::new(&config.planet);
        let power = PowerModel::new(&config.power);
        let thermal_load = ThermalLoadModel::new(&config.thermal_load);

        // t = 0: rover parked on the first waypoint
        let terminator_out = terminator.output();
        let traversal_out = traversal.output();
        let thermal_out = surface.surface_temperature(&SurfaceThermalInput {
            phi_deg: traversal_out.phi_deg,
        });
        let speed_out = speed.output();
        let sun_out = sun.compute(&SolarInput {
            position: traversal_out.position,
            bearing_deg: traversal_out.bearing_deg,
            terminator_longitude_deg: terminator_out.longitude_deg,
        });
        let power_out = power.compute(&PowerInput {
            sun_vector: sun_out.vector,
        });
        let load_out = thermal_load.compute(&ThermalLoadInput {
            sun_vector: sun_out.vector,
        });
        let state = SimulationState::publish(
            0,
            clock.time_s(),
            TickOutputs {
                terminator: &terminator_out,
                thermal: &thermal_out,
                speed: &speed_out,
                traversal: &traversal_out,
                sun: &sun_out,
                power: &power_out,
                thermal_load: &load_out,
            },
        );
        state.check_finite()?;

        Ok(Self {
            path,
            clock,
            terminator,
            surface,
            speed,
            traversal,
            sun,
            power,
            thermal_load,
            state,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn path(&self) -> &PathCurve {
        self.path
    }

    /// `Some` once the run should stop. A finished path wins over the cap.
    pub fn termination(&self) -> Option<Termination> {
        if self.state.dist_km >= self.path.total_distance() {
            Some(Termination::PathComplete)
        } else if self.clock.at_max_time() {
            Some(Termination::TimeCapReached)
        } else {
            None
        }
    }

    /// Advance one tick and publish the new state
    pub fn step(&mut self) -> Result<&SimulationState> {
        let dt = self.clock.dt_s();
        let prev_phi = self.state.phi_deg;
        let prev_dist = self.state.dist_km;

        let terminator = self.terminator.step(dt);
        let thermal = self
            .surface
            .surface_temperature(&SurfaceThermalInput { phi_deg: prev_phi });
        let speed = self.speed.step(
            &SpeedInput {
                surface_temp_c: thermal.surface_temp_c,
                dist_km: prev_dist,
            },
            dt,
        );
        let traversal = self.traversal.step(
            self.path,
            &TraversalInput {
                speed_mps: speed.speed_mps,
                terminator_longitude_deg: terminator.longitude_deg,
            },
            dt,
        )?;
        let sun = self.sun.compute(&SolarInput {
            position: traversal.position,
            bearing_deg: traversal.bearing_deg,
            terminator_longitude_deg: terminator.longitude_deg,
        });
        let power = self.power.compute(&PowerInput {
            sun_vector: sun.vector,
        });
        let thermal_load = self.thermal_load.compute(&ThermalLoadInput {
            sun_vector: sun.vector,
        });

        let t = self.clock.tick();
        let state = SimulationState::publish(
            self.clock.step_count(),
            t,
            TickOutputs {
                terminator: &terminator,
                thermal: &thermal,
                speed: &speed,
                traversal: &traversal,
                sun: &sun,
                power: &power,
                thermal_load: &thermal_load,
            },
        );
        state.check_finite()?;

        trace!(
            step = state.step,
            dist_km = state.dist_km,
            speed_mps = state.speed_mps,
            temp_c = state.surface_temp_c,
            "tick"
        );
        self.state = state;
        Ok(&self.state)
    }

    /// Step until the path is done or the time cap is hit
    pub fn run(mut self) -> Result<SimulationRun> {
        let total = self.path.total_distance();
        info!(
            "Starting traverse of '{}': {:.3} km, dt = {} s, cap = {:.1} days",
            self.path.name(),
            total,
            self.clock.dt_s(),
            self.clock.max_time_s() / 86_400.0
        );

        let mut series = Vec::with_capacity(self.expected_rows());
        series.push(self.state.clone());
        let termination = loop {
            if let Some(reason) = self.termination() {
                break reason;
            }
            series.push(self.step()?.clone());
        };
        series.shrink_to_fit();

        let summary = RunSummary::from_series(&series, termination, total, self.clock.dt_s());
        match termination {
            Termination::PathComplete => info!(
                "Traverse complete: {:.3} km in {:.2} days ({} ticks)",
                summary.distance_km, summary.elapsed_days, summary.ticks
            ),
            Termination::TimeCapReached => warn!(
                "Time cap of {:.1} days reached at {:.3} of {:.3} km",
                summary.elapsed_days, summary.distance_km, total
            ),
        }

        Ok(SimulationRun {
            route: self.path.name().to_string(),
            termination,
            summary,
            series,
        })
    }

    /// Rows for a full-speed drive to the end of the path, never past the cap
    fn expected_rows(&self) -> usize {
        const MAX_RESERVE: u64 = 1 << 16;
        let per_tick_km = km_travelled(self.speed.max_speed_mps(), self.clock.dt_s());
        let full_speed_ticks = (self.path.total_distance() / per_tick_km).ceil();
        let ticks = if full_speed_ticks.is_finite() {
            (full_speed_ticks as u64).saturating_add(1)
        } else {
            MAX_RESERVE
        };
        (ticks.min(self.clock.remaining_steps()).min(MAX_RESERVE) + 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConstantSurfaceTemperature;
    use planet_geometry::{ReferenceSphere, Waypoint};

    fn equator_path(n: usize, step_deg: f64) -> PathCurve {
        let waypoints: Vec<Waypoint> = (0..n)
            .map(|i| Waypoint::new(0.0, 10.0 + i as f64 * step_deg))
            .collect();
        PathCurve::new("equator", &waypoints, ReferenceSphere::mercury()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let path = equator_path(5, 0.2);
        let sim = Simulation::new(&SimConfig::default(), &path).unwrap();
        let s = sim.state();
        assert_eq!(s.step, 0);
        assert_eq!(s.t_s, 0.0);
        assert_eq!(s.dist_km, 0.0);
        assert_eq!(s.speed_mps, 0.0);
        assert!((s.terminator_lon_deg - 6.5).abs() < 1e-12);
        assert!((s.phi_deg - 86.5).abs() < 1e-9);
        assert_eq!(s.temp_max_c, 55.0);
        // Sun 3.5° up just past sunrise
        assert!((s.sun_elevation_deg - 3.5).abs() < 1e-6);
        assert!(s.power_generated_w > 0.0);
        assert!(sim.termination().is_none());
    }

    #[test]
    fn test_step_advances_clock_and_distance() {
        let path = equator_path(5, 0.2);
        let mut sim = Simulation::with_surface_model(
            &SimConfig::default(),
            &path,
            Box::new(ConstantSurfaceTemperature::new(-100.0)),
        )
        .unwrap();
        let s = sim.step().unwrap().clone();
        assert_eq!(s.step, 1);
        assert_eq!(s.t_s, 300.0);
        assert_eq!(s.speed_mps, 1.6);
        assert!((s.dist_km - 0.48).abs() < 1e-12);
        assert_eq!(sim.clock().step_count(), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let path = equator_path(5, 0.2);
        let mut config = SimConfig::default();
        config.planet.sun_distance_au = 0.9;
        assert_eq!(
            Simulation::new(&config, &path).unwrap_err(),
            SimError::SunDistanceOutOfRange(0.9)
        );
    }

    #[test]
    fn test_rejects_sphere_mismatch() {
        let waypoints = [Waypoint::new(0.0, 0.0), Waypoint::new(0.0, 1.0)];
        let path =
            PathCurve::new("small", &waypoints, ReferenceSphere::new(1000.0).unwrap()).unwrap();
        let err = Simulation::new(&SimConfig::default(), &path).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_series_reservation_follows_path_not_cap() {
        // ~3.4 km at 1.6 m/s and 1 s steps, under a 300 day cap
        let path = equator_path(5, 0.02);
        let mut config = SimConfig::default();
        config.clock.dt_s = 1.0;
        let sim = Simulation::with_surface_model(
            &config,
            &path,
            Box::new(ConstantSurfaceTemperature::new(-50.0)),
        )
        .unwrap();

        let full_speed_ticks = (path.total_distance() / 1.6e-3).ceil() as usize;
        let reserved = sim.expected_rows();
        assert!(reserved >= full_speed_ticks + 1);
        assert!(reserved <= full_speed_ticks + 3);
        assert!((sim.clock().remaining_steps() as usize) > 10 * reserved);

        let run = sim.run().unwrap();
        assert_eq!(run.termination, Termination::PathComplete);
        assert!(run.series.len() <= reserved);
        assert!(run.series.capacity() < 2 * run.series.len());
    }

    #[test]
    fn test_reservation_bounded_by_cap() {
        let path = equator_path(5, 0.2);
        let mut config = SimConfig::default();
        config.clock.max_duration_s = 3_000.0;
        let sim = Simulation::new(&config, &path).unwrap();
        assert_eq!(sim.expected_rows(), 11);
    }

    #[test]
    fn test_hot_start_waits_in_place() {
        let path = equator_path(5, 0.2);
        let mut sim = Simulation::with_surface_model(
            &SimConfig::default(),
            &path,
            Box::new(ConstantSurfaceTemperature::new(120.0)),
        )
        .unwrap();
        for _ in 0..10 {
            let s = sim.step().unwrap();
            assert_eq!(s.speed_mps, 0.0);
            assert_eq!(s.t_excess_s, 300.0);
            assert_eq!(s.dist_km, 0.0);
        }
    }
}
