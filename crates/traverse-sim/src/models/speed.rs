//! Temperature-throttled speed control
//!
//! Proportional throttle below a temperature ceiling:
//!
//! ```text
//! speed
//!   vmax ┤━━━━━━━━━━━┓
//!        │            ╲
//!        │             ╲
//!      0 ┤              ┗━━━━━━━━
//!        └───────────┬───┬──────── surface temp
//!               temp_p_min  temp_max
//! ```
//!
//! The ceiling is raised inside cold-zone windows.

use crate::config::SpeedConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedInput {
    pub surface_temp_c: f64,
    /// Distance travelled as of the previous tick
    pub dist_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedOutput {
    pub speed_mps: f64,
    /// Time lost to throttling this tick
    pub t_excess_s: f64,
    pub temp_max_c: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedControlModel {
    config: SpeedConfig,
    speed_mps: f64,
    t_excess_s: f64,
    temp_max_c: f64,
}

impl SpeedControlModel {
    /// Starts at rest with the ceiling for distance zero
    pub fn new(config: &SpeedConfig) -> Self {
        let mut model = Self {
            config: config.clone(),
            speed_mps: 0.0,
            t_excess_s: 0.0,
            temp_max_c: config.temp_max_c,
        };
        model.temp_max_c = model.target_temp_max(0.0);
        model
    }

    pub fn max_speed_mps(&self) -> f64 {
        self.config.max_speed_mps
    }

    /// Ceiling at `dist_km`: raised when inside any cold-zone window
    pub fn target_temp_max(&self, dist_km: f64) -> f64 {
        let lead = self.config.cold_zone_lead_factor;
        let in_cold_zone = self.config.cold_zones.iter().any(|zone| {
            let (start, end) = zone.window(lead);
            (start..=end).contains(&dist_km)
        });
        if in_cold_zone {
            self.config.cold_zone_temp_max_c
        } else {
            self.config.temp_max_c
        }
    }

    /// Throttled speed for a surface temperature under a given ceiling
    pub fn commanded_speed(&self, surface_temp_c: f64, temp_max_c: f64) -> f64 {
        let band = self.config.temp_p_range_c;
        let temp_p_min = temp_max_c - band;
        let vmax = self.config.max_speed_mps;

        if surface_temp_c > temp_max_c {
            0.0
        } else if surface_temp_c > temp_p_min {
            (1.0 - (surface_temp_c - temp_p_min) / band) * vmax
        } else {
            vmax
        }
    }

    pub fn output(&self) -> SpeedOutput {
        SpeedOutput {
            speed_mps: self.speed_mps,
            t_excess_s: self.t_excess_s,
            temp_max_c: self.temp_max_c,
        }
    }

    pub fn step(&mut self, input: &SpeedInput, dt_s: f64) -> SpeedOutput {
        self.temp_max_c = self.target_temp_max(input.dist_km);
        self.speed_mps = self.commanded_speed(input.surface_temp_c, self.temp_max_c);
        self.t_excess_s = (1.0 - self.speed_mps / self.config.max_speed_mps) * dt_s;
        self.output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColdZone;
    use fuzz_harness::prelude::*;

    fn model() -> SpeedControlModel {
        SpeedControlModel::new(&SpeedConfig::default())
    }

    fn step(model: &mut SpeedControlModel, temp: f64) -> SpeedOutput {
        model.step(
            &SpeedInput {
                surface_temp_c: temp,
                dist_km: 0.0,
            },
            300.0,
        )
    }

    #[test]
    fn test_starts_at_rest() {
        let out = model().output();
        assert_eq!(out.speed_mps, 0.0);
        assert_eq!(out.t_excess_s, 0.0);
        assert_eq!(out.temp_max_c, 55.0);
    }

    #[test]
    fn test_far_above_ceiling_stops() {
        let mut m = model();
        let out = step(&mut m, 200.0);
        assert_eq!(out.speed_mps, 0.0);
        assert_eq!(out.t_excess_s, 300.0);
    }

    #[test]
    fn test_far_below_band_full_speed() {
        let mut m = model();
        let out = step(&mut m, -150.0);
        assert_eq!(out.speed_mps, 1.6);
        assert_eq!(out.t_excess_s, 0.0);
    }

    #[test]
    fn test_band_edges() {
        let mut m = model();
        // Exactly at the ceiling the throttle is fully closed
        assert_eq!(step(&mut m, 55.0).speed_mps, 0.0);
        // Exactly at the bottom of the band it is fully open
        assert_eq!(step(&mut m, 50.0).speed_mps, 1.6);
    }

    #[test]
    fn test_mid_band_is_proportional() {
        let mut m = model();
        let out = step(&mut m, 52.5);
        assert!((out.speed_mps - 0.8).abs() < 1e-12);
        assert!((out.t_excess_s - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_cold_zone_window_raises_ceiling() {
        let config = SpeedConfig {
            cold_zones: vec![ColdZone::new(40.0, 55.0)],
            ..SpeedConfig::default()
        };
        let m = SpeedControlModel::new(&config);
        assert_eq!(m.target_temp_max(5.0), 55.0);
        assert_eq!(m.target_temp_max(10.0), 65.0);
        assert_eq!(m.target_temp_max(30.0), 65.0);
        assert_eq!(m.target_temp_max(55.0), 65.0);
        assert_eq!(m.target_temp_max(55.1), 55.0);
    }

    #[test]
    fn test_cold_zone_lets_rover_drive_hotter() {
        let config = SpeedConfig {
            cold_zones: vec![ColdZone::new(40.0, 55.0)],
            ..SpeedConfig::default()
        };
        let mut m = SpeedControlModel::new(&config);
        let input = SpeedInput {
            surface_temp_c: 58.0,
            dist_km: 45.0,
        };
        let out = m.step(&input, 300.0);
        assert_eq!(out.temp_max_c, 65.0);
        assert_eq!(out.speed_mps, 1.6);
    }

    proptest! {
        #[test]
        fn fuzz_speed_non_increasing_in_temperature(a in surface_temp_c(), b in surface_temp_c()) {
            let m = model();
            let (cool, hot) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(m.commanded_speed(cool, 55.0) >= m.commanded_speed(hot, 55.0));
        }

        #[test]
        fn fuzz_speed_and_excess_bounded(t in surface_temp_c(), dt in 1.0f64..3600.0) {
            let mut m = model();
            let out = m.step(&SpeedInput { surface_temp_c: t, dist_km: 0.0 }, dt);
            prop_assert!((0.0..=1.6).contains(&out.speed_mps));
            prop_assert!(out.t_excess_s >= -1e-9 && out.t_excess_s <= dt + 1e-9);
        }
    }
}
