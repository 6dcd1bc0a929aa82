//! Fixed-step simulation clock

use crate::config::ClockConfig;
use crate::{Result, SimError};
use serde::Serialize;

/// Fixed time step plus a safety cap on simulated time.
///
/// Time is derived from the step count rather than accumulated, so a run of
/// `n` ticks always lands on exactly `n · dt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationClock {
    dt_s: f64,
    step_count: u64,
    max_time_s: f64,
}

impl SimulationClock {
    pub fn new(dt_s: f64, max_time_s: f64) -> Result<Self> {
        if !(dt_s.is_finite() && dt_s > 0.0) {
            return Err(SimError::config(format!("time step must be positive, got {}", dt_s)));
        }
        if !(max_time_s.is_finite() && max_time_s >= dt_s) {
            return Err(SimError::config(format!(
                "max time {} s is shorter than one step of {} s",
                max_time_s, dt_s
            )));
        }
        Ok(Self {
            dt_s,
            step_count: 0,
            max_time_s,
        })
    }

    pub fn from_config(config: &ClockConfig) -> Result<Self> {
        Self::new(config.dt_s, config.max_duration_s)
    }

    pub fn dt_s(&self) -> f64 {
        self.dt_s
    }

    pub fn time_s(&self) -> f64 {
        self.step_count as f64 * self.dt_s
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn max_time_s(&self) -> f64 {
        self.max_time_s
    }

    /// Check if the safety cap has been reached
    pub fn at_max_time(&self) -> bool {
        self.time_s() >= self.max_time_s
    }

    /// Advance by one step and return the new time
    pub fn tick(&mut self) -> f64 {
        self.step_count += 1;
        self.time_s()
    }

    /// Ticks left before the cap, rounding up
    pub fn remaining_steps(&self) -> u64 {
        let remaining = (self.max_time_s - self.time_s()).max(0.0);
        (remaining / self.dt_s).ceil() as u64
    }
}
