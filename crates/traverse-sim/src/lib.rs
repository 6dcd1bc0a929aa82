//! Rover Traverse Simulation
//!
//! Fixed-step simulation of a rover driving a polar path on Mercury while the
//! terminator sweeps past it.
//!
//! # Tick order
//!
//! ```text
//! Terminator ─▶ SurfaceThermal(phi[i-1]) ─▶ SpeedControl(T[i], dist[i-1])
//!     ─▶ Traversal(speed[i]) ─▶ SolarGeometry(pos[i], bearing[i]) ─▶ Power / ThermalLoad
//! ```
//!
//! Each model reads an explicit input struct and returns an explicit output
//! struct. [`Simulation`] owns the published [`SimulationState`] and wires the
//! outputs of one model into the inputs of the next.

use planet_geometry::GeometryError;
use thiserror::Error;

pub mod clock;
pub mod config;
pub mod models;
pub mod run;
pub mod simulation;
pub mod state;
pub mod units;

pub use clock::SimulationClock;
pub use config::SimConfig;
pub use run::{RunSummary, SimulationRun, Termination};
pub use simulation::Simulation;
pub use state::SimulationState;

/// Valid planet-sun distance for the surface temperature fit (AU)
pub const SUN_DISTANCE_MIN_AU: f64 = 0.3075;
pub const SUN_DISTANCE_MAX_AU: f64 = 0.4667;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Sun distance {0} AU outside [0.3075, 0.4667]")]
    SunDistanceOutOfRange(f64),
    #[error("Surface temperature {temp_c} °C not reachable at {sun_distance_au} AU")]
    TemperatureUnreachable { temp_c: f64, sun_distance_au: f64 },
    #[error("Non-finite {field} at step {step}")]
    NonFinite { field: &'static str, step: u64 },
}

impl SimError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
