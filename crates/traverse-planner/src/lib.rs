//! Traverse Planner
//!
//! Loads a digitized route and a simulation config, runs the traverse and
//! writes a JSON report.
//!
//! # Route file
//!
//! ```json
//! {
//!   "order": ["Beta", "Alpha_3"],
//!   "segments": [
//!     { "name": "Beta", "waypoints": [[-43.42, -78.01], [-42.77, -75.41]] },
//!     { "name": "Alpha_3", "waypoints": [[-40.75, 64.92], [-41.10, 66.30]] }
//!   ]
//! }
//! ```
//!
//! Waypoints are `[lat, lon]` in degrees. Without `order`, segments are
//! joined in file order.

use planet_geometry::{GeometryError, PathCurve};
use std::path::PathBuf;
use thiserror::Error;
use traverse_sim::models::ConstantSurfaceTemperature;
use traverse_sim::{SimConfig, SimError, Simulation, SimulationRun};

pub mod loader;
pub mod report;

pub use loader::{load_config, load_route, Route};
pub use report::{write_report, ReportMetadata, TraverseReport};

/// Default route shipped with the repository
pub const DEFAULT_ROUTE_FILE: &str = "data/south_pole_traverse.json";

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
    #[error("No segments in route file {0:?}")]
    NoSegments(PathBuf),
    #[error("Segment name used twice: {0}")]
    DuplicateSegment(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Run one traverse, optionally with a fixed surface temperature in °C
pub fn simulate(
    config: &SimConfig,
    path: &PathCurve,
    fixed_surface_temp_c: Option<f64>,
) -> Result<SimulationRun> {
    let sim = match fixed_surface_temp_c {
        Some(temp_c) => Simulation::with_surface_model(
            config,
            path,
            Box::new(ConstantSurfaceTemperature::new(temp_c)),
        )?,
        None => Simulation::new(config, path)?,
    };
    Ok(sim.run()?)
}
