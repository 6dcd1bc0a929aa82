//! Physical models advanced once per tick
//!
//! Every model takes a plain input struct and returns a plain output struct.
//! None of them sees the others or the published state directly.

pub mod panel;
pub mod power;
pub mod solar;
pub mod speed;
pub mod surface_thermal;
pub mod terminator;
pub mod thermal_load;
pub mod traversal;

pub use panel::Panel;
pub use power::{PowerInput, PowerModel, PowerOutput};
pub use solar::{SolarGeometryModel, SolarInput, SunOutput};
pub use speed::{SpeedControlModel, SpeedInput, SpeedOutput};
pub use surface_thermal::{
    ConstantSurfaceTemperature, RadiativeSurfaceModel, SurfaceTemperature, SurfaceThermalInput,
    SurfaceThermalOutput, ThermalBand,
};
pub use terminator::{TerminatorModel, TerminatorOutput};
pub use thermal_load::{ThermalLoadInput, ThermalLoadModel, ThermalLoadOutput};
pub use traversal::{TraversalInput, TraversalModel, TraversalOutput};
