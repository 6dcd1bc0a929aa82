//! Distance integration along the path and the derived angles
//!
//! `alpha` is the rover's longitude offset from the terminator (positive on
//! the day side) and `phi = 90 - alpha` its subsolar angle: 0 at local noon,
//! ±90 on the terminator, 180 at local midnight.

use crate::config::TraversalConfig;
use crate::units::km_travelled;
use crate::Result;
use planet_geometry::{normalize_angle, Location, PathCurve, PathCursor};

/// Remaining distance below which the forward heading window has collapsed
const END_WINDOW_KM: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalInput {
    pub speed_mps: f64,
    pub terminator_longitude_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalOutput {
    pub dist_km: f64,
    pub position: Location,
    pub bearing_deg: f64,
    pub alpha_deg: f64,
    pub phi_deg: f64,
}

/// `(alpha, phi)` for a rover at `longitude_deg`
pub fn terminator_angles(longitude_deg: f64, terminator_longitude_deg: f64) -> (f64, f64) {
    let alpha = normalize_angle(longitude_deg - terminator_longitude_deg);
    (alpha, normalize_angle(90.0 - alpha))
}

#[derive(Debug, Clone)]
pub struct TraversalModel {
    lookahead_km: f64,
    dist_km: f64,
    position: Location,
    bearing_deg: f64,
    alpha_deg: f64,
    phi_deg: f64,
    cursor: PathCursor,
    lookahead_cursor: PathCursor,
}

impl TraversalModel {
    /// Rover parked on the first waypoint
    pub fn new(
        path: &PathCurve,
        config: &TraversalConfig,
        terminator_longitude_deg: f64,
    ) -> Result<Self> {
        let position = *path.start();
        let (alpha_deg, phi_deg) = terminator_angles(position.lon, terminator_longitude_deg);
        let mut model = Self {
            lookahead_km: config.lookahead_km,
            dist_km: 0.0,
            position,
            bearing_deg: 0.0,
            alpha_deg,
            phi_deg,
            cursor: PathCursor::default(),
            lookahead_cursor: PathCursor::default(),
        };
        model.bearing_deg = model.heading(path)?;
        Ok(model)
    }

    pub fn output(&self) -> TraversalOutput {
        TraversalOutput {
            dist_km: self.dist_km,
            position: self.position,
            bearing_deg: self.bearing_deg,
            alpha_deg: self.alpha_deg,
            phi_deg: self.phi_deg,
        }
    }

    pub fn step(
        &mut self,
        path: &PathCurve,
        input: &TraversalInput,
        dt_s: f64,
    ) -> Result<TraversalOutput> {
        let total = path.total_distance();
        self.dist_km = (self.dist_km + km_travelled(input.speed_mps, dt_s)).min(total);
        self.position = path.point_at_distance_with(self.dist_km, &mut self.cursor)?;

        let (alpha, phi) = terminator_angles(self.position.lon, input.terminator_longitude_deg);
        self.alpha_deg = alpha;
        self.phi_deg = phi;
        self.bearing_deg = self.heading(path)?;
        Ok(self.output())
    }

    /// Bearing across a window of `lookahead_km`. Once the window would run
    /// past the end it is pinned to `[total - lookahead, total]`.
    fn heading(&mut self, path: &PathCurve) -> Result<f64> {
        let total = path.total_distance();
        let ahead = self.dist_km + self.lookahead_km;

        if ahead <= total && total - self.dist_km > END_WINDOW_KM {
            let target = path.point_at_distance_with(ahead, &mut self.lookahead_cursor)?;
            return Ok(self.position.bearing_to(&target));
        }

        let from = path.point_at_distance((total - self.lookahead_km).max(0.0))?;
        let to = path.point_at_distance(total)?;
        Ok(from.bearing_to(&to))
    }
}
