//! Traverse paths parametrized by travelled distance
//!
//! A `PathCurve` is built once from cleaned waypoints and only queried after
//! that. Named segments are joined into one route by `assemble_route`.

use crate::spline::{Interpolation, SplineCurve3};
use crate::{GeometryError, Location, ReferenceSphere, Result, JOINT_TOLERANCE_KM};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A cleaned (latitude, longitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Named, ordered run of waypoints in traversal direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSegment {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
}

/// Summary of a single segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentStats {
    pub name: String,
    pub waypoints: usize,
    pub length_km: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl PathSegment {
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            name: name.into(),
            waypoints,
        }
    }

    fn locations(&self, sphere: ReferenceSphere) -> Result<Vec<Location>> {
        self.waypoints
            .iter()
            .map(|w| Location::new(w.lat, w.lon, sphere))
            .collect()
    }

    /// Great-circle length and bounding box
    pub fn stats(&self, sphere: ReferenceSphere) -> Result<SegmentStats> {
        let points = self.locations(sphere)?;
        let length_km = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();

        let fold = |init: f64, f: fn(f64, f64) -> f64, get: fn(&Location) -> f64| {
            points.iter().map(get).fold(init, f)
        };

        Ok(SegmentStats {
            name: self.name.clone(),
            waypoints: points.len(),
            length_km,
            lat_min: fold(f64::INFINITY, f64::min, |p| p.lat),
            lat_max: fold(f64::NEG_INFINITY, f64::max, |p| p.lat),
            lon_min: fold(f64::INFINITY, f64::min, |p| p.lon),
            lon_max: fold(f64::NEG_INFINITY, f64::max, |p| p.lon),
        })
    }
}

/// Segment memory for monotone distance queries
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCursor {
    segment: usize,
}

/// Interpolating curve through the waypoints, keyed by cumulative
/// great-circle distance in km
#[derive(Debug, Clone)]
pub struct PathCurve {
    name: String,
    sphere: ReferenceSphere,
    points: Vec<Location>,
    dists: Vec<f64>,
    curve: SplineCurve3,
}

impl PathCurve {
    pub fn new(name: impl Into<String>, waypoints: &[Waypoint], sphere: ReferenceSphere) -> Result<Self> {
        let locations = waypoints
            .iter()
            .map(|w| Location::new(w.lat, w.lon, sphere))
            .collect::<Result<Vec<_>>>()?;
        Self::from_locations(name, locations, sphere)
    }

    /// Build from locations. Consecutive waypoints closer than
    /// `JOINT_TOLERANCE_KM` are collapsed so the distance table stays
    /// strictly increasing.
    pub fn from_locations(
        name: impl Into<String>,
        locations: Vec<Location>,
        sphere: ReferenceSphere,
    ) -> Result<Self> {
        let name = name.into();

        let mut points: Vec<Location> = Vec::with_capacity(locations.len());
        let mut dists: Vec<f64> = Vec::with_capacity(locations.len());
        for loc in locations {
            match points.last() {
                None => dists.push(0.0),
                Some(prev) => {
                    let step = sphere.distance_km(prev, &loc);
                    if step < JOINT_TOLERANCE_KM {
                        debug!("{}: dropping duplicate waypoint ({}, {})", name, loc.lat, loc.lon);
                        continue;
                    }
                    dists.push(dists[dists.len() - 1] + step);
                }
            }
            points.push(loc);
        }

        if points.len() < 2 {
            return Err(GeometryError::InsufficientWaypoints {
                name,
                count: points.len(),
            });
        }
        let total = dists[dists.len() - 1];
        if !(total > 0.0 && total.is_finite()) {
            return Err(GeometryError::ZeroLength(name));
        }

        let xyzs: Vec<_> = points.iter().map(|p| *p.xyz()).collect();
        let curve = SplineCurve3::fit(&dists, &xyzs)?;

        Ok(Self {
            name,
            sphere,
            points,
            dists,
            curve,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sphere(&self) -> ReferenceSphere {
        self.sphere
    }

    pub fn points(&self) -> &[Location] {
        &self.points
    }

    /// Number of waypoints after duplicate removal
    pub fn sections(&self) -> usize {
        self.points.len()
    }

    pub fn cumulative_distances(&self) -> &[f64] {
        &self.dists
    }

    pub fn interpolation(&self) -> Interpolation {
        self.curve.kind()
    }

    pub fn total_distance(&self) -> f64 {
        self.dists[self.dists.len() - 1]
    }

    pub fn start(&self) -> &Location {
        &self.points[0]
    }

    /// Position after travelling `dist_km`. Defined on
    /// `[0, total_distance()]`; outside that range the end cubic extrapolates.
    pub fn point_at_distance(&self, dist_km: f64) -> Result<Location> {
        Location::from_cartesian(&self.curve.evaluate(dist_km), self.sphere)
    }

    /// Same as `point_at_distance`, reusing the cursor's last segment
    pub fn point_at_distance_with(&self, dist_km: f64, cursor: &mut PathCursor) -> Result<Location> {
        let xyz = self.curve.evaluate_from(dist_km, &mut cursor.segment);
        Location::from_cartesian(&xyz, self.sphere)
    }

    pub fn clamp_distance(&self, dist_km: f64) -> f64 {
        dist_km.clamp(0.0, self.total_distance())
    }

    pub fn point_at_distance_clamped(&self, dist_km: f64) -> Result<Location> {
        self.point_at_distance(self.clamp_distance(dist_km))
    }
}

/// Join named segments in `order` into one path.
///
/// A segment whose first waypoint coincides with the previous segment's last
/// waypoint contributes that shared point only once.
pub fn assemble_route(
    segments: &[PathSegment],
    order: &[String],
    sphere: ReferenceSphere,
) -> Result<PathCurve> {
    if order.is_empty() {
        return Err(GeometryError::EmptyRoute);
    }

    let mut locations: Vec<Location> = Vec::new();
    for name in order {
        let segment = segments
            .iter()
            .find(|s| &s.name == name)
            .ok_or_else(|| GeometryError::UnknownSegment(name.clone()))?;

        let mut points = segment.locations(sphere)?.into_iter().peekable();
        if let (Some(last), Some(first)) = (locations.last(), points.peek()) {
            if sphere.distance_km(last, first) < JOINT_TOLERANCE_KM {
                debug!("Joint at start of {}: shared endpoint de-duplicated", name);
                points.next();
            }
        }
        locations.extend(points);
    }

    let route_name = order.join(" → ");
    let path = PathCurve::from_locations(route_name, locations, sphere)?;

    info!(
        "Assembled route '{}': {} waypoints, {:.3} km",
        path.name(),
        path.sections(),
        path.total_distance()
    );

    Ok(path)
}
