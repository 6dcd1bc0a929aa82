//! Data loading from JSON files

use crate::{PlannerError, Result};
use planet_geometry::{assemble_route, PathCurve, PathSegment, ReferenceSphere, SegmentStats, Waypoint};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;
use traverse_sim::SimConfig;

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// Raw segment from JSON; waypoints are `[lat, lon]` pairs
#[derive(Debug, Deserialize)]
struct RawSegment {
    name: Option<String>,
    #[serde(default)]
    waypoints: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct RawRouteFile {
    order: Option<Vec<String>>,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

/// Cleaned segments plus the order to join them in
#[derive(Debug, Clone)]
pub struct Route {
    pub segments: Vec<PathSegment>,
    pub order: Vec<String>,
    /// Waypoints dropped for malformed or out-of-range coordinates
    pub skipped: usize,
}

impl Route {
    /// Join the segments into one arc-length parametrized path
    pub fn assemble(&self, sphere: ReferenceSphere) -> Result<PathCurve> {
        Ok(assemble_route(&self.segments, &self.order, sphere)?)
    }

    /// Statistics for each segment named in `order`, in that order
    pub fn segment_stats(&self, sphere: ReferenceSphere) -> Result<Vec<SegmentStats>> {
        self.order
            .iter()
            .filter_map(|name| self.segments.iter().find(|s| &s.name == name))
            .map(|s| Ok(s.stats(sphere)?))
            .collect()
    }
}

fn parse_waypoint(raw: &[Option<f64>]) -> Option<Waypoint> {
    match raw {
        [Some(lat), Some(lon)] if is_valid_latitude(*lat) && is_valid_longitude(*lon) => {
            Some(Waypoint::new(*lat, *lon))
        }
        _ => None,
    }
}

/// Load a route file
pub fn load_route(path: impl AsRef<Path>) -> Result<Route> {
    let path = path.as_ref();
    info!("Loading route from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: RawRouteFile = serde_json::from_reader(reader)?;

    if raw.segments.is_empty() {
        return Err(PlannerError::NoSegments(path.to_path_buf()));
    }

    let mut segments = Vec::with_capacity(raw.segments.len());
    let mut names = HashSet::new();
    let mut skipped = 0;

    for (i, segment) in raw.segments.into_iter().enumerate() {
        let name = segment.name.unwrap_or_else(|| format!("segment-{}", i));
        if !names.insert(name.clone()) {
            return Err(PlannerError::DuplicateSegment(name));
        }

        let mut waypoints = Vec::with_capacity(segment.waypoints.len());
        for raw_point in &segment.waypoints {
            match parse_waypoint(raw_point) {
                Some(w) => waypoints.push(w),
                None => skipped += 1,
            }
        }
        segments.push(PathSegment::new(name, waypoints));
    }

    let order = raw
        .order
        .unwrap_or_else(|| segments.iter().map(|s| s.name.clone()).collect());

    info!(
        "Loaded {} segments, {} waypoints ({} skipped for bad coords)",
        segments.len(),
        segments.iter().map(|s| s.waypoints.len()).sum::<usize>(),
        skipped
    );

    Ok(Route {
        segments,
        order,
        skipped,
    })
}

/// Load and validate a simulation config. Missing fields take defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimConfig> {
    let path = path.as_ref();
    info!("Loading config from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: SimConfig = serde_json::from_reader(reader)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planet_geometry::GeometryError;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use traverse_sim::SimError;

    fn write_json(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_route() {
        let file = write_json(
            r#"{
                "order": ["B", "A"],
                "segments": [
                    {"name": "A", "waypoints": [[-40.0, 10.0], [-40.5, 11.0]]},
                    {"name": "B", "waypoints": [[-39.0, 8.0], [-40.0, 10.0]]}
                ]
            }"#,
        );

        let route = load_route(file.path()).unwrap();
        assert_eq!(route.segments.len(), 2);
        assert_eq!(route.order, vec!["B", "A"]);
        assert_eq!(route.skipped, 0);

        let path = route.assemble(ReferenceSphere::mercury()).unwrap();
        // Shared joint counted once
        assert_eq!(path.sections(), 3);
        assert_eq!(path.name(), "B → A");
    }

    #[test]
    fn test_order_defaults_to_file_order() {
        let file = write_json(
            r#"{"segments": [
                {"name": "first", "waypoints": [[0.0, 0.0], [0.0, 1.0]]},
                {"name": "second", "waypoints": [[0.0, 1.0], [0.0, 2.0]]}
            ]}"#,
        );
        let route = load_route(file.path()).unwrap();
        assert_eq!(route.order, vec!["first", "second"]);
    }

    #[test]
    fn test_skips_bad_waypoints() {
        let file = write_json(
            r#"{"segments": [{"name": "S", "waypoints": [
                [-40.0, 10.0], [-95.0, 10.0], [null, 11.0], [-40.0], [-40.0, 200.0], [-41.0, 11.0]
            ]}]}"#,
        );
        let route = load_route(file.path()).unwrap();
        assert_eq!(route.skipped, 4);
        assert_eq!(route.segments[0].waypoints.len(), 2);
    }

    #[test]
    fn test_unnamed_segments_get_index_names() {
        let file = write_json(r#"{"segments": [{"waypoints": [[0.0, 0.0], [0.0, 1.0]]}]}"#);
        let route = load_route(file.path()).unwrap();
        assert_eq!(route.segments[0].name, "segment-0");
    }

    #[test]
    fn test_rejects_empty_and_duplicate_segments() {
        let file = write_json(r#"{"segments": []}"#);
        assert!(matches!(
            load_route(file.path()),
            Err(PlannerError::NoSegments(_))
        ));

        let file = write_json(
            r#"{"segments": [
                {"name": "A", "waypoints": [[0.0, 0.0], [0.0, 1.0]]},
                {"name": "A", "waypoints": [[0.0, 1.0], [0.0, 2.0]]}
            ]}"#,
        );
        assert!(matches!(
            load_route(file.path()),
            Err(PlannerError::DuplicateSegment(name)) if name == "A"
        ));
    }

    #[test]
    fn test_unknown_segment_in_order() {
        let file = write_json(
            r#"{"order": ["A", "Z"], "segments": [{"name": "A", "waypoints": [[0.0, 0.0], [0.0, 1.0]]}]}"#,
        );
        let route = load_route(file.path()).unwrap();
        assert!(matches!(
            route.assemble(ReferenceSphere::mercury()),
            Err(PlannerError::Geometry(GeometryError::UnknownSegment(name))) if name == "Z"
        ));
    }

    #[test]
    fn test_segment_stats_follow_order() {
        let file = write_json(
            r#"{"order": ["B", "A"], "segments": [
                {"name": "A", "waypoints": [[0.0, 1.0], [0.0, 2.0]]},
                {"name": "B", "waypoints": [[0.0, 0.0], [0.0, 1.0]]}
            ]}"#,
        );
        let route = load_route(file.path()).unwrap();
        let stats = route.segment_stats(ReferenceSphere::mercury()).unwrap();
        assert_eq!(stats[0].name, "B");
        assert_eq!(stats[1].name, "A");
        assert!((stats[0].length_km - ReferenceSphere::mercury().parallel_km_per_deg(0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_load_config_partial() {
        let file = write_json(r#"{"clock": {"dt_s": 120.0}}"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.clock.dt_s, 120.0);
        assert_eq!(config.speed, SimConfig::default().speed);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let file = write_json(r#"{"planet": {"sun_distance_au": 1.0}}"#);
        assert!(matches!(
            load_config(file.path()),
            Err(PlannerError::Sim(SimError::SunDistanceOutOfRange(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_route("/nonexistent/route.json"),
            Err(PlannerError::Io(_))
        ));
    }
}
