//! JSON run report

use crate::Result;
use planet_geometry::spline::Interpolation;
use planet_geometry::{PathCurve, SegmentStats};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;
use traverse_sim::models::ThermalBand;
use traverse_sim::{RunSummary, SimConfig, SimulationRun, SimulationState, Termination};

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub route: String,
    pub waypoints: usize,
    pub path_length_km: f64,
    pub interpolation: Interpolation,
    pub termination: Termination,
    /// Set when the run used a fixed surface temperature
    pub fixed_surface_temp_c: Option<f64>,
    pub generated_at: String,
}

/// Everything written for one run
#[derive(Debug, Serialize)]
pub struct TraverseReport<'a> {
    pub metadata: ReportMetadata,
    pub config: &'a SimConfig,
    pub segments: &'a [SegmentStats],
    pub thermal_band: Option<ThermalBand>,
    pub summary: &'a RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<&'a [SimulationState]>,
}

impl<'a> TraverseReport<'a> {
    pub fn new(
        path: &PathCurve,
        config: &'a SimConfig,
        segments: &'a [SegmentStats],
        run: &'a SimulationRun,
        fixed_surface_temp_c: Option<f64>,
    ) -> Self {
        let metadata = ReportMetadata {
            route: run.route.clone(),
            waypoints: path.sections(),
            path_length_km: path.total_distance(),
            interpolation: path.interpolation(),
            termination: run.termination,
            fixed_surface_temp_c,
            generated_at: chrono::Utc::now().to_rfc3339(),
        };
        Self {
            metadata,
            config,
            segments,
            thermal_band: None,
            summary: &run.summary,
            series: Some(&run.series),
        }
    }

    pub fn with_thermal_band(mut self, band: ThermalBand) -> Self {
        self.thermal_band = Some(band);
        self
    }

    /// Drop the per-tick series and keep only the aggregates
    pub fn summary_only(mut self) -> Self {
        self.series = None;
        self
    }
}

pub fn write_report(path: impl AsRef<Path>, report: &TraverseReport<'_>) -> Result<()> {
    let path = path.as_ref();
    info!("Writing report to {:?}", path);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate;
    use planet_geometry::{ReferenceSphere, Waypoint};
    use tempfile::tempdir;

    fn short_path() -> PathCurve {
        let waypoints: Vec<Waypoint> = (0..5).map(|i| Waypoint::new(-45.0, 10.0 + 0.02 * i as f64)).collect();
        PathCurve::new("short", &waypoints, ReferenceSphere::mercury()).unwrap()
    }

    #[test]
    fn test_report_round_trip() {
        let path = short_path();
        let config = SimConfig::default();
        let run = simulate(&config, &path, Some(-50.0)).unwrap();
        let stats: Vec<SegmentStats> = Vec::new();
        let report = TraverseReport::new(&path, &config, &stats, &run, Some(-50.0));

        let dir = tempdir().unwrap();
        let out = dir.path().join("run.json");
        write_report(&out, &report).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["metadata"]["route"], "short");
        assert_eq!(json["metadata"]["termination"], "path_complete");
        assert_eq!(json["metadata"]["interpolation"], serde_json::to_value(Interpolation::NotAKnotCubic).unwrap());
        assert_eq!(json["metadata"]["fixed_surface_temp_c"], -50.0);
        assert!(json["metadata"]["generated_at"].as_str().unwrap().contains('T'));
        assert_eq!(json["series"].as_array().unwrap().len(), run.series.len());
        assert_eq!(json["config"]["clock"]["dt_s"], 300.0);
        assert!(json["thermal_band"].is_null());
    }

    #[test]
    fn test_summary_only_omits_series() {
        let path = short_path();
        let config = SimConfig::default();
        let run = simulate(&config, &path, Some(-50.0)).unwrap();
        let band = ThermalBand::new(55.0, -45.0, &config.planet).unwrap();
        let report = TraverseReport::new(&path, &config, &[], &run, None)
            .with_thermal_band(band)
            .summary_only();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("series").is_none());
        assert!(json["metadata"]["fixed_surface_temp_c"].is_null());
        assert_eq!(json["summary"]["termination"], "path_complete");
        assert!(json["thermal_band"]["width_km"].as_f64().unwrap() > 0.0);
    }
}
