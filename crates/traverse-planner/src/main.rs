//! Rover Traverse CLI
//!
//! Simulates a rover driving a digitized polar route ahead of the terminator.
//!
//! Usage:
//!   rover-traverse --paths data/south_pole_traverse.json \
//!                  --config traverse.json \
//!                  --output traverse_run.json

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use traverse_planner::{load_config, load_route, simulate, write_report, TraverseReport, DEFAULT_ROUTE_FILE};
use traverse_sim::models::ThermalBand;
use traverse_sim::units::days_to_seconds;
use traverse_sim::SimConfig;

#[derive(Parser, Debug)]
#[command(
    name = "rover-traverse",
    about = "Simulate a thermally constrained rover traverse on Mercury"
)]
struct Args {
    /// Route file with named segments
    #[arg(short, long, default_value = DEFAULT_ROUTE_FILE)]
    paths: PathBuf,

    /// Simulation config (JSON); defaults apply to anything not set
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON report
    #[arg(short, long, default_value = "traverse_run.json")]
    output: PathBuf,

    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Safety cap on simulated time, in Earth days
    #[arg(long)]
    max_days: Option<f64>,

    /// Replace the surface model with a fixed temperature (°C)
    #[arg(long, allow_hyphen_values = true)]
    fixed_surface_temp: Option<f64>,

    /// Write the summary without the per-tick series
    #[arg(long)]
    summary_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("Rover Traverse Simulator");
    info!("{}", "=".repeat(60));

    // Configuration
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(dt) = args.dt {
        config.clock.dt_s = dt;
    }
    if let Some(days) = args.max_days {
        config.clock.max_duration_s = days_to_seconds(days);
    }
    config.validate()?;
    let sphere = config.planet.sphere()?;

    // Route
    let route = load_route(&args.paths)?;
    if route.skipped > 0 {
        warn!("{} waypoints skipped for bad coordinates", route.skipped);
    }
    let stats = route.segment_stats(sphere)?;
    info!("\nSegments:");
    for s in &stats {
        info!(
            "  {:10} | {:3} pts | {:8.2} km | lat [{:7.2}, {:7.2}] | lon [{:8.2}, {:8.2}]",
            s.name, s.waypoints, s.length_km, s.lat_min, s.lat_max, s.lon_min, s.lon_max
        );
    }
    let path = route.assemble(sphere)?;

    // Thermal band at the start
    let start_lat = path.start().lat;
    let band = ThermalBand::new(config.speed.temp_max_c, start_lat, &config.planet)?;
    info!(
        "\nThermal band at {:.2}° for {:.1} °C: |phi| >= {:.2}°, {:.1} km wide, terminator {:.3} m/s",
        start_lat,
        band.ceiling_c,
        band.min_subsolar_angle_deg,
        band.width_km,
        band.terminator_speed_mps
    );
    if !band.can_keep_pace(config.speed.max_speed_mps) {
        warn!("Rover top speed is below the terminator ground speed at the start");
    }

    // Run
    let run = simulate(&config, &path, args.fixed_surface_temp)?;

    // Write output
    let mut report = TraverseReport::new(&path, &config, &stats, &run, args.fixed_surface_temp)
        .with_thermal_band(band);
    if args.summary_only {
        report = report.summary_only();
    }
    write_report(&args.output, &report)?;

    // Summary
    let summary = &run.summary;
    info!("\n{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Route:            {}", run.route);
    info!("Termination:      {}", run.termination);
    info!(
        "Distance:         {:.2} / {:.2} km ({:.1}%)",
        summary.distance_km,
        summary.path_length_km,
        100.0 * summary.completion_fraction()
    );
    info!("Elapsed:          {:.2} days ({} ticks)", summary.elapsed_days, summary.ticks);
    info!("Mean speed:       {:.3} m/s", summary.mean_speed_mps);
    info!("Throttle loss:    {:.2} days", summary.total_excess_s / 86_400.0);
    info!("Stopped:          {:.2} days", summary.stopped_s / 86_400.0);
    info!(
        "Surface temp:     {:.1} .. {:.1} °C",
        summary.min_surface_temp_c, summary.max_surface_temp_c
    );
    info!("Max sun elev:     {:.2}°", summary.max_sun_elevation_deg);
    info!("Energy generated: {:.1} Wh", summary.energy_generated_wh);
    info!("Peak sun load:    {:.1} W", summary.peak_thermal_power_w);

    Ok(())
}
