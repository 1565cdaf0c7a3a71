//! Render a polar star chart for a place and time and write it as PNG.
//!
//! The place name is geocoded through Nominatim; if that fails the chart is
//! drawn for the configured fallback observer and a warning is printed.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use skychart::shared_args::ObservationArgs;
use skychart::{ChartRequest, ConfigStorage, SkyChartConfig, StarChartPipeline};

#[derive(Parser, Debug)]
#[command(
    name = "Star Chart Renderer",
    about = "Draws the visible sky for a place and time as a polar altitude-azimuth chart",
    long_about = None
)]
struct Args {
    /// Place name to chart the sky for
    #[arg(long, default_value = "Beijing")]
    location: String,

    #[command(flatten)]
    observation: ObservationArgs,

    /// Leave the background transparent instead of night-sky navy
    #[arg(long)]
    transparent: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "star_chart.png")]
    output: PathBuf,

    /// Configuration file (defaults to ~/.skychart/config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Faintest magnitude to draw, overriding the configuration
    #[arg(long)]
    limiting_magnitude: Option<f64>,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SkyChartConfig> {
    if let Some(path) = path {
        return SkyChartConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()));
    }

    match ConfigStorage::new().ok().and_then(|storage| {
        let path = storage.config_path();
        storage.get_config().map(|config| (path, config))
    }) {
        Some((path, config)) => {
            config.with_context(|| format!("Failed to load config from '{}'", path.display()))
        }
        None => Ok(SkyChartConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(limit) = args.limiting_magnitude {
        config.limiting_magnitude = limit;
    }

    let when = args
        .observation
        .instant()
        .context("Invalid observation time")?;
    info!("Charting the sky over '{}' at {}", args.location, when);

    let pipeline = StarChartPipeline::from_config(config);
    let chart = pipeline.render(&ChartRequest {
        location: args.location,
        when,
        transparent: args.transparent,
    })?;

    for warning in &chart.warnings {
        eprintln!("Warning: {warning}");
    }

    std::fs::write(&args.output, &chart.png)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;
    println!(
        "Wrote {} ({} stars, {} constellation segments, observer {})",
        args.output.display(),
        chart.star_count,
        chart.edge_count,
        chart.observer
    );
    Ok(())
}
