use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use stormgrid::config::{ExportConfig, TRACK_MARGIN};
use stormgrid::export::{output_base, save_figure};
use stormgrid::render::TrackFigure;
use stormgrid::track_from_file;
use stormgrid::util::load_land;

#[derive(Debug, Parser)]
#[command(name = "plot-track")]
#[command(about = "Plot a HURDAT2 storm track")]
struct Cli {
    /// Path to the .txt track file
    track_file: PathBuf,

    /// GeoJSON land polygons for the map backdrop; built-in 1:110m outlines when omitted
    #[arg(long)]
    land: Option<PathBuf>,

    /// Directory the PNG and PDF are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Raster resolution
    #[arg(long, default_value_t = 300)]
    dpi: u32,

    /// Margin around the track, in degrees
    #[arg(long, default_value_t = TRACK_MARGIN)]
    margin: f64,
}

fn main() -> anyhow::Result<()> {
    stormgrid::init_tracing();
    let cli = Cli::parse();

    let start = Instant::now();
    let track = track_from_file(&cli.track_file)
        .with_context(|| format!("reading track {}", cli.track_file.display()))?;
    if track.is_empty() {
        eprintln!("No track points found in {}", cli.track_file.display());
        process::exit(1);
    }
    info!("parsed {} track points in {} ms", track.len(), start.elapsed().as_millis());

    let window = track.bbox().expand(cli.margin);
    let land = load_land(cli.land.as_deref(), Some(window)).with_context(|| match cli.land {
        Some(ref path) => format!("reading land polygons {}", path.display()),
        None => "reading built-in land polygons".to_string(),
    })?;

    let base = output_base(&cli.track_file);
    let figure = TrackFigure {
        track: &track,
        title: base.clone(),
        margin: cli.margin,
        land: &land,
    };
    let config = ExportConfig::default().with_dpi(cli.dpi);
    save_figure(&figure, &cli.output_dir.join(&base), &config)?;
    Ok(())
}
