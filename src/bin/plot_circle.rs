use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use stormgrid::config::{ExportConfig, DEFAULT_TARGET, NEIGHBORHOOD_BASE, NEIGHBORHOOD_K,
                        NEIGHBORHOOD_MARGIN};
use stormgrid::export::save_figure;
use stormgrid::render::NeighborhoodFigure;
use stormgrid::{select_neighborhood, Bounds, Lattice, Node};
use stormgrid::util::load_land;

#[derive(Debug, Parser)]
#[command(name = "plot-circle")]
#[command(about = "Snap a coordinate onto the global 0.25° lattice and plot its k nearest points")]
struct Cli {
    /// Target longitude, in degrees
    #[arg(long, default_value_t = DEFAULT_TARGET.0, allow_hyphen_values = true)]
    lon: f64,

    /// Target latitude, in degrees
    #[arg(long, default_value_t = DEFAULT_TARGET.1, allow_hyphen_values = true)]
    lat: f64,

    /// Neighbourhood size
    #[arg(short, default_value_t = NEIGHBORHOOD_K)]
    k: usize,

    /// Half-width of the map window around the snapped point, in degrees
    #[arg(long, default_value_t = NEIGHBORHOOD_MARGIN)]
    margin: f64,

    /// GeoJSON land polygons for the map backdrop; built-in 1:110m outlines when omitted
    #[arg(long)]
    land: Option<PathBuf>,

    /// Directory the PNG and PDF are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Raster resolution
    #[arg(long, default_value_t = 300)]
    dpi: u32,

    /// Print a JSON summary of the selection to stdout
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    stormgrid::init_tracing();
    let cli = Cli::parse();

    let start = Instant::now();
    let lattice = Lattice::global();
    let (rows, cols) = lattice.size();
    info!("{}x{} lattice construction took {} ms", rows, cols, start.elapsed().as_millis());

    let hood = select_neighborhood(&lattice, Node::new(cli.lat, cli.lon), cli.k)?;
    info!("chosen grid point ({:.3}, {:.3}), cutoff {} (radius {:.4}°)",
          hood.snapped.lon,
          hood.snapped.lat,
          hood.cutoff,
          hood.radius());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&hood.summary())?);
    }

    let window = Bounds::around(hood.snapped, cli.margin);
    let land = load_land(cli.land.as_deref(), Some(window)).with_context(|| match cli.land {
        Some(ref path) => format!("reading land polygons {}", path.display()),
        None => "reading built-in land polygons".to_string(),
    })?;

    let figure = NeighborhoodFigure {
        hood: &hood,
        margin: cli.margin,
        land: &land,
    };
    let config = ExportConfig::default().with_dpi(cli.dpi);
    save_figure(&figure, &cli.output_dir.join(NEIGHBORHOOD_BASE), &config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let cli = Cli::try_parse_from(["plot-circle"]).expect("expected valid cli args");
        assert_eq!((cli.lon, cli.lat), (-55.0, 13.0));
        assert_eq!(cli.k, 101);
        assert_eq!(cli.margin, 5.0);
        assert!(!cli.json);
    }

    #[test]
    fn negative_coordinates() {
        let cli = Cli::try_parse_from(["plot-circle", "--lon", "-120.5", "--lat", "-33", "-k", "9",
                                       "--json"])
            .expect("expected valid cli args");
        assert_eq!((cli.lon, cli.lat), (-120.5, -33.0));
        assert_eq!(cli.k, 9);
        assert!(cli.json);
    }
}
