use std::fs;
use std::path::PathBuf;

use plotters::prelude::*;

use stormgrid::config::{ExportConfig, Format, LIGHT_GREY};
use stormgrid::export::save_figure;
use stormgrid::render::{Figure, NeighborhoodFigure, TrackFigure};
use stormgrid::util::default_land;
use stormgrid::{parse_track, select_neighborhood, Axis, Bounds, LandPolygon, Lattice, Node};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stormgrid-export-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn pdf_only() -> ExportConfig {
    ExportConfig {
        formats: vec![Format::Pdf],
        ..Default::default()
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
}

fn island() -> LandPolygon {
    LandPolygon {
        exterior: vec![Node::new(14.0, -62.0),
                       Node::new(14.0, -60.0),
                       Node::new(16.0, -60.0),
                       Node::new(16.0, -62.0),
                       Node::new(14.0, -62.0)],
        holes: vec![],
    }
}

#[test]
fn track_figure_as_pdf() {
    let dir = scratch_dir("track");
    let track = parse_track("header\n\
                             20110821, 0000, , TS, 15.0N, 59.0W\n\
                             20110821, 0600, , TS, 16.0N, 60.6W\n"
                                .as_bytes())
        .unwrap();
    let land = vec![island()];
    let figure = TrackFigure {
        track: &track,
        title: "al092011".to_string(),
        margin: 2.0,
        land: &land,
    };

    let written = save_figure(&figure, &dir.join("al092011"), &pdf_only()).unwrap();
    assert_eq!(written, vec![dir.join("al092011.pdf")]);
    let bytes = fs::read(&written[0]).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(contains(&bytes, "<616C303932303131> Tj"));
    assert!(contains(&bytes, "%%EOF"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn neighborhood_figure_as_pdf() {
    let dir = scratch_dir("hood");
    let lattice = Lattice::new(Axis::new(-60.0, -50.0, 0.25), Axis::new(8.0, 18.0, 0.25));
    let hood = select_neighborhood(&lattice, Node::new(13.0, -55.0), 101).unwrap();
    let land = vec![island()];
    let figure = NeighborhoodFigure {
        hood: &hood,
        margin: 5.0,
        land: &land,
    };

    let written = save_figure(&figure, &dir.join("example"), &pdf_only()).unwrap();
    let bytes = fs::read(&written[0]).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    // "Chosen grid"
    assert!(contains(&bytes, "<43686F73656E2067726964"));
    // A square map keeps the full height and crops the width.
    assert!(contains(&bytes, "/MediaBox [0 0 410 432]"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_output_directory_is_an_error() {
    let dir = std::env::temp_dir().join("stormgrid-export-absent").join("nested");
    let track = parse_track("header\n1, 2, 3, 4, 15.0N, 59.0W\n".as_bytes()).unwrap();
    let figure = TrackFigure {
        track: &track,
        title: "one".to_string(),
        margin: 2.0,
        land: &[],
    };
    assert!(save_figure(&figure, &dir.join("one"), &pdf_only()).is_err());
}

/// Pixels painted in the neighbourhood land colour on a small raster of the
/// Venezuelan coast.
fn land_pixels(land: &[LandPolygon]) -> usize {
    let lattice = Lattice::new(Axis::new(-70.0, -55.0, 0.25), Axis::new(3.0, 18.0, 0.25));
    let hood = select_neighborhood(&lattice, Node::new(10.0, -62.0), 101).unwrap();
    let figure = NeighborhoodFigure {
        hood: &hood,
        margin: 5.0,
        land,
    };
    let (w, h) = (400u32, 300u32);
    let mut buf = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        figure.draw(&root, 50.0 / 72.0).unwrap();
        root.present().unwrap();
    }
    let grey = [LIGHT_GREY.0, LIGHT_GREY.1, LIGHT_GREY.2];
    buf.chunks(3).filter(|px| **px == grey).count()
}

#[test]
fn built_in_land_is_drawn() {
    let window = Bounds::around(Node::new(10.0, -62.0), 5.0);
    let land = default_land(Some(window)).unwrap();
    assert!(!land.is_empty());
    // Antialiased glyph edges can hit the same grey, so compare against an empty backdrop.
    let ocean_only = land_pixels(&[]);
    assert!(land_pixels(&land) > ocean_only + 100);
}
