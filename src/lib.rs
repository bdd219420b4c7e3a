//! Plot storm tracks and lattice neighbourhoods on a Plate Carree map.
//!
//! The heart of the crate is [`select_neighborhood`]: snap a coordinate onto a dense regular
//! lattice and pick its k nearest lattice points, keeping every point tied with the k-th one.
//! Around it sit a HURDAT2 track reader, a map renderer built on plotters, and an exporter that
//! writes each figure as PNG and PDF.

pub mod config;
mod error;
pub mod export;
pub mod lattice;
pub mod neighbors;
pub mod pdf;
pub mod render;
pub mod track;
mod types;
pub mod util;

pub use error::{Error, Result};
pub use lattice::{Axis, Lattice, Processor};
pub use neighbors::{select_neighborhood, select_neighborhood_slow, Neighborhood,
                    NeighborhoodSummary};
pub use track::{parse_track, track_from_file, Track};
pub use types::*;

/// Install the fmt subscriber used by the binaries: log lines go to stderr, filtered by
/// `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
