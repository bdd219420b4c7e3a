use std::io;

use thiserror::Error;

/// Everything that can go wrong while building a neighbourhood, reading a track or drawing a map.
#[derive(Debug, Error)]
pub enum Error {
    #[error("lattice has no points")]
    EmptyLattice,
    #[error("neighbourhood size must be at least 1")]
    ZeroNeighbors,
    #[error("asked for {k} neighbours but the lattice only has {len} points")]
    NotEnoughPoints { k: usize, len: usize },
    #[error("target coordinate ({lon}, {lat}) is not finite")]
    NonFiniteTarget { lon: f64, lat: f64 },
    #[error("line {line}: cannot read coordinate {value:?}")]
    BadCoordinate { line: usize, value: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("drawing failed: {0}")]
    Drawing(String),
}

pub type Result<T> = std::result::Result<T, Error>;
