use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Bounds, Node};
use crate::util::node_bounds;

/// Minimum number of comma separated fields in a data row.
const MIN_FIELDS: usize = 6;
const LAT_FIELD: usize = 4;
const LON_FIELD: usize = 5;

/// An ordered storm track.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub points: Vec<Node>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latitudes in track order.
    pub fn lats(&self) -> Vec<f64> {
        self.points.iter().map(|n| n.lat).collect()
    }

    /// Longitudes in track order.
    pub fn lons(&self) -> Vec<f64> {
        self.points.iter().map(|n| n.lon).collect()
    }

    pub fn bbox(&self) -> Bounds {
        node_bounds(self.points.iter())
    }
}

/// Read a `13.4N` style coordinate. `positive` is the hemisphere letter that keeps the sign.
fn coordinate(field: &str, positive: char, negative: char, line: usize) -> Result<f64> {
    let bad = || Error::BadCoordinate { line, value: field.to_string() };
    let hemisphere = field.chars().last().ok_or_else(bad)?;
    let magnitude: f64 = field[..field.len() - hemisphere.len_utf8()].trim().parse().map_err(|_| bad())?;
    match hemisphere.to_ascii_uppercase() {
        c if c == positive => Ok(magnitude),
        c if c == negative => Ok(-magnitude),
        _ => Err(bad()),
    }
}

/// Parse a HURDAT2 style track. The first line is a header and is discarded. Rows with fewer
/// than six fields (storm headers, blank lines) are skipped silently; fields five and six of every
/// other row hold latitude and longitude.
pub fn parse_track<R: BufRead>(reader: R) -> Result<Track> {
    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < MIN_FIELDS {
            debug!("skipping line {} with {} fields", i + 1, parts.len());
            continue;
        }
        let lat = coordinate(parts[LAT_FIELD], 'N', 'S', i + 1)?;
        let lon = coordinate(parts[LON_FIELD], 'E', 'W', i + 1)?;
        points.push(Node { lat, lon });
    }
    Ok(Track { points })
}

/// Open and parse the track file at `p`.
pub fn track_from_file<P: AsRef<Path>>(p: P) -> Result<Track> {
    let f = File::open(p)?;
    parse_track(BufReader::new(f))
}
