use std::cmp::Ordering;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::types::{Bounds, Node};
use crate::util::{arange, node_bounds};

/// Spacing of the global lattice, in degrees.
pub const GLOBAL_STEP: f64 = 0.25;

/// How to run the per-point work over a lattice.
/// Both variants give identical results; `MultiCore` spreads the work over rayon's global pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processor {
    SingleCore,
    MultiCore,
}

#[inline]
fn by_distance_then_index(a: (usize, &f64), b: (usize, &f64)) -> Ordering {
    a.1.total_cmp(b.1).then(a.0.cmp(&b.0))
}

impl Processor {
    /// Squared degree distance of every point to `reference`, in point order.
    pub fn distances(self, points: &[Node], reference: &Node) -> Vec<f64> {
        match self {
            Processor::SingleCore => points.iter().map(|p| p.dist2(reference)).collect(),
            Processor::MultiCore => points.par_iter().map(|p| p.dist2(reference)).collect(),
        }
    }

    /// Index of the smallest value. Ties go to the lowest index.
    pub fn argmin(self, values: &[f64]) -> Option<usize> {
        let best = match self {
            Processor::SingleCore => {
                values.iter().enumerate().min_by(|&a, &b| by_distance_then_index(a, b))
            }
            Processor::MultiCore => {
                values.par_iter().enumerate().min_by(|&a, &b| by_distance_then_index(a, b))
            }
        };
        best.map(|(i, _)| i)
    }

    /// Sort ascending.
    pub fn sort(self, values: &mut [f64]) {
        match self {
            Processor::SingleCore => values.sort_unstable_by(f64::total_cmp),
            Processor::MultiCore => values.par_sort_unstable_by(f64::total_cmp),
        }
    }
}

/// One axis of a regular lattice: `start, start + step, ...` up to but excluding `stop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Axis {
    pub fn new(start: f64, stop: f64, step: f64) -> Axis {
        Axis { start, stop, step }
    }

    pub fn values(&self) -> Vec<f64> {
        arange(self.start, self.stop, self.step)
    }
}

/// `Lattice` is a dense regular grid of candidate points, stored flat in row-major order:
/// latitude ascending in the outer loop, longitude ascending in the inner loop. That order
/// decides which point wins when several are equally close to a target.
#[derive(Debug, Clone)]
pub struct Lattice {
    lons: Vec<f64>,
    lats: Vec<f64>,
    points: Vec<Node>,
}

impl Lattice {
    /// Construct a lattice as the outer product of a longitude and a latitude axis.
    pub fn new(lon: Axis, lat: Axis) -> Lattice {
        Lattice::from_axes(lon.values(), lat.values())
    }

    /// Construct a lattice from explicit axis values.
    pub fn from_axes(lons: Vec<f64>, lats: Vec<f64>) -> Lattice {
        let points = lats.iter()
            .flat_map(|&lat| lons.iter().map(move |&lon| Node { lat, lon }))
            .collect();
        Lattice { lons, lats, points }
    }

    /// The global 0.25° lattice whose points sit at cell centres, from (-179.875, -89.875) up to
    /// (179.875, 89.875).
    pub fn global() -> Lattice {
        let half = GLOBAL_STEP / 2.0;
        Lattice::new(Axis::new(-180.0 + half, 180.0, GLOBAL_STEP),
                     Axis::new(-90.0 + half, 90.0, GLOBAL_STEP))
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Lattice has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lattice dimensions as (rows, columns), i.e. (latitudes, longitudes).
    pub fn size(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Immutable access to the flat point list.
    pub fn points(&self) -> &[Node] {
        &self.points
    }

    /// Return lat, lon coordinates of given index in the lattice.
    pub fn to_lat_lon(&self, idx: usize) -> Option<(f64, f64)> {
        self.points.get(idx).map(|n| (n.lat, n.lon))
    }

    /// Return the lat/lon boundaries of the lattice.
    pub fn bbox(&self) -> Bounds {
        node_bounds(self.points.iter())
    }

    /// Snap `target` onto the closest lattice point by brute force over every point.
    /// Targets outside the lattice bounds are fine; the nearest point is still well defined.
    /// Equally close points are resolved by row-major order, the first one wins.
    pub fn snap(&self, target: Node, processor: Processor) -> Result<(usize, Node)> {
        if !target.lat.is_finite() || !target.lon.is_finite() {
            return Err(Error::NonFiniteTarget { lon: target.lon, lat: target.lat });
        }
        if self.is_empty() {
            return Err(Error::EmptyLattice);
        }
        // The grid is an outer product, so the nearest point is the nearest value on each axis.
        // Clamping each coordinate into the bounding box keeps those and keeps distances finite.
        let b = self.bbox();
        let target = Node {
            lat: target.lat.clamp(b.south, b.north),
            lon: target.lon.clamp(b.west, b.east),
        };
        let dist = processor.distances(&self.points, &target);
        let idx = processor.argmin(&dist).ok_or(Error::EmptyLattice)?;
        Ok((idx, self.points[idx]))
    }

    /// Squared degree distance from every lattice point to `reference`, in lattice order.
    pub fn distance_field(&self, reference: &Node, processor: Processor) -> Vec<f64> {
        processor.distances(&self.points, reference)
    }
}
