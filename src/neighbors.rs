use std::f64::consts::PI;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::lattice::{Lattice, Processor};
use crate::types::Node;

/// Number of samples in the cutoff circle polyline.
pub const CIRCLE_SAMPLES: usize = 360;

/// The neighbourhood of a snapped lattice point: every point within the k-th smallest distance,
/// ties included, plus the ring of points sitting at the next distance out.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    /// Lattice point closest to the requested target.
    pub snapped: Node,
    /// Row-major index of `snapped`.
    pub snapped_idx: usize,
    /// Requested neighbourhood size.
    pub k: usize,
    /// Squared degree distance of the k-th nearest point.
    pub cutoff: f64,
    /// Smallest distance strictly greater than `cutoff`, if any point lies further out.
    pub next_cutoff: Option<f64>,
    /// Points with distance <= cutoff, in lattice order. Never fewer than `k`.
    pub inside: Vec<Node>,
    /// Points with cutoff < distance <= next_cutoff, in lattice order.
    pub outside: Vec<Node>,
}

/// Serializable digest of a `Neighborhood`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodSummary {
    pub snapped: Node,
    pub k: usize,
    pub cutoff: f64,
    pub radius: f64,
    pub next_cutoff: Option<f64>,
    pub inside: usize,
    pub outside: usize,
}

impl Neighborhood {
    /// Cutoff expressed as a radius in degrees.
    pub fn radius(&self) -> f64 {
        self.cutoff.sqrt()
    }

    /// Closed polyline of `samples` points on the cutoff circle around the snapped point.
    /// Angles are evenly spaced over [0, 2π] with both ends included. The circle lives in
    /// plain degree space, so it is only a display aid.
    pub fn circle(&self, samples: usize) -> Vec<Node> {
        let r = self.radius();
        let steps = samples.saturating_sub(1).max(1) as f64;
        (0..samples)
            .map(|i| 2.0 * PI * i as f64 / steps)
            .map(|theta| Node {
                lat: self.snapped.lat + r * theta.sin(),
                lon: self.snapped.lon + r * theta.cos(),
            })
            .collect()
    }

    pub fn summary(&self) -> NeighborhoodSummary {
        NeighborhoodSummary {
            snapped: self.snapped,
            k: self.k,
            cutoff: self.cutoff,
            radius: self.radius(),
            next_cutoff: self.next_cutoff,
            inside: self.inside.len(),
            outside: self.outside.len(),
        }
    }
}

/// Snap `target` onto the lattice and select its k nearest points, working on all cores.
pub fn select_neighborhood(lattice: &Lattice, target: Node, k: usize) -> Result<Neighborhood> {
    select_neighborhood_generic(lattice, target, k, Processor::MultiCore)
}

/// Sequentially snap `target` onto the lattice and select its k nearest points.
pub fn select_neighborhood_slow(lattice: &Lattice, target: Node, k: usize) -> Result<Neighborhood> {
    select_neighborhood_generic(lattice, target, k, Processor::SingleCore)
}

/// Snap, rank and partition. The cutoff is the k-th smallest squared distance to the snapped
/// point; everything at or below it is inside, everything up to the next distinct distance is
/// the outside ring.
pub fn select_neighborhood_generic(lattice: &Lattice,
                                   target: Node,
                                   k: usize,
                                   processor: Processor)
                                   -> Result<Neighborhood> {
    if k == 0 {
        return Err(Error::ZeroNeighbors);
    }
    if lattice.is_empty() {
        return Err(Error::EmptyLattice);
    }
    if k > lattice.len() {
        return Err(Error::NotEnoughPoints { k, len: lattice.len() });
    }
    let start = Instant::now();
    let (snapped_idx, snapped) = lattice.snap(target, processor)?;
    debug!("snapped ({}, {}) to ({}, {}) at index {}",
           target.lon, target.lat, snapped.lon, snapped.lat, snapped_idx);

    let dist = lattice.distance_field(&snapped, processor);
    let mut sorted = dist.clone();
    processor.sort(&mut sorted);
    let cutoff = sorted[k - 1];
    // Everything from rank k on is >= cutoff, so the first larger value is the next distinct one.
    let next_cutoff = sorted[k..].iter().copied().find(|&d| d > cutoff);

    let mut inside = Vec::with_capacity(k);
    let mut outside = Vec::new();
    for (node, &d) in lattice.points().iter().zip(dist.iter()) {
        if d <= cutoff {
            inside.push(*node);
        } else if next_cutoff.map_or(false, |next| d <= next) {
            outside.push(*node);
        }
    }
    info!("selected {} inside and {} outside points in {} ms",
          inside.len(),
          outside.len(),
          start.elapsed().as_millis());

    Ok(Neighborhood { snapped, snapped_idx, k, cutoff, next_cutoff, inside, outside })
}
