use serde::{Deserialize, Serialize};

/// Represent some map coordinate, in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn new(lat: f64, lon: f64) -> Node {
        Node { lat, lon }
    }

    /// Squared euclidean distance in degree units. No geodesic correction is applied.
    #[inline]
    pub fn dist2(&self, other: &Node) -> f64 {
        let dlon = self.lon - other.lon;
        let dlat = self.lat - other.lat;
        dlon * dlon + dlat * dlat
    }

    /// (x, y) pair for plotting, longitude first.
    #[inline]
    pub fn xy(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }
}

/// Represent some map bounds, in degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn range_lat(&self) -> f64 {
        self.north - self.south
    }
    pub fn range_lon(&self) -> f64 {
        self.east - self.west
    }

    /// Square window of half-width `margin` centred on `center`.
    pub fn around(center: Node, margin: f64) -> Bounds {
        Bounds {
            north: center.lat + margin,
            south: center.lat - margin,
            east: center.lon + margin,
            west: center.lon - margin,
        }
    }

    /// Grow every side by `margin` degrees.
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds {
            north: self.north + margin,
            south: self.south - margin,
            east: self.east + margin,
            west: self.west - margin,
        }
    }

    pub fn contains(&self, n: &Node) -> bool {
        n.lat <= self.north && n.lat >= self.south && n.lon <= self.east && n.lon >= self.west
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.west <= other.east && other.west <= self.east && self.south <= other.north &&
        other.south <= self.north
    }
}

/// A land polygon: an exterior ring and any number of holes (lakes, inland seas).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LandPolygon {
    pub exterior: Vec<Node>,
    pub holes: Vec<Vec<Node>>,
}
