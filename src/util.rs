use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geojson::{GeoJson, Geometry, Value};
use num::{Float, NumCast};
use tracing::debug;

use crate::error::Result;
use crate::types::{Bounds, LandPolygon, Node};

/// Evenly spaced ascending values `start + i * step` over the half-open interval [start, stop).
/// Return an empty vector if the interval or the step is degenerate.
pub fn arange<T: Float>(start: T, stop: T, step: T) -> Vec<T> {
    if !(step > T::zero()) || !(stop > start) {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil().to_usize().unwrap_or(0);
    (0..n)
        .filter_map(|i| <T as NumCast>::from(i))
        .map(|i| start + i * step)
        .collect()
}

/// Find the bounds over an iterator of nodes.
/// An empty iterator yields inverted infinite bounds, which intersect nothing.
pub fn node_bounds<'a, I: Iterator<Item = &'a Node>>(iter: I) -> Bounds {
    iter.fold(Bounds {
                  north: f64::MIN,
                  south: f64::MAX,
                  east: f64::MIN,
                  west: f64::MAX,
              },
              |b, n| {
        Bounds {
            north: f64::max(b.north, n.lat),
            south: f64::min(b.south, n.lat),
            east: f64::max(b.east, n.lon),
            west: f64::min(b.west, n.lon),
        }
    })
}

#[inline]
fn ring(positions: &[Vec<f64>]) -> Vec<Node> {
    positions.iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| Node::new(pos[1], pos[0]))
        .collect()
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Option<LandPolygon> {
    let mut rings = rings.iter().map(|r| ring(r));
    let exterior = rings.next()?;
    if exterior.len() < 3 {
        return None;
    }
    Some(LandPolygon {
        exterior,
        holes: rings.filter(|r| r.len() >= 3).collect(),
    })
}

fn collect_polygons(geometry: &Geometry, out: &mut Vec<LandPolygon>) {
    match geometry.value {
        Value::Polygon(ref rings) => out.extend(polygon(rings)),
        Value::MultiPolygon(ref polys) => out.extend(polys.iter().filter_map(|p| polygon(p))),
        Value::GeometryCollection(ref geometries) => {
            for g in geometries {
                collect_polygons(g, out);
            }
        }
        _ => (),
    }
}

/// Return the land polygons of a GeoJSON document, e.g. a Natural Earth land layer.
/// Non-polygonal geometries are ignored. If bounds given, only return polygons overlapping them.
pub fn land_from_json<R: Read>(reader: R, b: Option<Bounds>) -> Result<Vec<LandPolygon>> {
    let json = serde_json::from_reader::<_, GeoJson>(reader)?;
    let mut polygons = Vec::with_capacity(2000);
    match json {
        GeoJson::FeatureCollection(ref fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_polygons(geometry, &mut polygons);
                }
            }
        }
        GeoJson::Feature(ref feature) => {
            if let Some(ref geometry) = feature.geometry {
                collect_polygons(geometry, &mut polygons);
            }
        }
        GeoJson::Geometry(ref geometry) => collect_polygons(geometry, &mut polygons),
    }
    if let Some(b) = b {
        polygons.retain(|p| node_bounds(p.exterior.iter()).intersects(&b));
    }
    debug!("loaded {} land polygons", polygons.len());
    Ok(polygons)
}

/// Open and read land polygons from the GeoJSON file at `p`.
pub fn land_from_file<P: AsRef<Path>>(p: P, b: Option<Bounds>) -> Result<Vec<LandPolygon>> {
    let f = File::open(p)?;
    land_from_json(BufReader::new(f), b)
}

/// Natural Earth 1:110m country outlines, used whenever no land file is given.
pub const DEFAULT_LAND: &[u8] = include_bytes!("../data/land_110m.geojson");

/// Land polygons from the built-in low resolution layer.
pub fn default_land(b: Option<Bounds>) -> Result<Vec<LandPolygon>> {
    land_from_json(DEFAULT_LAND, b)
}

/// Land polygons from `path` when given, else from the built-in layer.
pub fn load_land(path: Option<&Path>, b: Option<Bounds>) -> Result<Vec<LandPolygon>> {
    match path {
        Some(p) => land_from_file(p, b),
        None => default_land(b),
    }
}

#[derive(Clone, Copy)]
enum Edge {
    North(f64),
    South(f64),
    East(f64),
    West(f64),
}

impl Edge {
    #[inline]
    fn inside(self, n: &Node) -> bool {
        match self {
            Edge::North(v) => n.lat <= v,
            Edge::South(v) => n.lat >= v,
            Edge::East(v) => n.lon <= v,
            Edge::West(v) => n.lon >= v,
        }
    }

    #[inline]
    fn intersect(self, a: &Node, b: &Node) -> Node {
        match self {
            Edge::North(v) | Edge::South(v) => {
                let t = (v - a.lat) / (b.lat - a.lat);
                Node::new(v, a.lon + t * (b.lon - a.lon))
            }
            Edge::East(v) | Edge::West(v) => {
                let t = (v - a.lon) / (b.lon - a.lon);
                Node::new(a.lat + t * (b.lat - a.lat), v)
            }
        }
    }
}

/// Clip a closed ring to the given bounds (Sutherland-Hodgman).
/// The result may be empty when the ring lies entirely outside.
pub fn clip_ring(ring: &[Node], b: &Bounds) -> Vec<Node> {
    let edges = [Edge::North(b.north), Edge::South(b.south), Edge::East(b.east), Edge::West(b.west)];
    let mut output = ring.to_vec();
    for &edge in &edges {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        for cur in input {
            match (edge.inside(&cur), edge.inside(&prev)) {
                (true, true) => output.push(cur),
                (true, false) => {
                    output.push(edge.intersect(&prev, &cur));
                    output.push(cur);
                }
                (false, true) => output.push(edge.intersect(&prev, &cur)),
                (false, false) => (),
            }
            prev = cur;
        }
    }
    output
}

#[inline]
fn degrees(v: f64) -> Option<String> {
    // Collapse anything that rounds to zero so we never print "-0.0".
    if (v * 10.0).round() == 0.0 {
        None
    } else {
        Some(format!("{:.1}°", v.abs()))
    }
}

/// Format a longitude tick label, e.g. `55.0°W`. Zero and the dateline get no direction letter.
pub fn format_lon(lon: f64) -> String {
    let mut lon = lon;
    if lon > 180.0 || lon < -180.0 {
        lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
    }
    match degrees(lon) {
        None => "0.0°".to_string(),
        Some(s) if (lon.abs() - 180.0).abs() < 0.05 => s,
        Some(s) if lon > 0.0 => s + "E",
        Some(s) => s + "W",
    }
}

/// Format a latitude tick label, e.g. `13.0°N`.
pub fn format_lat(lat: f64) -> String {
    match degrees(lat) {
        None => "0.0°".to_string(),
        Some(s) if lat > 0.0 => s + "N",
        Some(s) => s + "S",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_land_covers_the_demo_window() {
        let window = Bounds::around(Node::new(12.875, -55.125), 5.0);
        let land = default_land(Some(window)).unwrap();
        assert!(!land.is_empty());
        assert!(land.iter().any(|p| clip_ring(&p.exterior, &window).len() >= 3));

        let everything = default_land(None).unwrap();
        assert!(everything.len() > land.len());
        assert!(everything.iter().all(|p| p.exterior.len() >= 3));
    }

    #[test]
    fn default_land_skips_open_ocean() {
        let mid_pacific = Bounds::around(Node::new(-30.0, -140.0), 2.0);
        assert!(default_land(Some(mid_pacific)).unwrap().is_empty());
    }

    #[test]
    fn arange_excludes_stop() {
        assert_eq!(arange(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(arange(-1.0f32, 0.5, 0.5), vec![-1.0, -0.5, 0.0]);
        assert!(arange(1.0, 1.0, 0.25).is_empty());
        assert!(arange(0.0, 1.0, 0.0).is_empty());
        assert!(arange(0.0, 1.0, -0.5).is_empty());
    }

    #[test]
    fn arange_global_axes() {
        let lons = arange(-179.875, 180.0, 0.25);
        let lats = arange(-89.875, 90.0, 0.25);
        assert_eq!(lons.len(), 1440);
        assert_eq!(lats.len(), 720);
        assert_eq!(lons[lons.len() - 1], 179.875);
        assert_eq!(lats[lats.len() - 1], 89.875);
    }

    #[test]
    fn bounds_of_nodes() {
        let nodes = [Node::new(13.4, -55.1), Node::new(14.6, -57.2), Node::new(14.0, -56.0)];
        let b = node_bounds(nodes.iter());
        assert_eq!(b, Bounds { north: 14.6, south: 13.4, east: -55.1, west: -57.2 });
    }

    #[test]
    fn lon_lat_labels() {
        assert_eq!(format_lon(-55.0), "55.0°W");
        assert_eq!(format_lon(30.5), "30.5°E");
        assert_eq!(format_lon(0.0), "0.0°");
        assert_eq!(format_lon(-0.00000001), "0.0°");
        assert_eq!(format_lon(180.0), "180.0°");
        assert_eq!(format_lon(-180.0), "180.0°");
        assert_eq!(format_lon(190.0), "170.0°W");
        assert_eq!(format_lat(13.0), "13.0°N");
        assert_eq!(format_lat(-7.5), "7.5°S");
        assert_eq!(format_lat(0.0), "0.0°");
    }

    #[test]
    fn clip_keeps_inside_ring() {
        let b = Bounds { north: 10.0, south: 0.0, east: 10.0, west: 0.0 };
        let square = vec![Node::new(1.0, 1.0), Node::new(1.0, 2.0), Node::new(2.0, 2.0), Node::new(2.0, 1.0)];
        assert_eq!(clip_ring(&square, &b), square);
    }

    #[test]
    fn clip_cuts_overlapping_ring() {
        let b = Bounds { north: 1.0, south: -1.0, east: 1.0, west: -1.0 };
        let big = vec![Node::new(-5.0, -5.0), Node::new(-5.0, 5.0), Node::new(5.0, 5.0), Node::new(5.0, -5.0)];
        let clipped = clip_ring(&big, &b);
        assert!(!clipped.is_empty());
        assert!(clipped.iter().all(|n| b.contains(n)));
        let far = vec![Node::new(20.0, 20.0), Node::new(20.0, 21.0), Node::new(21.0, 21.0)];
        assert!(clip_ring(&far, &b).is_empty());
    }

    #[test]
    fn land_from_feature_collection() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon",
                 "coordinates": [[[-60.0, 10.0], [-58.0, 10.0], [-58.0, 12.0], [-60.0, 10.0]]]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "MultiPolygon",
                 "coordinates": [[[[100.0, 0.0], [101.0, 0.0], [101.0, 1.0], [100.0, 0.0]]],
                                 [[[-61.0, 14.0], [-60.0, 14.0], [-60.0, 15.0], [-61.0, 14.0]],
                                  [[-60.8, 14.2], [-60.5, 14.2], [-60.5, 14.5], [-60.8, 14.2]]]]}},
                {"type": "Feature", "properties": {}, "geometry": {"type": "LineString",
                 "coordinates": [[0.0, 0.0], [1.0, 1.0]]}}
            ]
        }"#;
        let all = land_from_json(doc.as_bytes(), None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].exterior[0], Node::new(10.0, -60.0));
        assert_eq!(all[2].holes.len(), 1);

        let window = Bounds { north: 20.0, south: 5.0, east: -50.0, west: -65.0 };
        let near = land_from_json(doc.as_bytes(), Some(window)).unwrap();
        assert_eq!(near.len(), 2);
    }

    #[test]
    fn land_from_garbage_is_error() {
        assert!(land_from_json("not json".as_bytes(), None).is_err());
    }
}
