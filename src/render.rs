use std::iter;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::config::{MapStyle, GRAY};
use crate::neighbors::{Neighborhood, CIRCLE_SAMPLES};
use crate::track::Track;
use crate::types::{Bounds, LandPolygon, Node};
use crate::util::{clip_ring, format_lat, format_lon};

pub type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;
pub type MapChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Scale a length given in points to backend units, never below one unit.
#[inline]
pub fn px(points: f64, scale: f64) -> u32 {
    (points * scale).round().max(1.0) as u32
}

/// Something that can be drawn as a Plate Carree map.
pub trait Figure {
    fn title(&self) -> String;

    /// Map extent in degrees.
    fn bounds(&self) -> Bounds;

    fn style(&self) -> MapStyle;

    fn land(&self) -> &[LandPolygon];

    /// Optional (x, y) axis descriptions.
    fn axis_labels(&self) -> Option<(&str, &str)> {
        None
    }

    /// Draw the figure's own data on top of the backdrop and gridlines.
    fn draw_overlay<DB: DrawingBackend>(&self, chart: &mut MapChart<DB>, scale: f64) -> DrawResult<DB>;

    /// Page size cropped to the map: at most `max`, with no padding around the plotting area.
    fn page_size(&self, max: (u32, u32), scale: f64) -> (u32, u32) {
        tight_size(&self.bounds(), max, scale)
    }

    /// Draw the whole figure on `root`. `scale` is backend units per point.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, scale: f64) -> DrawResult<DB>
        where Self: Sized
    {
        draw_map(self, root, scale)
    }
}

struct Layout {
    margin: u32,
    label_area: u32,
    caption: u32,
}

impl Layout {
    fn new(scale: f64) -> Layout {
        Layout {
            margin: px(10.0, scale),
            label_area: px(42.0, scale),
            caption: px(22.0, scale),
        }
    }

    /// Horizontal and vertical space around the plotting area.
    fn reserved(&self) -> (u32, u32) {
        (self.label_area + 2 * self.margin, self.label_area + self.caption + 2 * self.margin)
    }
}

/// Size of the largest plotting area inside `avail` in which one degree of longitude is as wide
/// as one degree of latitude is tall. `None` for a degenerate view.
fn equal_aspect_fit(view: &Bounds, avail: (f64, f64)) -> Option<(f64, f64)> {
    let aspect = view.range_lon() / view.range_lat();
    if !aspect.is_finite() || aspect <= 0.0 {
        return None;
    }
    if avail.0 / avail.1 > aspect {
        Some((avail.1 * aspect, avail.1))
    } else {
        Some((avail.0, avail.0 / aspect))
    }
}

/// Page size that wraps an equal-aspect map of `view` with its caption and axis labels, fitted
/// inside `max`. The long side of the map fills `max`; the other side is cropped.
pub fn tight_size(view: &Bounds, max: (u32, u32), scale: f64) -> (u32, u32) {
    let (rw, rh) = Layout::new(scale).reserved();
    let avail = (max.0.saturating_sub(rw).max(1) as f64, max.1.saturating_sub(rh).max(1) as f64);
    match equal_aspect_fit(view, avail) {
        Some((w, h)) => (((w.round() as u32) + rw).min(max.0), ((h.round() as u32) + rh).min(max.1)),
        None => max,
    }
}

/// Shrink `root` so the plotting area keeps equal degree aspect.
fn equal_aspect_area<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>,
                                         view: &Bounds,
                                         reserved: (u32, u32))
                                         -> DrawingArea<DB, Shift> {
    let (w, h) = root.dim_in_pixel();
    let avail_w = w.saturating_sub(reserved.0).max(1) as f64;
    let avail_h = h.saturating_sub(reserved.1).max(1) as f64;
    match equal_aspect_fit(view, (avail_w, avail_h)) {
        Some((fit_w, fit_h)) => {
            let pad_x = ((avail_w - fit_w) / 2.0).max(0.0) as u32;
            let pad_y = ((avail_h - fit_h) / 2.0).max(0.0) as u32;
            root.margin(pad_y, pad_y, pad_x, pad_x)
        }
        None => root.clone(),
    }
}

#[inline]
fn xy(nodes: &[Node]) -> Vec<(f64, f64)> {
    nodes.iter().map(Node::xy).collect()
}

fn draw_land<DB: DrawingBackend>(chart: &mut MapChart<DB>,
                                 land: &[LandPolygon],
                                 view: &Bounds,
                                 style: &MapStyle,
                                 scale: f64)
                                 -> DrawResult<DB> {
    for polygon in land {
        let exterior = clip_ring(&polygon.exterior, view);
        if exterior.len() < 3 {
            continue;
        }
        chart.draw_series(iter::once(Polygon::new(xy(&exterior), style.land.filled())))?;
        for hole in &polygon.holes {
            let hole = clip_ring(hole, view);
            if hole.len() >= 3 {
                chart.draw_series(iter::once(Polygon::new(xy(&hole), style.ocean.filled())))?;
            }
        }
        let mut coast = xy(&exterior);
        coast.push(coast[0]);
        chart.draw_series(iter::once(PathElement::new(coast,
                                                      style.coastline
                                                          .stroke_width(px(0.5, scale)))))?;
    }
    Ok(())
}

/// Draw title, ocean, land, coastlines and degree gridlines, then hand over to the figure's
/// overlay.
pub fn draw_map<DB: DrawingBackend, F: Figure>(figure: &F,
                                               root: &DrawingArea<DB, Shift>,
                                               scale: f64)
                                               -> DrawResult<DB> {
    let view = figure.bounds();
    let style = figure.style();
    root.fill(&WHITE)?;

    let layout = Layout::new(scale);
    let area = equal_aspect_area(root, &view, layout.reserved());

    let mut chart = ChartBuilder::on(&area)
        .caption(figure.title(), ("sans-serif", 12.0 * scale))
        .margin(layout.margin)
        .x_label_area_size(layout.label_area)
        .y_label_area_size(layout.label_area)
        .build_cartesian_2d(view.west..view.east, view.south..view.north)?;

    chart.plotting_area().fill(&style.ocean)?;
    draw_land(&mut chart, figure.land(), &view, &style, scale)?;

    {
        let lon_label = |v: &f64| format_lon(*v);
        let lat_label = |v: &f64| format_lat(*v);
        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&lon_label)
            .y_label_formatter(&lat_label)
            .x_labels(6)
            .y_labels(6)
            .label_style(("sans-serif", 8.0 * scale))
            .axis_style(BLACK.stroke_width(px(0.8, scale)))
            .bold_line_style(GRAY.mix(0.6).stroke_width(px(0.5, scale)))
            .light_line_style(WHITE.mix(0.0));
        if let Some((x_desc, y_desc)) = figure.axis_labels() {
            mesh.x_desc(x_desc)
                .y_desc(y_desc)
                .axis_desc_style(("sans-serif", 9.0 * scale));
        }
        mesh.draw()?;
    }

    figure.draw_overlay(&mut chart, scale)
}

/// A storm track: black line with circle markers, framed by the track's bounding box plus a
/// margin.
pub struct TrackFigure<'a> {
    pub track: &'a Track,
    pub title: String,
    pub margin: f64,
    pub land: &'a [LandPolygon],
}

impl<'a> Figure for TrackFigure<'a> {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn bounds(&self) -> Bounds {
        self.track.bbox().expand(self.margin)
    }

    fn style(&self) -> MapStyle {
        MapStyle::track()
    }

    fn land(&self) -> &[LandPolygon] {
        self.land
    }

    fn draw_overlay<DB: DrawingBackend>(&self, chart: &mut MapChart<DB>, scale: f64) -> DrawResult<DB> {
        chart.draw_series(LineSeries::new(self.track.points.iter().map(Node::xy),
                                          BLACK.stroke_width(px(1.5, scale))))?;
        chart.draw_series(self.track
            .points
            .iter()
            .map(|n| Circle::new(n.xy(), px(3.0, scale), BLACK.filled())))?;
        Ok(())
    }
}

/// Marker radius, in points, of a scatter marker with area `s` square points.
#[inline]
fn marker_radius(s: f64) -> f64 {
    (s / std::f64::consts::PI).sqrt()
}

/// A lattice neighbourhood: inside points in black, the next ring in grey, the snapped point in
/// red and the cutoff circle dashed.
pub struct NeighborhoodFigure<'a> {
    pub hood: &'a Neighborhood,
    pub margin: f64,
    pub land: &'a [LandPolygon],
}

const DASH: usize = 6;
const GAP: usize = 4;

impl<'a> Figure for NeighborhoodFigure<'a> {
    fn title(&self) -> String {
        format!("Chosen grid: ({:.3}°, {:.3}°)  •  Inside: {}  Outside: {}",
                self.hood.snapped.lon,
                self.hood.snapped.lat,
                self.hood.inside.len(),
                self.hood.outside.len())
    }

    fn bounds(&self) -> Bounds {
        Bounds::around(self.hood.snapped, self.margin)
    }

    fn style(&self) -> MapStyle {
        MapStyle::neighborhood()
    }

    fn land(&self) -> &[LandPolygon] {
        self.land
    }

    fn axis_labels(&self) -> Option<(&str, &str)> {
        Some(("Longitude (°)", "Latitude (°)"))
    }

    fn draw_overlay<DB: DrawingBackend>(&self, chart: &mut MapChart<DB>, scale: f64) -> DrawResult<DB> {
        let view = self.bounds();
        let small = px(marker_radius(20.0), scale);
        let visible = |n: &&Node| view.contains(n);
        chart.draw_series(self.hood
            .inside
            .iter()
            .filter(visible)
            .map(|n| Circle::new(n.xy(), small, BLACK.filled())))?;
        chart.draw_series(self.hood
            .outside
            .iter()
            .filter(visible)
            .map(|n| Circle::new(n.xy(), small, GRAY.filled())))?;
        chart.draw_series(iter::once(Circle::new(self.hood.snapped.xy(),
                                                 px(marker_radius(60.0), scale),
                                                 RED.filled())))?;

        let circle = xy(&self.hood.circle(CIRCLE_SAMPLES));
        let dash_style = BLACK.stroke_width(px(1.0, scale));
        let dashes = (0..circle.len())
            .step_by(DASH + GAP)
            .map(|start| circle[start..(start + DASH + 1).min(circle.len())].to_vec())
            .filter(|dash| dash.len() >= 2)
            .map(|dash| PathElement::new(dash, dash_style));
        chart.draw_series(dashes)?;
        Ok(())
    }
}
