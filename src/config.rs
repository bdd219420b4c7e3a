use plotters::style::RGBColor;

/// Points per inch in PDF user space.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Margin around a storm track, in degrees.
pub const TRACK_MARGIN: f64 = 2.0;
/// Half-width of the window around a snapped lattice point, in degrees.
pub const NEIGHBORHOOD_MARGIN: f64 = 5.0;
/// Neighbourhood size used by `plot-circle`.
pub const NEIGHBORHOOD_K: usize = 101;
/// Default target of `plot-circle`, as (lon, lat).
pub const DEFAULT_TARGET: (f64, f64) = (-55.0, 13.0);
/// Base name of the `plot-circle` output files.
pub const NEIGHBORHOOD_BASE: &str = "example";

/// Output file kinds written by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Pdf,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Pdf => "pdf",
        }
    }
}

/// Figure geometry and the file formats to write.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Largest figure size in inches, (width, height); pages are cropped to the map.
    pub size_in: (f64, f64),
    /// Raster resolution.
    pub dpi: u32,
    pub formats: Vec<Format>,
}

impl Default for ExportConfig {
    fn default() -> ExportConfig {
        ExportConfig {
            size_in: (8.0, 6.0),
            dpi: 300,
            formats: vec![Format::Png, Format::Pdf],
        }
    }
}

impl ExportConfig {
    pub fn with_dpi(mut self, dpi: u32) -> ExportConfig {
        self.dpi = dpi;
        self
    }

    /// Raster size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        ((self.size_in.0 * dpi).round() as u32, (self.size_in.1 * dpi).round() as u32)
    }

    /// Page size in PDF points.
    pub fn point_size(&self) -> (u32, u32) {
        ((self.size_in.0 * POINTS_PER_INCH).round() as u32,
         (self.size_in.1 * POINTS_PER_INCH).round() as u32)
    }

    /// Backend units per typographic point for a format. Styles are written in points and
    /// multiplied by this factor.
    pub fn scale(&self, format: Format) -> f64 {
        match format {
            Format::Png => f64::from(self.dpi) / POINTS_PER_INCH,
            Format::Pdf => 1.0,
        }
    }
}

/// Backdrop colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStyle {
    pub ocean: RGBColor,
    pub land: RGBColor,
    pub coastline: RGBColor,
}

pub const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);
pub const LIGHT_GREY: RGBColor = RGBColor(211, 211, 211);

impl MapStyle {
    /// Light blue ocean, gray land.
    pub fn track() -> MapStyle {
        MapStyle { ocean: LIGHT_BLUE, land: GRAY, coastline: RGBColor(0, 0, 0) }
    }

    /// White ocean, light grey land.
    pub fn neighborhood() -> MapStyle {
        MapStyle { ocean: RGBColor(255, 255, 255), land: LIGHT_GREY, coastline: RGBColor(0, 0, 0) }
    }
}
