use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbImage;
use plotters::prelude::*;
use tracing::info;

use crate::config::{ExportConfig, Format};
use crate::error::{Error, Result};
use crate::pdf::PdfBackend;
use crate::render::Figure;

/// Base name of an input file without directory or extension, e.g. `al092011` for
/// `data/al092011.txt`.
pub fn output_base<P: AsRef<Path>>(input: P) -> String {
    input.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `base` with `.ext` appended. Unlike `Path::with_extension` this keeps any dots already in the
/// base name.
pub fn output_path(base: &Path, format: Format) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

fn drawing_error<E: std::error::Error>(e: E) -> Error {
    Error::Drawing(e.to_string())
}

/// Render `figure` once per configured format. The configured size is an upper bound; the page is
/// cropped to the map. It is drawn completely in memory and only written when drawing succeeded,
/// so a failure never leaves a partial file behind.
pub fn save_figure<F: Figure>(figure: &F, base: &Path, config: &ExportConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(config.formats.len());
    for &format in &config.formats {
        let start = Instant::now();
        let path = output_path(base, format);
        let scale = config.scale(format);
        match format {
            Format::Png => {
                let (w, h) = figure.page_size(config.pixel_size(), scale);
                let mut buf = vec![0u8; w as usize * h as usize * 3];
                {
                    let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
                    figure.draw(&root, scale).map_err(drawing_error)?;
                    root.present().map_err(drawing_error)?;
                }
                let img = RgbImage::from_raw(w, h, buf)
                    .ok_or_else(|| Error::Drawing("raster buffer has the wrong size".to_string()))?;
                img.save(&path)?;
            }
            Format::Pdf => {
                let size = figure.page_size(config.point_size(), scale);
                let root = PdfBackend::new(&path, size).into_drawing_area();
                figure.draw(&root, scale).map_err(drawing_error)?;
                root.present().map_err(drawing_error)?;
            }
        }
        info!("wrote {} in {} ms", path.display(), start.elapsed().as_millis());
        written.push(path);
    }
    Ok(written)
}
