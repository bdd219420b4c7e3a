//! A small vector PDF backend for plotters.
//!
//! Everything drawn on the page is kept as PDF content-stream operators and written out as a
//! single-page document on `present`. Text uses the standard Type 1 fonts with WinAnsi
//! encoding, so no font files are embedded and nothing has to be installed to render a figure.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{BackendColor, BackendCoord, BackendStyle, BackendTextStyle,
                       DrawingBackend, DrawingErrorKind, FontFamily, FontStyle, FontTransform};

/// Bezier control distance for a quarter circle.
const KAPPA: f64 = 0.552_284_75;

/// Base fonts referenced by the page, in resource order `/F1`..`/F4`.
const FONTS: [&str; 4] = ["Helvetica", "Helvetica-Bold", "Times-Roman", "Courier"];

enum Target<'a> {
    File(PathBuf),
    Buffer(&'a mut Vec<u8>),
}

/// Drawing backend that renders into a one-page PDF document. Coordinates are PDF points.
pub struct PdfBackend<'a> {
    target: Target<'a>,
    size: (u32, u32),
    content: String,
    saved: bool,
}

impl<'a> PdfBackend<'a> {
    /// Create a backend writing a page of `size` points to the file at `path`.
    pub fn new<P: AsRef<Path> + ?Sized>(path: &P, size: (u32, u32)) -> PdfBackend<'a> {
        PdfBackend::with_target(Target::File(path.as_ref().to_path_buf()), size)
    }

    /// Create a backend writing the document into `buf`.
    pub fn with_buffer(buf: &'a mut Vec<u8>, size: (u32, u32)) -> PdfBackend<'a> {
        PdfBackend::with_target(Target::Buffer(buf), size)
    }

    fn with_target(target: Target<'a>, size: (u32, u32)) -> PdfBackend<'a> {
        PdfBackend {
            target,
            size,
            // Round joins and caps for every path on the page.
            content: String::from("1 j 1 J\n"),
            saved: false,
        }
    }

    #[inline]
    fn y(&self, y: f64) -> f64 {
        f64::from(self.size.1) - y
    }

    fn set_stroke(&mut self, color: BackendColor, width: u32) {
        let (r, g, b) = blend(color);
        let _ = writeln!(self.content, "{} {} {} RG {} w", r, g, b, width.max(1));
    }

    fn set_fill(&mut self, color: BackendColor) {
        let (r, g, b) = blend(color);
        let _ = writeln!(self.content, "{} {} {} rg", r, g, b);
    }

    fn move_to(&mut self, (x, y): BackendCoord) {
        let y = self.y(f64::from(y));
        let _ = write!(self.content, "{} {} m ", x, y);
    }

    fn line_to(&mut self, (x, y): BackendCoord) {
        let y = self.y(f64::from(y));
        let _ = write!(self.content, "{} {} l ", x, y);
    }

    fn paint(&mut self, fill: bool) {
        self.content.push_str(if fill { "f\n" } else { "S\n" });
    }

    /// Serialize the page into a complete PDF file.
    fn document(&self) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        ];
        let fonts: String = (0..FONTS.len())
            .map(|i| format!("/F{} {} 0 R ", i + 1, i + 5))
            .collect();
        objects.push(format!("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                              /Resources << /Font << {}>> >> /Contents 4 0 R >>",
                             self.size.0,
                             self.size.1,
                             fonts));
        objects.push(format!("<< /Length {} >>\nstream\n{}endstream",
                             self.content.len(),
                             self.content));
        for name in &FONTS {
            objects.push(format!("<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                                  /Encoding /WinAnsiEncoding >>",
                                 name));
        }

        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref = out.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            let _ = writeln!(table, "{:010} 00000 n ", offset);
        }
        let _ = write!(table,
                       "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                       objects.len() + 1,
                       xref);
        out.extend_from_slice(table.as_bytes());
        out
    }
}

/// Colour channels in [0, 1], with alpha flattened against a white page.
fn blend(color: BackendColor) -> (String, String, String) {
    let a = color.alpha.clamp(0.0, 1.0);
    let channel = |c: u8| format!("{:.3}", (f64::from(c) * a + 255.0 * (1.0 - a)) / 255.0);
    (channel(color.rgb.0), channel(color.rgb.1), channel(color.rgb.2))
}

/// Map a character to its WinAnsi code, `?` when it has none.
fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        _ => b'?',
    }
}

/// Advance width of a Helvetica glyph, in thousandths of the font size. Close enough for
/// laying out labels.
fn glyph_width(c: char) -> u32 {
    match c {
        'i' | 'j' | 'l' => 222,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'f' | 't' | 'I' | '/' => 278,
        '(' | ')' | '-' | 'r' | '[' | ']' => 333,
        '•' => 350,
        '°' => 400,
        'm' | 'M' => 833,
        'W' => 944,
        'w' => 722,
        'a'..='z' => 556,
        'A'..='Z' => 667,
        _ => 556,
    }
}

fn text_width(text: &str, size: f64) -> f64 {
    text.chars().map(glyph_width).sum::<u32>() as f64 * size / 1000.0
}

fn font_resource(family: FontFamily, style: FontStyle) -> usize {
    match (family, style) {
        (FontFamily::Serif, _) => 3,
        (FontFamily::Monospace, _) => 4,
        (_, FontStyle::Bold) => 2,
        _ => 1,
    }
}

impl<'a> DrawingBackend for PdfBackend<'a> {
    type ErrorType = io::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.saved {
            return Ok(());
        }
        let bytes = self.document();
        match self.target {
            Target::File(ref path) => {
                fs::write(path, &bytes).map_err(DrawingErrorKind::DrawingError)?
            }
            Target::Buffer(ref mut buf) => {
                buf.clear();
                buf.extend_from_slice(&bytes);
            }
        }
        self.saved = true;
        Ok(())
    }

    fn draw_pixel(&mut self,
                  (x, y): BackendCoord,
                  color: BackendColor)
                  -> Result<(), DrawingErrorKind<io::Error>> {
        if color.alpha == 0.0 {
            return Ok(());
        }
        self.set_fill(color);
        let y = self.y(f64::from(y + 1));
        let _ = writeln!(self.content, "{} {} 1 1 re f", x, y);
        Ok(())
    }

    fn draw_line<S: BackendStyle>(&mut self,
                                  from: BackendCoord,
                                  to: BackendCoord,
                                  style: &S)
                                  -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width());
        self.move_to(from);
        self.line_to(to);
        self.paint(false);
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(&mut self,
                                  upper_left: BackendCoord,
                                  bottom_right: BackendCoord,
                                  style: &S,
                                  fill: bool)
                                  -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        if fill {
            self.set_fill(style.color());
        } else {
            self.set_stroke(style.color(), style.stroke_width());
        }
        let bottom = self.y(f64::from(bottom_right.1));
        let _ = write!(self.content,
                       "{} {} {} {} re ",
                       upper_left.0,
                       bottom,
                       bottom_right.0 - upper_left.0,
                       bottom_right.1 - upper_left.1);
        self.paint(fill);
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>
        (&mut self,
         path: I,
         style: &S)
         -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = path.into_iter().collect();
        if points.len() < 2 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width());
        self.move_to(points[0]);
        for &p in &points[1..] {
            self.line_to(p);
        }
        self.paint(false);
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(&mut self,
                                    (cx, cy): BackendCoord,
                                    radius: u32,
                                    style: &S,
                                    fill: bool)
                                    -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        if fill {
            self.set_fill(style.color());
        } else {
            self.set_stroke(style.color(), style.stroke_width());
        }
        let (x, y, r) = (f64::from(cx), self.y(f64::from(cy)), f64::from(radius));
        let k = r * KAPPA;
        let _ = write!(self.content,
                       "{} {} m {} {} {} {} {} {} c {} {} {} {} {} {} c \
                        {} {} {} {} {} {} c {} {} {} {} {} {} c h ",
                       x + r, y,
                       x + r, y + k, x + k, y + r, x, y + r,
                       x - k, y + r, x - r, y + k, x - r, y,
                       x - r, y - k, x - k, y - r, x, y - r,
                       x + k, y - r, x + r, y - k, x + r, y);
        self.paint(fill);
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>
        (&mut self,
         vert: I,
         style: &S)
         -> Result<(), DrawingErrorKind<io::Error>> {
        if style.color().alpha == 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = vert.into_iter().collect();
        if points.len() < 3 {
            return Ok(());
        }
        self.set_fill(style.color());
        self.move_to(points[0]);
        for &p in &points[1..] {
            self.line_to(p);
        }
        self.content.push_str("h ");
        self.paint(true);
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(&mut self,
                                           text: &str,
                                           style: &TStyle,
                                           (x, y): BackendCoord)
                                           -> Result<(), DrawingErrorKind<io::Error>> {
        let color = style.color();
        if color.alpha == 0.0 || text.is_empty() {
            return Ok(());
        }
        let size = style.size();
        let width = text_width(text, size);
        let anchor = style.anchor();
        // Offset from the anchor to the start of the baseline, in the unrotated text frame.
        let dx = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => size * 0.8,
            VPos::Center => size * 0.35,
            VPos::Bottom => -size * 0.2,
        };
        // Clockwise turns on screen.
        let (sin, cos) = match style.transform() {
            FontTransform::None => (0.0, 1.0),
            FontTransform::Rotate90 => (1.0, 0.0),
            FontTransform::Rotate180 => (0.0, -1.0),
            FontTransform::Rotate270 => (-1.0, 0.0),
        };
        let bx = f64::from(x) + dx * cos - dy * sin;
        let by = f64::from(y) + dx * sin + dy * cos;
        let hex: String = text.chars().map(|c| format!("{:02X}", win_ansi(c))).collect();
        let baseline = self.y(by);
        self.set_fill(color);
        let _ = writeln!(self.content,
                         "BT /F{} {:.2} Tf {} {} {} {} {:.2} {:.2} Tm <{}> Tj ET",
                         font_resource(style.family(), style.style()),
                         size,
                         cos,
                         -sin,
                         sin,
                         cos,
                         bx,
                         baseline,
                         hex);
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(&self,
                                                    text: &str,
                                                    style: &TStyle)
                                                    -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        let size = style.size();
        Ok((text_width(text, size).ceil() as u32, size.ceil() as u32))
    }
}
