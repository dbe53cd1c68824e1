use super::{ExportError, CAPTURE_SCALE, SLIDE_SIZE};
use crate::{
    deck::Slide,
    render::text::WordWrapper,
    style::{Gradient, ParseGradientError},
};
use fontdue::{Font, FontSettings};
use image::RgbaImage;
use log::{debug, warn};
use std::{fs, path::Path};
use tiny_skia::{GradientStop, LinearGradient, Paint, Pixmap, Point, Rect, SpreadMode, Transform};

// Fonts tried in order when none is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

// All distances are in CSS pixels and get multiplied by the capture scale when drawing.
const PADDING: f32 = 64.0;

const ICON: TextStyle =
    TextStyle { size: 80.0, line_height: 1.2, bold: false, opacity: 1.0, margin_bottom: 24.0, max_width: 1.0 };
const TITLE: TextStyle =
    TextStyle { size: 56.0, line_height: 1.2, bold: true, opacity: 1.0, margin_bottom: 24.0, max_width: 1.0 };
const SUBTITLE: TextStyle =
    TextStyle { size: 32.0, line_height: 1.2, bold: false, opacity: 0.9, margin_bottom: 40.0, max_width: 1.0 };
const BODY: TextStyle =
    TextStyle { size: 24.0, line_height: 1.8, bold: false, opacity: 0.95, margin_bottom: 0.0, max_width: 0.85 };

/// Something that can draw a slide into an image.
pub(crate) trait SlideCapture {
    fn capture(&mut self, slide: &Slide) -> Result<RgbaImage, CaptureError>;
}

/// An error while capturing a slide.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("invalid background: {0}")]
    Background(#[from] ParseGradientError),

    #[error("cannot allocate a {0}x{1} canvas")]
    Canvas(u32, u32),
}

struct TextStyle {
    size: f32,
    line_height: f32,
    bold: bool,
    opacity: f32,
    margin_bottom: f32,
    // A fraction of the available content width.
    max_width: f32,
}

impl TextStyle {
    fn line_box(&self) -> f32 {
        self.size * self.line_height
    }
}

struct Glyph<'a> {
    left: i32,
    top: i32,
    width: usize,
    coverage: &'a [u8],
}

/// Draws slides off-screen the same way they look when presented.
///
/// The background gradient covers the whole slide and the text is drawn in white on top of it,
/// vertically centered within the slide's padding. Without a font only the background is drawn.
pub(crate) struct SlideRasterizer {
    font: Option<Font>,
    scale: u32,
}

impl SlideRasterizer {
    pub(crate) fn new(font: Option<Font>) -> Self {
        Self { font, scale: CAPTURE_SCALE }
    }

    fn paint_background(&self, pixmap: &mut Pixmap, gradient: &Gradient) {
        let (width, height) = (pixmap.width() as f32, pixmap.height() as f32);
        let ((x0, y0), (x1, y1)) = gradient.line(width, height);
        let stops = gradient
            .stops()
            .iter()
            .map(|stop| {
                let [r, g, b] = stop.color.as_array();
                GradientStop::new(stop.position, tiny_skia::Color::from_rgba8(r, g, b, 255))
            })
            .collect();
        let (start, end) = (Point::from_xy(x0, y0), Point::from_xy(x1, y1));
        let shader = LinearGradient::new(start, end, stops, SpreadMode::Pad, Transform::identity());
        match (shader, Rect::from_xywh(0.0, 0.0, width, height)) {
            (Some(shader), Some(rect)) => {
                let paint = Paint { shader, anti_alias: false, ..Default::default() };
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
            }
            _ => {
                let [r, g, b] = gradient.color_at(0.0).as_array();
                pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
            }
        }
    }

    fn draw_text(&self, pixmap: &mut Pixmap, font: &Font, slide: &Slide) {
        let content_width = SLIDE_SIZE.0 as f32 - PADDING * 2.0;
        let content_height = SLIDE_SIZE.1 as f32 - PADDING * 2.0;
        let blocks = [(slide.icon, &ICON), (slide.title, &TITLE), (slide.subtitle, &SUBTITLE), (slide.body, &BODY)];
        let blocks: Vec<(Vec<String>, &TextStyle)> = blocks
            .into_iter()
            .map(|(text, style)| {
                let measure_width = |text: &str| measure(font, text, style.size);
                let wrapper = WordWrapper::new(content_width * style.max_width, measure_width);
                (wrapper.wrap(text), style)
            })
            .collect();
        let total_height: f32 =
            blocks.iter().map(|(lines, style)| lines.len() as f32 * style.line_box() + style.margin_bottom).sum();
        let mut top = PADDING + ((content_height - total_height) / 2.0).max(0.0);
        for (lines, style) in blocks {
            let (ascent, descent) = match font.horizontal_line_metrics(style.size) {
                Some(metrics) => (metrics.ascent, metrics.descent),
                None => (style.size * 0.8, style.size * -0.2),
            };
            let half_leading = (style.line_box() - (ascent - descent)) / 2.0;
            for line in lines {
                self.draw_line(pixmap, font, &line, PADDING, top + half_leading + ascent, style);
                top += style.line_box();
            }
            top += style.margin_bottom;
        }
    }

    fn draw_line(&self, pixmap: &mut Pixmap, font: &Font, text: &str, left: f32, baseline: f32, style: &TextStyle) {
        let scale = self.scale as f32;
        let size = style.size * scale;
        let baseline = baseline * scale;
        let mut pen = left * scale;
        for character in text.chars() {
            // Color emoji and anything else the font lacks are skipped rather than drawn as boxes.
            if font.lookup_glyph_index(character) == 0 {
                pen += font.metrics(character, size).advance_width;
                continue;
            }
            let (metrics, coverage) = font.rasterize(character, size);
            let glyph = Glyph {
                left: (pen + metrics.xmin as f32).round() as i32,
                top: (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32,
                width: metrics.width,
                coverage: &coverage,
            };
            blend_white(pixmap, &glyph, style.opacity);
            if style.bold {
                let shifted = Glyph { left: glyph.left + self.scale as i32, ..glyph };
                blend_white(pixmap, &shifted, style.opacity);
            }
            pen += metrics.advance_width;
        }
    }
}

impl SlideCapture for SlideRasterizer {
    fn capture(&mut self, slide: &Slide) -> Result<RgbaImage, CaptureError> {
        let gradient = slide.gradient()?;
        let (width, height) = (SLIDE_SIZE.0 * self.scale, SLIDE_SIZE.1 * self.scale);
        let mut pixmap = Pixmap::new(width, height).ok_or(CaptureError::Canvas(width, height))?;
        self.paint_background(&mut pixmap, &gradient);
        if let Some(font) = &self.font {
            self.draw_text(&mut pixmap, font, slide);
        }
        // The background is opaque so premultiplied and straight alpha are the same thing here.
        RgbaImage::from_raw(width, height, pixmap.take()).ok_or(CaptureError::Canvas(width, height))
    }
}

fn measure(font: &Font, text: &str, size: f32) -> f32 {
    text.chars().map(|c| font.metrics(c, size).advance_width).sum()
}

// Blends white text into an opaque canvas using the glyph's coverage as alpha.
fn blend_white(pixmap: &mut Pixmap, glyph: &Glyph, opacity: f32) {
    if glyph.width == 0 {
        return;
    }
    let (width, height) = (pixmap.width() as i32, pixmap.height() as i32);
    let stride = pixmap.width() as usize * 4;
    let data = pixmap.data_mut();
    for (row, coverage_row) in glyph.coverage.chunks(glyph.width).enumerate() {
        let y = glyph.top + row as i32;
        if y < 0 || y >= height {
            continue;
        }
        for (column, coverage) in coverage_row.iter().enumerate() {
            let x = glyph.left + column as i32;
            if x < 0 || x >= width || *coverage == 0 {
                continue;
            }
            let alpha = *coverage as f32 / 255.0 * opacity;
            let offset = y as usize * stride + x as usize * 4;
            for channel in &mut data[offset..offset + 3] {
                *channel = (*channel as f32 + (255.0 - *channel as f32) * alpha).round() as u8;
            }
        }
    }
}

/// Load the font used to draw text into captured slides.
///
/// An explicitly configured font must load. Otherwise a few well known system fonts are tried
/// and `None` is returned if none of them is usable.
pub(crate) fn load_font(path: Option<&Path>) -> Result<Option<Font>, ExportError> {
    if let Some(path) = path {
        return read_font(path).map(Some);
    }
    for candidate in SYSTEM_FONTS {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match read_font(path) {
            Ok(font) => {
                debug!("using font {}", path.display());
                return Ok(Some(font));
            }
            Err(e) => warn!("skipping font: {e}"),
        }
    }
    warn!("no usable font found, slides will be exported without text");
    Ok(None)
}

fn read_font(path: &Path) -> Result<Font, ExportError> {
    let data = fs::read(path).map_err(|e| ExportError::Font { path: path.into(), reason: e.to_string() })?;
    Font::from_bytes(data, FontSettings::default())
        .map_err(|e| ExportError::Font { path: path.into(), reason: e.to_string() })
}
