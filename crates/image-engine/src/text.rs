//! Text rendering onto loaded images.
//!
//! Glyphs are rasterized anti-aliased by `imageproc`. Positions are given as
//! a baseline origin, and stroke thickness is emulated by stamping the glyph
//! run at every offset inside a small disc.

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, Luma, Pixel, Rgb, Rgba};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, warn};

use crate::{ImageError, Result};

/// Glyph height in pixels at a font scale of 1.0.
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// Fonts tried by [`Typeface::discover`], in order.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A parsed TTF/OTF font.
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
}

impl Typeface {
    /// Parse font data already in memory.
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data)
            .map_err(|_| ImageError::Font("failed to parse font data (TTF/OTF)".into()))?;
        Ok(Self { font })
    }

    /// Read and parse a font file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ImageError::Font(format!("cannot read {}: {e}", path.display())))?;
        Self::from_vec(data)
    }

    /// First loadable font among `candidates`.
    pub fn discover<P: AsRef<Path>>(candidates: &[P]) -> Option<Self> {
        for path in candidates {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(face) => {
                    debug!(path = %path.display(), "Using font");
                    return Some(face);
                }
                Err(e) => warn!("Skipping font candidate: {e}"),
            }
        }
        None
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    /// Distance in whole pixels from the top of the line box to the baseline.
    pub fn ascent(&self, style: &TextStyle) -> i32 {
        self.font.as_scaled(style.px_scale()).ascent().round() as i32
    }
}

/// How text is stamped: scale factor, color and stroke thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Multiplier on [`DEFAULT_FONT_SIZE`].
    pub font_scale: f32,
    pub color: Rgba<u8>,
    pub thickness: u32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_scale: 1.0,
            color: Rgba([255, 255, 255, 255]),
            thickness: 1,
        }
    }
}

impl TextStyle {
    pub fn new(font_scale: f32, color: Rgba<u8>, thickness: u32) -> Self {
        Self {
            font_scale,
            color,
            thickness,
        }
    }

    /// Style with an opaque three-channel color.
    pub fn with_rgb(font_scale: f32, rgb: [u8; 3], thickness: u32) -> Self {
        Self::new(font_scale, Rgba([rgb[0], rgb[1], rgb[2], 255]), thickness)
    }

    pub fn px_scale(&self) -> PxScale {
        PxScale::from(self.font_scale * DEFAULT_FONT_SIZE)
    }
}

/// Stroke radius for `style`, capped at the glyph pixel height.
pub fn stroke_radius(style: &TextStyle) -> u32 {
    let glyph_px = style.px_scale().y.ceil().max(0.0) as u32;
    (style.thickness / 2).min(glyph_px)
}

/// Offsets inside a disc of `radius` at which the glyph run is stamped.
pub fn stroke_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = i64::from(radius);
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                offsets.push((dx as i32, dy as i32));
            }
        }
    }
    offsets
}

/// Bounding size in pixels of `text` drawn with `style`, stroke included.
///
/// Width follows glyph advances and kerning; height spans ascent to descent.
pub fn text_size(typeface: &Typeface, style: &TextStyle, text: &str) -> (u32, u32) {
    let scaled = typeface.font().as_scaled(style.px_scale());
    let (advance, _) = text
        .chars()
        .map(|ch| scaled.glyph_id(ch))
        .fold((0.0f32, None), |(w, prev), id| {
            let kern = prev.map_or(0.0, |p| scaled.kern(p, id));
            (w + kern + scaled.h_advance(id), Some(id))
        });
    let stroke = 2 * stroke_radius(style);
    let height = scaled.ascent() - scaled.descent();
    (
        (advance.ceil().max(0.0) as u32).saturating_add(stroke),
        (height.ceil().max(0.0) as u32).saturating_add(stroke),
    )
}

/// Draw `text` onto `img` with its baseline starting at `(x, y)`.
pub fn draw_text_baseline(
    img: &mut DynamicImage,
    typeface: &Typeface,
    style: &TextStyle,
    x: i32,
    y: i32,
    text: &str,
) {
    let font = typeface.font();
    let scale = style.px_scale();
    // imageproc positions the top of the line box.
    let top = y.saturating_sub(typeface.ascent(style));
    let offsets = stroke_offsets(stroke_radius(style));
    let c = style.color;
    debug!(x, y, top, scale = scale.y, strokes = offsets.len(), "Drawing text");

    for (dx, dy) in offsets {
        let (ox, oy) = (x.saturating_add(dx), top.saturating_add(dy));
        match &mut *img {
            DynamicImage::ImageLuma8(buf) => {
                let luma: Luma<u8> = c.to_luma();
                draw_text_mut(buf, luma, ox, oy, scale, font, text);
            }
            DynamicImage::ImageRgb8(buf) => {
                draw_text_mut(buf, Rgb([c[0], c[1], c[2]]), ox, oy, scale, font, text);
            }
            DynamicImage::ImageRgba8(buf) => {
                draw_text_mut(buf, c, ox, oy, scale, font, text);
            }
            other => {
                let mut widened = other.to_rgba8();
                draw_text_mut(&mut widened, c, ox, oy, scale, font, text);
                *other = DynamicImage::ImageRgba8(widened);
            }
        }
    }
}
