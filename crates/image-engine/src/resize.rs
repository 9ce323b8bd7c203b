//! Image resizing with optional aspect-ratio preservation.
//!
//! Computes target dimensions for a bounding box and maps the caller's
//! interpolation choice onto the `image` crate's filters.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Interpolation used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Nearest,
    Linear,
    Cubic,
    /// Box averaging. Suited to shrinking; enlarging falls back to `Linear`.
    Area,
    Lanczos,
    /// `Area` when shrinking, `Linear` when enlarging.
    #[default]
    Auto,
}

impl Interpolation {
    /// Resolve `Auto` (and enlarging `Area`) into a concrete mode.
    pub fn resolve(self, from: (u32, u32), to: (u32, u32)) -> Interpolation {
        let shrinking = to.0 < from.0 || to.1 < from.1;
        match self {
            Interpolation::Auto if shrinking => Interpolation::Area,
            Interpolation::Auto => Interpolation::Linear,
            Interpolation::Area if !shrinking => Interpolation::Linear,
            other => other,
        }
    }
}

/// Dimensions an image of `source` size takes when fitted to `target`.
///
/// Returns `None` when either target dimension is zero (no resize).
pub fn target_dimensions(
    source: (u32, u32),
    target: (u32, u32),
    keep_aspect: bool,
) -> Option<(u32, u32)> {
    let (tw, th) = target;
    if tw == 0 || th == 0 {
        return None;
    }
    if !keep_aspect {
        return Some((tw, th));
    }

    let (sw, sh) = source;
    let scale = (f64::from(tw) / f64::from(sw)).min(f64::from(th) / f64::from(sh));
    let new_w = (f64::from(sw) * scale).round().max(1.0) as u32;
    let new_h = (f64::from(sh) * scale).round().max(1.0) as u32;
    Some((new_w, new_h))
}

/// Resize an image to exactly `width` x `height`.
///
/// Returns the original image unchanged if it already has that size.
pub fn resize_exact(
    img: DynamicImage,
    width: u32,
    height: u32,
    interpolation: Interpolation,
) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if (orig_w, orig_h) == (width, height) {
        debug!(width, height, "Image already at target size, skipping resize");
        return img;
    }

    let mode = interpolation.resolve((orig_w, orig_h), (width, height));
    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        ?mode,
        "Resizing image"
    );

    let filter = match mode {
        Interpolation::Nearest => FilterType::Nearest,
        Interpolation::Cubic => FilterType::CatmullRom,
        Interpolation::Lanczos => FilterType::Lanczos3,
        Interpolation::Area => return img.thumbnail_exact(width, height),
        Interpolation::Linear | Interpolation::Auto => FilterType::Triangle,
    };
    img.resize_exact(width, height, filter)
}

/// Fit an image into `target`, preserving aspect ratio if requested.
///
/// A zero target dimension leaves the image untouched.
pub fn fit(
    img: DynamicImage,
    target: (u32, u32),
    keep_aspect: bool,
    interpolation: Interpolation,
) -> DynamicImage {
    match target_dimensions((img.width(), img.height()), target, keep_aspect) {
        Some((w, h)) => resize_exact(img, w, h, interpolation),
        None => {
            debug!(?target, "Target has a zero dimension, skipping resize");
            img
        }
    }
}
