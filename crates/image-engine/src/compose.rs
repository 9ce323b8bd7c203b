//! Compositing: draw one image into a rectangle of another.
//!
//! Sources with an alpha channel are blended per pixel and per color channel
//! as `dst = (1 - a) * dst + a * src`. Sources without alpha overwrite the
//! rectangle.

use image::{DynamicImage, GrayImage, Luma, Pixel, Rgba, RgbaImage};
use tracing::debug;

use crate::channels::Channels;
use crate::{ImageError, Result};

/// Composite `source` into `target` with its top-left corner at `(x, y)`.
///
/// The whole source must fit inside the target; otherwise
/// [`ImageError::Bounds`] is returned and the target is left untouched.
/// Only `[x, x + w) × [y, y + h)` of the target changes.
pub fn draw_onto(source: &DynamicImage, target: &mut DynamicImage, x: i64, y: i64) -> Result<()> {
    let (w, h) = (source.width(), source.height());
    let (tw, th) = (target.width(), target.height());

    let overflows = |start: i64, len: u32, limit: u32| {
        start < 0
            || start
                .checked_add(i64::from(len))
                .is_none_or(|end| end > i64::from(limit))
    };
    if overflows(x, w, tw) || overflows(y, h, th) {
        return Err(ImageError::Bounds {
            x,
            y,
            width: w,
            height: h,
            target_width: tw,
            target_height: th,
        });
    }
    let (x, y) = (x as u32, y as u32);

    // Widening to RGBA appends an opaque alpha for sources without one.
    let has_alpha = Channels::of(source).has_alpha();
    let src = source.to_rgba8();
    debug!(w, h, x, y, has_alpha, target = ?target.color(), "Compositing image");

    match target {
        DynamicImage::ImageLuma8(dst) => blit_gray(dst, &src, x, y, has_alpha),
        DynamicImage::ImageRgb8(dst) => {
            for (dx, dy, px) in src.enumerate_pixels() {
                let out = dst.get_pixel_mut(x + dx, y + dy);
                let a = alpha_of(px, has_alpha);
                for c in 0..3 {
                    out[c] = blend_channel(out[c], px[c], a);
                }
            }
        }
        DynamicImage::ImageRgba8(dst) => blit_rgba(dst, &src, x, y, has_alpha),
        other => {
            // Handles are normalized on load; this only covers raw images.
            let mut widened = other.to_rgba8();
            blit_rgba(&mut widened, &src, x, y, has_alpha);
            *other = convert_like(other, DynamicImage::ImageRgba8(widened));
        }
    }

    Ok(())
}

fn blit_rgba(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32, has_alpha: bool) {
    for (dx, dy, px) in src.enumerate_pixels() {
        let out = dst.get_pixel_mut(x + dx, y + dy);
        if has_alpha {
            let a = f32::from(px[3]) / 255.0;
            for c in 0..3 {
                out[c] = blend_channel(out[c], px[c], a);
            }
        } else {
            *out = *px;
        }
    }
}

fn blit_gray(dst: &mut GrayImage, src: &RgbaImage, x: u32, y: u32, has_alpha: bool) {
    for (dx, dy, px) in src.enumerate_pixels() {
        let luma = px.to_luma()[0];
        let out = dst.get_pixel_mut(x + dx, y + dy);
        let a = alpha_of(px, has_alpha);
        *out = Luma([blend_channel(out[0], luma, a)]);
    }
}

fn alpha_of(px: &Rgba<u8>, has_alpha: bool) -> f32 {
    if has_alpha {
        f32::from(px[3]) / 255.0
    } else {
        1.0
    }
}

/// Blend a single channel: `(1 - a) * dst + a * src`, rounded.
pub fn blend_channel(dst: u8, src: u8, alpha: f32) -> u8 {
    let v = (1.0 - alpha) * f32::from(dst) + alpha * f32::from(src);
    v.round().clamp(0.0, 255.0) as u8
}

fn convert_like(original: &DynamicImage, img: DynamicImage) -> DynamicImage {
    match original.color() {
        c if c.has_alpha() => img,
        c if c.has_color() => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => DynamicImage::ImageLuma8(img.to_luma8()),
    }
}
