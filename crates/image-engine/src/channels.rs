//! Channel layouts and normalization of decoded images.

use image::{ColorType, DynamicImage};
use tracing::debug;

/// Channel layout of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray,
    Color,
    ColorAlpha,
}

impl Channels {
    /// Number of samples per pixel.
    pub fn count(self) -> u8 {
        match self {
            Channels::Gray => 1,
            Channels::Color => 3,
            Channels::ColorAlpha => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        self == Channels::ColorAlpha
    }

    /// Layout of an image already passed through [`normalize`]. Any layout
    /// carrying alpha maps to [`Channels::ColorAlpha`].
    pub fn of(img: &DynamicImage) -> Self {
        match img.color() {
            ColorType::L8 | ColorType::L16 => Channels::Gray,
            c if c.has_alpha() => Channels::ColorAlpha,
            _ => Channels::Color,
        }
    }
}

/// Convert a decoded image into one of the three supported 8-bit layouts.
///
/// Gray+alpha becomes color+alpha; deeper sample types are reduced to 8 bits
/// without changing the layout class.
pub fn normalize(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
            img
        }
        other => {
            let color = other.color();
            debug!(?color, "Normalizing decoded image to 8-bit layout");
            match color {
                ColorType::L16 => DynamicImage::ImageLuma8(other.to_luma8()),
                c if c.has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
                _ => DynamicImage::ImageRgb8(other.to_rgb8()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, ImageBuffer, LumaA, Rgb, RgbImage};

    #[test]
    fn counts_match_layouts() {
        assert_eq!(Channels::Gray.count(), 1);
        assert_eq!(Channels::Color.count(), 3);
        assert_eq!(Channels::ColorAlpha.count(), 4);
        assert!(Channels::ColorAlpha.has_alpha());
        assert!(!Channels::Color.has_alpha());
    }

    #[test]
    fn gray_alpha_becomes_color_alpha() {
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(2, 2, LumaA([40, 7])));
        let norm = normalize(img);
        assert_eq!(Channels::of(&norm), Channels::ColorAlpha);
        assert_eq!(norm.to_rgba8().get_pixel(0, 0).0, [40, 40, 40, 7]);
    }

    #[test]
    fn sixteen_bit_color_is_reduced() {
        let img: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::from_pixel(3, 1, Rgb([65535, 0, 0]));
        let norm = normalize(DynamicImage::ImageRgb16(img));
        assert!(matches!(norm, DynamicImage::ImageRgb8(_)));
        assert_eq!(norm.to_rgb8().get_pixel(2, 0).0, [255, 0, 0]);
    }

    #[test]
    fn eight_bit_color_passes_through() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([1, 2, 3])));
        let norm = normalize(img);
        assert_eq!(Channels::of(&norm), Channels::Color);
    }
}
