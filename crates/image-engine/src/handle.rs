//! The image handle: zero or one decoded raster plus its operations.

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info};

use crate::channels::{self, Channels};
use crate::display::Viewer;
use crate::resize::{self, Interpolation};
use crate::text::{self, TextStyle, Typeface};
use crate::{ImageError, Result, Role};

/// Title used for the display window.
pub const WINDOW_TITLE: &str = "Image";

/// An owned, optionally loaded image.
///
/// Starts empty and becomes loaded through [`Img::read`]. Loaded images are
/// always 8-bit gray, color, or color+alpha.
#[derive(Debug, Clone, Default)]
pub struct Img {
    image: Option<DynamicImage>,
}

impl Img {
    /// Create an empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an in-memory image.
    pub fn from_image(img: DynamicImage) -> Self {
        Self {
            image: Some(channels::normalize(img)),
        }
    }

    /// Load `path` with no resize.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut img = Self::new();
        img.read(path, None, false, Interpolation::Auto)?;
        Ok(img)
    }

    /// Load `path` into the handle and optionally resize it.
    ///
    /// With `keep_aspect` the image is scaled uniformly so it fits inside
    /// `size`; otherwise it is resized to exactly `size`. A zero dimension in
    /// `size` skips the resize. On failure the previous contents are kept.
    pub fn read(
        &mut self,
        path: impl AsRef<Path>,
        size: Option<(u32, u32)>,
        keep_aspect: bool,
        interpolation: Interpolation,
    ) -> Result<&mut Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| ImageError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ImageError::Load {
                path: path.to_path_buf(),
                reason: "decoded image is empty".into(),
            });
        }

        let mut img = channels::normalize(decoded);
        info!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            channels = Channels::of(&img).count(),
            "Loaded image"
        );

        if let Some(target) = size {
            img = resize::fit(img, target, keep_aspect, interpolation);
        }

        self.image = Some(img);
        Ok(self)
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    /// Width in pixels, 0 when empty.
    pub fn width(&self) -> u32 {
        self.image.as_ref().map_or(0, DynamicImage::width)
    }

    /// Height in pixels, 0 when empty.
    pub fn height(&self) -> u32 {
        self.image.as_ref().map_or(0, DynamicImage::height)
    }

    /// Channel layout, `None` when empty.
    pub fn channels(&self) -> Option<Channels> {
        self.image.as_ref().map(Channels::of)
    }

    /// The loaded raster, if any.
    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    /// Draw this image onto `other` with its top-left corner at `(x, y)`.
    ///
    /// Alpha sources are blended, others overwrite. The placement must fit
    /// entirely inside `other`.
    pub fn draw_on(&self, other: &mut Img, x: i64, y: i64) -> Result<()> {
        let source = self.image.as_ref().ok_or(ImageError::NotLoaded(Role::Source))?;
        let target = other
            .image
            .as_mut()
            .ok_or(ImageError::NotLoaded(Role::Target))?;
        crate::compose::draw_onto(source, target, x, y)
    }

    /// Render `txt` with its baseline starting at `(x, y)`.
    pub fn put_text(
        &mut self,
        txt: &str,
        x: i32,
        y: i32,
        font: &Typeface,
        style: &TextStyle,
    ) -> Result<()> {
        let img = self.image.as_mut().ok_or(ImageError::NotLoaded(Role::Image))?;
        text::draw_text_baseline(img, font, style, x, y, txt);
        Ok(())
    }

    /// Present the image through `viewer`, blocking until it returns.
    pub fn show(&self, viewer: &mut impl Viewer) -> Result<()> {
        let img = self.image.as_ref().ok_or(ImageError::NotLoaded(Role::Image))?;
        debug!(width = img.width(), height = img.height(), "Showing image");
        viewer.present(WINDOW_TITLE, img)
    }

    /// Encode the image to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let img = self.image.as_ref().ok_or(ImageError::NotLoaded(Role::Image))?;
        img.save(path).map_err(|e| ImageError::Save {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "Saved image");
        Ok(())
    }
}
