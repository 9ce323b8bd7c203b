//! Image handle for loading, resizing, compositing and annotating sprites.
//!
//! Decoding and filtering are delegated to the `image` crate, glyph
//! rasterization to `imageproc`/`ab_glyph`, and window presentation to
//! `winit`/`softbuffer`. The blending math lives in [`compose`].

pub mod channels;
pub mod compose;
pub mod display;
pub mod handle;
pub mod resize;
pub mod text;

// Re-exports for convenience
pub use image;
pub use channels::Channels;
pub use display::{Viewer, WindowViewer};
pub use handle::Img;
pub use resize::Interpolation;
pub use text::{TextStyle, Typeface};

use std::path::PathBuf;

/// Which side of an operation was missing its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The image being drawn.
    Source,
    /// The image being drawn onto.
    Target,
    /// The single image of a one-handle operation.
    Image,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Source => f.write_str("source"),
            Role::Target => f.write_str("target"),
            Role::Image => f.write_str("image"),
        }
    }
}

/// Errors that can occur during image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Cannot load image {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("Image not loaded ({0})")]
    NotLoaded(Role),

    #[error(
        "Patch {width}x{height} at ({x}, {y}) exceeds destination bounds {target_width}x{target_height}"
    )]
    Bounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Cannot save image {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },
}

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;
