//! The demo pipeline: load, stamp text, composite, then show or save.

use anyhow::Context;
use image_engine::text::{self, SYSTEM_FONT_CANDIDATES};
use image_engine::{ImageError, Img, Interpolation, TextStyle, Typeface, Viewer};

use crate::config::DemoConfig;

/// Font scale of the demo caption.
const CAPTION_SCALE: f32 = 3.0;
/// Blue, opaque.
const CAPTION_COLOR: [u8; 3] = [0, 0, 255];
const CAPTION_THICKNESS: u32 = 5;

/// Run the demo once and return the composed canvas.
pub fn run(config: &DemoConfig, viewer: &mut impl Viewer) -> anyhow::Result<Img> {
    let mut canvas = Img::open(&config.background).context("loading background")?;

    let mut sprite = Img::new();
    sprite
        .read(
            &config.sprite,
            Some(config.sprite_size),
            true,
            Interpolation::Area,
        )
        .context("loading sprite")?;

    let font = resolve_font(config)?;
    let style = TextStyle::with_rgb(CAPTION_SCALE, CAPTION_COLOR, CAPTION_THICKNESS);
    let (x, y) = caption_origin(&canvas, &font, &style, &config.text);
    canvas.put_text(&config.text, x, y, &font, &style)?;

    let (px, py) = config.position;
    sprite
        .draw_on(&mut canvas, px, py)
        .context("drawing sprite onto background")?;

    match &config.output {
        Some(path) => canvas.save(path)?,
        None => canvas.show(viewer)?,
    }
    Ok(canvas)
}

/// Baseline origin that centers `caption` on `canvas`.
fn caption_origin(canvas: &Img, font: &Typeface, style: &TextStyle, caption: &str) -> (i32, i32) {
    let (tw, th) = text::text_size(font, style, caption);
    let radius = text::stroke_radius(style);
    let left = canvas.width().saturating_sub(tw) / 2;
    let top = canvas.height().saturating_sub(th) / 2;
    let ascent = u32::try_from(font.ascent(style)).unwrap_or(0);
    let x = left.saturating_add(radius);
    let y = top.saturating_add(ascent).saturating_add(radius);
    (clamp_i32(x), clamp_i32(y))
}

fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn resolve_font(config: &DemoConfig) -> Result<Typeface, ImageError> {
    match &config.font {
        Some(path) => Typeface::from_file(path),
        None => Typeface::discover(SYSTEM_FONT_CANDIDATES)
            .ok_or_else(|| ImageError::Font("no usable system font found".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_engine::image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingViewer {
        shown: usize,
    }

    impl Viewer for RecordingViewer {
        fn present(&mut self, _title: &str, _image: &DynamicImage) -> image_engine::Result<()> {
            self.shown += 1;
            Ok(())
        }
    }

    fn fixture(dir: &Path) -> DemoConfig {
        let background = dir.join("board.png");
        let sprite = dir.join("sprite.png");
        RgbImage::from_pixel(400, 300, Rgb([20, 20, 20]))
            .save(&background)
            .unwrap();
        RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 255]))
            .save(&sprite)
            .unwrap();
        DemoConfig {
            background,
            sprite,
            ..DemoConfig::default()
        }
    }

    fn blank_font() -> Typeface {
        // head/hhea/maxp only: 1000 upem, ascender 800, descender -200.
        let mut head = vec![0u8; 54];
        head[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
        head[18..20].copy_from_slice(&1000u16.to_be_bytes());
        let mut hhea = vec![0u8; 36];
        hhea[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
        hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());
        let mut maxp = vec![0u8; 6];
        maxp[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
        maxp[4..6].copy_from_slice(&1u16.to_be_bytes());

        let tables = [(b"head", head), (b"hhea", hhea), (b"maxp", maxp)];
        let mut out = vec![0, 1, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0];
        let mut offset = 12 + 16 * tables.len();
        let mut body = Vec::new();
        for (tag, data) in &tables {
            out.extend_from_slice(*tag);
            out.extend_from_slice(&[0; 4]);
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            body.resize(body.len().next_multiple_of(4), 0);
            offset = 12 + 16 * tables.len() + body.len();
        }
        out.extend_from_slice(&body);
        Typeface::from_vec(out).unwrap()
    }

    #[test]
    fn caption_is_centered() {
        let canvas = Img::from_image(DynamicImage::ImageRgb8(RgbImage::new(400, 300)));
        let style = TextStyle::with_rgb(1.0, [0, 0, 255], 1);
        let font = blank_font();
        // Zero-advance glyphs: the line box is as wide as the stroke.
        let (_, h) = text::text_size(&font, &style, "Demo");
        let (x, y) = caption_origin(&canvas, &font, &style, "Demo");
        assert_eq!(x, 200);
        assert_eq!(y, ((300 - h) / 2 + 26) as i32);
    }

    #[test]
    fn caption_wider_than_canvas_hugs_top_left() {
        let font = blank_font();
        let canvas = Img::from_image(DynamicImage::ImageRgb8(RgbImage::new(10, 10)));
        // A stroke wider than the canvas.
        let style = TextStyle::with_rgb(1.0, [0, 0, 255], 40);
        let (x, y) = caption_origin(&canvas, &font, &style, "Demo");
        assert_eq!(x, 20);
        assert_eq!(y, 26 + 20);
    }

    #[test]
    fn missing_background_fails() {
        let dir = TempDir::new().unwrap();
        let config = DemoConfig {
            background: dir.path().join("nope.png"),
            ..fixture(dir.path())
        };
        let err = run(&config, &mut RecordingViewer::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImageError>(),
            Some(ImageError::Load { .. })
        ));
    }

    #[test]
    fn explicit_missing_font_fails() {
        let dir = TempDir::new().unwrap();
        let config = DemoConfig {
            font: Some(dir.path().join("missing.ttf")),
            ..fixture(dir.path())
        };
        let err = run(&config, &mut RecordingViewer::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImageError>(),
            Some(ImageError::Font(_))
        ));
    }

    #[test]
    fn composes_and_shows() {
        if Typeface::discover(SYSTEM_FONT_CANDIDATES).is_none() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let config = fixture(dir.path());
        let mut viewer = RecordingViewer::default();

        let canvas = run(&config, &mut viewer).unwrap();
        assert_eq!(viewer.shown, 1);
        assert_eq!((canvas.width(), canvas.height()), (400, 300));
        // Sprite is fitted to 100x50 and drawn at (50, 50).
        let out = canvas.image().unwrap().to_rgb8();
        let sprite_px = out.get_pixel(60, 60).0;
        assert!(sprite_px[0] > 240 && sprite_px[1] < 15, "got {sprite_px:?}");
        assert_eq!(out.get_pixel(10, 10).0, [20, 20, 20]);
    }

    #[test]
    fn saves_instead_of_showing() {
        if Typeface::discover(SYSTEM_FONT_CANDIDATES).is_none() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.png");
        let config = DemoConfig {
            output: Some(output.clone()),
            ..fixture(dir.path())
        };
        let mut viewer = RecordingViewer::default();
        run(&config, &mut viewer).unwrap();
        assert_eq!(viewer.shown, 0);
        assert!(output.exists());
    }

    #[test]
    fn sprite_out_of_bounds_fails() {
        if Typeface::discover(SYSTEM_FONT_CANDIDATES).is_none() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let config = DemoConfig {
            position: (350, 0),
            ..fixture(dir.path())
        };
        let err = run(&config, &mut RecordingViewer::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImageError>(),
            Some(ImageError::Bounds { .. })
        ));
    }
}
