//! Presenting images to the user.
//!
//! [`Viewer`] is the seam between the handle and the windowing system, so
//! headless callers and tests can substitute their own presenter.
//! [`WindowViewer`] opens a native window with `winit` and paints the pixels
//! through a `softbuffer` surface.

use std::num::NonZeroU32;
use std::rc::Rc;

use image::DynamicImage;
use softbuffer::{Context, Surface};
use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::{ImageError, Result};

/// Something that can show an image to the user.
pub trait Viewer {
    /// Show `image` under `title`, returning once the user dismisses it.
    fn present(&mut self, title: &str, image: &DynamicImage) -> Result<()>;
}

/// Shows images in a native window until a key is pressed.
///
/// Each call runs its own event loop. Most platforms allow only one event
/// loop per process, so a second `present` may fail with
/// [`ImageError::Display`].
#[derive(Debug, Default)]
pub struct WindowViewer;

impl WindowViewer {
    pub fn new() -> Self {
        Self
    }
}

impl Viewer for WindowViewer {
    fn present(&mut self, title: &str, image: &DynamicImage) -> Result<()> {
        let event_loop = EventLoop::new().map_err(display_err)?;
        let mut app = ViewerApp::new(title, image);
        event_loop.run_app(&mut app).map_err(display_err)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Pack an image into 0RGB words as expected by the surface. Alpha is dropped.
pub fn frame_buffer(image: &DynamicImage) -> Vec<u32> {
    image
        .to_rgb8()
        .pixels()
        .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
        .collect()
}

/// Copy a `frame_w` x `frame_h` frame into a `buf_w` x `buf_h` buffer,
/// clipping to the smaller size and clearing the rest.
fn blit(
    buffer: &mut [u32],
    buf_w: usize,
    buf_h: usize,
    frame: &[u32],
    frame_w: usize,
    frame_h: usize,
) {
    buffer.fill(0);
    let cols = buf_w.min(frame_w);
    for row in 0..buf_h.min(frame_h) {
        let src = &frame[row * frame_w..row * frame_w + cols];
        buffer[row * buf_w..row * buf_w + cols].copy_from_slice(src);
    }
}

fn display_err(e: impl std::fmt::Display) -> ImageError {
    ImageError::Display(e.to_string())
}

struct ViewerApp<'a> {
    title: &'a str,
    width: u32,
    height: u32,
    frame: Vec<u32>,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    error: Option<ImageError>,
}

impl<'a> ViewerApp<'a> {
    fn new(title: &'a str, image: &DynamicImage) -> Self {
        Self {
            title,
            width: image.width(),
            height: image.height(),
            frame: frame_buffer(image),
            window: None,
            context: None,
            surface: None,
            error: None,
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.title)
            .with_inner_size(PhysicalSize::new(self.width, self.height))
            .with_resizable(false);

        let window = Rc::new(event_loop.create_window(attributes).map_err(display_err)?);
        let context = Context::new(Rc::clone(&window)).map_err(display_err)?;
        let surface = Surface::new(&context, Rc::clone(&window)).map_err(display_err)?;

        info!(
            width = self.width,
            height = self.height,
            "Window opened, press any key to close"
        );
        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(surface)) = (&self.window, self.surface.as_mut()) else {
            return Ok(());
        };
        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(());
        };

        surface.resize(w, h).map_err(display_err)?;
        let mut buffer = surface.buffer_mut().map_err(display_err)?;
        blit(
            &mut buffer,
            size.width as usize,
            size.height as usize,
            &self.frame,
            self.width as usize,
            self.height as usize,
        );
        buffer.present().map_err(display_err)?;
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: ImageError) {
        self.error = Some(e);
        event_loop.exit();
    }
}

impl ApplicationHandler for ViewerApp<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if self.window.is_none() {
            if let Err(e) = self.open(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event: key, .. } if key.state == ElementState::Pressed => {
                debug!(key = ?key.logical_key, "Key pressed, closing window");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.surface = None;
        self.context = None;
        self.window = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn frame_buffer_packs_rgb() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        let frame = frame_buffer(&DynamicImage::ImageRgb8(img));
        assert_eq!(frame, vec![0x0012_3456, 0x00ff_0000]);
    }

    #[test]
    fn frame_buffer_drops_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 0]));
        assert_eq!(frame_buffer(&DynamicImage::ImageRgba8(img)), vec![0x0001_0203]);
    }

    #[test]
    fn blit_clips_and_clears() {
        let frame = vec![1, 2, 3, 4, 5, 6]; // 3x2
        let mut buffer = vec![9; 2 * 3]; // 2x3
        blit(&mut buffer, 2, 3, &frame, 3, 2);
        assert_eq!(buffer, vec![1, 2, 4, 5, 0, 0]);
    }
}
