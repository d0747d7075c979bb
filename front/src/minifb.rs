//! Frontend using the `minifb` crate for window creation and event
//! handling.

use std::ops::ControlFlow::{self, Break};
use std::time::Instant;

use minifb::{Key, KeyRepeat, WindowOptions};

use softpipe_core::render::target::RenderTarget;

use crate::{Dims, Frame, VGA_640_480};

/// A lightweight wrapper of a `minifb` window.
pub struct Window {
    /// The wrapped minifb window.
    pub imp: minifb::Window,
    /// The width and height of the window.
    pub dims: Dims,
}

/// Builder for creating `Window`s.
pub struct Builder<'title> {
    pub dims: Dims,
    pub title: &'title str,
    pub target_fps: Option<u32>,
    pub opts: WindowOptions,
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self {
            dims: VGA_640_480,
            title: "// softpipe application //",
            target_fps: Some(60),
            opts: WindowOptions::default(),
        }
    }
}

impl<'t> Builder<'t> {
    /// Sets the width and height of the window.
    pub fn dims(mut self, dims: Dims) -> Self {
        self.dims = dims;
        self
    }
    /// Sets the title of the window.
    pub fn title(mut self, title: &'t str) -> Self {
        self.title = title;
        self
    }
    /// Sets the frame rate cap of the window. `None` means unlimited
    /// frame rate (the main loop runs as fast as possible).
    pub fn target_fps(mut self, fps: Option<u32>) -> Self {
        self.target_fps = fps;
        self
    }
    /// Sets other `minifb` options.
    pub fn options(mut self, opts: WindowOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Creates the window.
    pub fn build(self) -> minifb::Result<Window> {
        let Self { dims, title, target_fps, opts } = self;
        let mut imp =
            minifb::Window::new(title, dims.0 as usize, dims.1 as usize, opts)?;
        if let Some(fps) = target_fps {
            imp.set_target_fps(fps as usize);
        }
        Ok(Window { imp, dims })
    }
}

impl Window {
    /// Returns a window builder.
    pub fn builder() -> Builder<'static> {
        Builder::default()
    }

    /// Updates the window content with pixel data from `fb`.
    ///
    /// The data is interpreted as colors in `0x00_RR_GG_BB` format.
    /// # Panics
    /// If `fb.len() < self.dims.0 * self.dims.1`.
    pub fn present(&mut self, fb: &[u32]) {
        let (w, h) = self.dims;
        self.imp
            .update_with_buffer(fb, w as usize, h as usize)
            .unwrap();
    }

    /// Updates the window content from a color render target.
    ///
    /// Does nothing if `rt` is a depth target.
    /// # Panics
    /// If the dimensions of `rt` do not match `self.dims`.
    pub fn present_target(&mut self, rt: &RenderTarget) {
        if let Some(buf) = rt.argb() {
            assert_eq!((rt.width(), rt.height()), self.dims);
            let (w, h) = self.dims;
            self.imp
                .update_with_buffer(buf.data(), w as usize, h as usize)
                .unwrap();
        }
    }

    /// Returns whether `key` is currently held down.
    pub fn key_down(&self, key: Key) -> bool {
        self.imp.is_key_down(key)
    }

    /// Returns whether `key` went down this frame, without repeats.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.imp.is_key_pressed(key, KeyRepeat::No)
    }

    /// Runs the main loop of the program, invoking the callback on each
    /// iteration to compute and draw the next frame.
    ///
    /// The main loop stops and this function returns if:
    /// * the user closes the window via the GUI (e.g. titlebar close button);
    /// * the Esc key is pressed; or
    /// * the callback returns `ControlFlow::Break`.
    pub fn run<F>(&mut self, mut frame_fn: F)
    where
        F: FnMut(&mut Frame<Self>) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let mut last = Instant::now();
        loop {
            if self.should_quit() {
                break;
            }
            let frame =
                &mut Frame { t: start.elapsed(), dt: last.elapsed(), win: self };
            last = Instant::now();
            if let Break(_) = frame_fn(frame) {
                break;
            }
        }
    }

    fn should_quit(&self) -> bool {
        !self.imp.is_open() || self.imp.is_key_down(Key::Escape)
    }
}
