//! Color and depth render targets.

use crate::util::buf::Buf2;

/// The pixel format of a render target.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    /// 32-bit packed color, one `u32` per pixel, `0xAARRGGBB`.
    ColorArgb8,
    /// 32-bit floating-point depth, one `f32` per pixel.
    Depth32F,
}

#[derive(Clone, Debug)]
enum Pixels {
    Argb8(Buf2<u32>),
    Depth(Buf2<f32>),
}

/// A CPU-owned rectangular buffer of pixels that the pipeline renders into.
///
/// A target is either a color target or a depth target, fixed at creation.
/// The draw context binds one of each; the rasterizer writes color and depth
/// for every fragment that passes the depth test.
#[derive(Clone, Debug)]
pub struct RenderTarget {
    w: i32,
    h: i32,
    pixels: Pixels,
}

impl RenderTarget {
    /// Returns a `w` × `h` target of the given format, zero-filled.
    ///
    /// # Panics
    /// If `w` or `h` is negative.
    pub fn new(w: i32, h: i32, format: PixelFormat) -> Self {
        assert!(w >= 0 && h >= 0, "target dimensions cannot be negative");
        let dims = (w as usize, h as usize);
        let pixels = match format {
            PixelFormat::ColorArgb8 => Pixels::Argb8(Buf2::new(dims)),
            PixelFormat::Depth32F => Pixels::Depth(Buf2::new(dims)),
        };
        Self { w, h, pixels }
    }

    /// Returns the width of `self` in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.w
    }
    /// Returns the height of `self` in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.h
    }

    /// Returns the format of `self`.
    pub fn format(&self) -> PixelFormat {
        match self.pixels {
            Pixels::Argb8(_) => PixelFormat::ColorArgb8,
            Pixels::Depth(_) => PixelFormat::Depth32F,
        }
    }

    /// Returns the color pixels of `self`, or `None` if this is a
    /// depth target.
    pub fn argb(&self) -> Option<&Buf2<u32>> {
        match &self.pixels {
            Pixels::Argb8(buf) => Some(buf),
            Pixels::Depth(_) => None,
        }
    }
    /// Returns the color pixels of `self` mutably, or `None` if this is a
    /// depth target.
    pub fn argb_mut(&mut self) -> Option<&mut Buf2<u32>> {
        match &mut self.pixels {
            Pixels::Argb8(buf) => Some(buf),
            Pixels::Depth(_) => None,
        }
    }

    /// Returns the depth pixels of `self`, or `None` if this is a
    /// color target.
    pub fn depth(&self) -> Option<&Buf2<f32>> {
        match &self.pixels {
            Pixels::Depth(buf) => Some(buf),
            Pixels::Argb8(_) => None,
        }
    }
    /// Returns the depth pixels of `self` mutably, or `None` if this is a
    /// color target.
    pub fn depth_mut(&mut self) -> Option<&mut Buf2<f32>> {
        match &mut self.pixels {
            Pixels::Depth(buf) => Some(buf),
            Pixels::Argb8(_) => None,
        }
    }

    /// Fills `self` by replicating the low byte of `val` into every byte
    /// of every 32-bit pixel.
    ///
    /// These are memset semantics: only values whose bytes are all equal,
    /// such as black, white, or a uniform grey, survive the fill exactly.
    pub fn fill_bytes(&mut self, val: u32) {
        let b = val as u8;
        let bytes = [b, b, b, b];
        match &mut self.pixels {
            Pixels::Argb8(buf) => buf.fill(u32::from_ne_bytes(bytes)),
            Pixels::Depth(buf) => buf.fill(f32::from_ne_bytes(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_determines_pixel_accessors() {
        let mut color = RenderTarget::new(4, 4, PixelFormat::ColorArgb8);
        assert_eq!(color.format(), PixelFormat::ColorArgb8);
        assert!(color.argb().is_some());
        assert!(color.argb_mut().is_some());
        assert!(color.depth().is_none());

        let mut depth = RenderTarget::new(4, 4, PixelFormat::Depth32F);
        assert_eq!(depth.format(), PixelFormat::Depth32F);
        assert!(depth.depth().is_some());
        assert!(depth.depth_mut().is_some());
        assert!(depth.argb().is_none());
    }

    #[test]
    fn fill_bytes_replicates_low_byte() {
        let mut rt = RenderTarget::new(2, 2, PixelFormat::ColorArgb8);
        rt.fill_bytes(0x00FFFF42);
        assert!(rt.argb().unwrap().data().iter().all(|&px| px == 0x42424242));
    }

    #[test]
    fn fill_bytes_zero_is_zero_depth() {
        let mut rt = RenderTarget::new(2, 2, PixelFormat::Depth32F);
        rt.fill_bytes(0xFFFFFF00);
        assert!(rt.depth().unwrap().data().iter().all(|&d| d == 0.0));
    }

    #[test]
    #[should_panic]
    fn negative_dimensions_should_panic() {
        let _ = RenderTarget::new(-1, 4, PixelFormat::ColorArgb8);
    }
}
