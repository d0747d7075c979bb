//! The built-in texture sampled by every fragment.

use crate::math::Vec2;
use crate::util::buf::Buf2;

const GREY: u32 = 0xFF7F_7F7F;
const WHITE: u32 = 0xFFFF_FFFF;

/// A 2D texture of packed `0xAARRGGBB` texels.
#[derive(Clone, Debug)]
pub struct Texture(Buf2<u32>);

impl Texture {
    /// Returns the built-in 4×4 grey-and-white checkerboard, with 2×2
    /// texel squares.
    pub fn checkerboard() -> Self {
        #[rustfmt::skip]
        const TEXELS: [u32; 16] = [
            GREY,  GREY,  WHITE, WHITE,
            GREY,  GREY,  WHITE, WHITE,
            WHITE, WHITE, GREY,  GREY,
            WHITE, WHITE, GREY,  GREY,
        ];
        Self(Buf2::new_from((4, 4), TEXELS))
    }

    /// Samples `self` at the texture coordinate `uv`.
    ///
    /// Coordinates map [0, 1] across the texture and are point sampled
    /// with truncation. Coordinates outside [0, 1] clamp to the edge
    /// texels rather than wrapping.
    pub fn sample(&self, uv: Vec2) -> u32 {
        let w = self.0.width() as i32;
        let h = self.0.height() as i32;
        let tx = ((uv.x() * w as f32) as i32).clamp(0, w - 1);
        let ty = ((uv.y() * h as f32) as i32).clamp(0, h - 1);
        self.0[[tx as usize, ty as usize]]
    }
}
