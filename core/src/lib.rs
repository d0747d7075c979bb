//! Core functionality of the `softpipe` project.
//!
//! A minimal fixed-function software 3D pipeline: an immediate-mode draw
//! context feeding a tiled half-space triangle rasterizer that writes into
//! CPU-owned color and depth targets. There are no shaders and no lighting;
//! fragments sample a fixed checkerboard texture with perspective-correct
//! coordinates and pass through a less-than depth test.
//!
//! # Crate features
//!
//! * `std`:
//!   Makes available items requiring timekeeping or floating-point functions
//!   not included in `core`, in particular the trigonometric matrix
//!   constructors and [`render::stats`] timing.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! All features are disabled by default.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

pub mod prelude {
    #[cfg(feature = "std")]
    pub use crate::math::mat::{perspective, rotate_x, rotate_y, rotate_z};
    pub use crate::math::{
        mat::{translate, Mat4},
        vec::{vec2, vec3, vec4, Vec2, Vec3, Vec4},
    };

    pub use crate::geom::{vertex, Vertex};

    pub use crate::render::{
        ctx::{DrawContext, Error, MatrixSlot},
        target::{PixelFormat, RenderTarget},
        text::draw_debug_text,
    };

    pub use crate::util::buf::Buf2;
}
