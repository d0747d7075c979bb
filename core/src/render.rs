//! The rendering pipeline: draw context, rasterizer, render targets,
//! the built-in texture, debug text, and frame statistics.

pub mod ctx;
pub mod raster;
#[cfg(feature = "std")]
pub mod stats;
pub mod target;
pub mod tex;
pub mod text;

pub use ctx::{DrawContext, Error, MatrixSlot, Result};
pub use target::{PixelFormat, RenderTarget};
