//! Vectors and matrices.
//!
//! Only the small fixed-function subset the pipeline needs: concrete `f32`
//! vectors and a column-major 4×4 matrix with a handful of constructors.

pub mod mat;
pub mod vec;

pub use mat::Mat4;
pub use vec::{vec2, vec3, vec4, Vec2, Vec3, Vec4};
