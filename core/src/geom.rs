//! The vertex format consumed by the pipeline.

use crate::math::{Vec2, Vec3};

/// A vertex in the fixed input layout: a position, a texture coordinate,
/// and a normal.
///
/// The normal is part of the layout for compatibility with mesh data that
/// carries one, but the pipeline itself does no lighting and never reads it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

/// Returns a vertex with the given position, texture coordinate, and normal.
#[inline]
pub const fn vertex(pos: Vec3, uv: Vec2, normal: Vec3) -> Vertex {
    Vertex { pos, uv, normal }
}
