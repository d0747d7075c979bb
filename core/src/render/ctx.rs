//! The immediate-mode draw context.
//!
//! A `DrawContext` binds render targets, vertex and index data, and the
//! projection and modelview matrices, then turns `draw` calls into
//! screen-space triangles that `present` hands to the rasterizer. The
//! context borrows everything it binds, so it cannot outlive the targets
//! or buffers and nothing else can touch them while they are bound.

use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use crate::geom::Vertex;
use crate::math::Mat4;
use crate::render::raster::{self, ScreenTri, ScreenVertex};
use crate::render::target::RenderTarget;
use crate::render::tex::Texture;
use crate::util::buf::Buf2;

//
// Types
//

/// A matrix binding slot of the context.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatrixSlot {
    Projection,
    Modelview,
}

/// The error type of draw context operations.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The color or depth target is not bound.
    TargetsNotBound,
    /// A bound target has the wrong pixel format, or the color and depth
    /// targets differ in size.
    TargetFormat,
    /// A draw call was made with no vertex buffer bound.
    NoVertexBuffer,
    /// An indexed draw call was made with no index buffer bound.
    NoIndexBuffer,
    /// A draw count that is not a multiple of three.
    BadCount { count: usize },
    /// A draw range or index referring past the end of its buffer.
    OutOfBounds { index: usize, len: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

/// The immediate-mode pipeline state and API surface.
///
/// The lifetime `'a` ties the context to every resource bound into it.
/// Targets are bound by exclusive borrow, vertex and index data by shared
/// slice.
///
/// Triangles submitted with [`draw`](Self::draw) and
/// [`draw_indexed`](Self::draw_indexed) are projected immediately but
/// rasterized only when [`present`](Self::present) runs.
pub struct DrawContext<'a> {
    color: Option<&'a mut RenderTarget>,
    depth: Option<&'a mut RenderTarget>,

    verts: Option<&'a [Vertex]>,
    indices: Option<&'a [u32]>,

    matrices: [Mat4; 2],
    // Cached Projection × Modelview, refreshed by Modelview writes only
    mvp: Mat4,

    tex: Texture,
    pending: Vec<ScreenTri>,
}

//
// Impls
//

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::TargetsNotBound => {
                f.write_str("color or depth target not bound")
            }
            Self::TargetFormat => {
                f.write_str("bound target has the wrong format or size")
            }
            Self::NoVertexBuffer => f.write_str("no vertex buffer bound"),
            Self::NoIndexBuffer => f.write_str("no index buffer bound"),
            Self::BadCount { count } => {
                write!(f, "draw count {count} is not a multiple of three")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds of buffer length {len}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl<'a> Default for DrawContext<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DrawContext<'a> {
    /// Returns a context with nothing bound and identity matrices.
    pub fn new() -> Self {
        Self {
            color: None,
            depth: None,
            verts: None,
            indices: None,
            matrices: [Mat4::IDENTITY; 2],
            mvp: Mat4::IDENTITY,
            tex: Texture::checkerboard(),
            pending: Vec::new(),
        }
    }

    /// Binds `rt` as the color target, replacing any previous binding.
    ///
    /// The format is checked when the target is used, not here.
    pub fn set_render_target(&mut self, rt: &'a mut RenderTarget) {
        self.color = Some(rt);
    }

    /// Binds `rt` as the depth target, replacing any previous binding.
    pub fn set_depth_target(&mut self, rt: &'a mut RenderTarget) {
        self.depth = Some(rt);
    }

    /// Binds `verts` as the vertex buffer.
    pub fn set_vertex_buffer(&mut self, verts: &'a [Vertex]) {
        self.verts = Some(verts);
    }

    /// Binds `indices` as the index buffer.
    pub fn set_index_buffer(&mut self, indices: &'a [u32]) {
        self.indices = Some(indices);
    }

    /// Stores `m` into the given matrix slot.
    ///
    /// Writing the modelview recomputes the cached combined transform
    /// from the currently stored projection. Writing the projection does
    /// not, so set the projection before the modelview.
    pub fn set_matrix(&mut self, slot: MatrixSlot, m: &Mat4) {
        self.matrices[slot as usize] = *m;
        if slot == MatrixSlot::Modelview {
            self.mvp =
                self.matrices[MatrixSlot::Projection as usize].compose(m);
        }
    }

    /// Fills the bound color target with the low byte of `color`
    /// replicated into every pixel byte, and the bound depth target
    /// with `depth`.
    pub fn clear(&mut self, color: u32, depth: f32) -> Result<()> {
        let (color_buf, depth_buf) =
            Self::targets(&mut self.color, &mut self.depth)?;

        let b = color as u8;
        color_buf.fill(u32::from_ne_bytes([b, b, b, b]));
        depth_buf.fill(depth);
        Ok(())
    }

    /// Projects `count` vertices starting at `offset`, three per
    /// triangle, and queues the triangles that land at least partly
    /// on screen.
    pub fn draw(&mut self, offset: usize, count: usize) -> Result<()> {
        let verts = self.verts.ok_or(Error::NoVertexBuffer)?;
        let range = Self::check_range(offset, count, verts.len())?;

        let dims = {
            let (color, _) = Self::targets(&mut self.color, &mut self.depth)?;
            (color.width() as i32, color.height() as i32)
        };

        for v in verts[range].chunks_exact(3) {
            self.project([v[2], v[1], v[0]], dims);
        }
        Ok(())
    }

    /// Like [`draw`](Self::draw), but reads `count` vertex indices from
    /// the bound index buffer starting at `offset`.
    pub fn draw_indexed(&mut self, offset: usize, count: usize) -> Result<()> {
        let verts = self.verts.ok_or(Error::NoVertexBuffer)?;
        let indices = self.indices.ok_or(Error::NoIndexBuffer)?;
        let range = Self::check_range(offset, count, indices.len())?;

        // Validate every index up front so a bad one cannot queue a
        // partial batch
        let indices = &indices[range];
        for &i in indices {
            if i as usize >= verts.len() {
                return Err(Error::OutOfBounds {
                    index: i as usize,
                    len: verts.len(),
                });
            }
        }

        let dims = {
            let (color, _) = Self::targets(&mut self.color, &mut self.depth)?;
            (color.width() as i32, color.height() as i32)
        };

        for i in indices.chunks_exact(3) {
            let tri = [
                verts[i[2] as usize],
                verts[i[1] as usize],
                verts[i[0] as usize],
            ];
            self.project(tri, dims);
        }
        Ok(())
    }

    /// Rasterizes every queued triangle into the bound targets.
    ///
    /// The queue is emptied whether or not rasterization ran, so a frame
    /// that fails here does not leak into the next one.
    pub fn present(&mut self) -> Result<()> {
        let res = match Self::targets(&mut self.color, &mut self.depth) {
            Ok((color, depth)) => {
                for tri in &self.pending {
                    raster::draw_tri(tri, &self.tex, color, depth);
                }
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.pending.clear();
        res
    }

    /// Checks that both targets are bound, correctly formatted, and of
    /// equal size, and returns their pixel buffers.
    fn targets<'t>(
        color: &'t mut Option<&'a mut RenderTarget>,
        depth: &'t mut Option<&'a mut RenderTarget>,
    ) -> Result<(&'t mut Buf2<u32>, &'t mut Buf2<f32>)> {
        let color = color.as_deref_mut().ok_or(Error::TargetsNotBound)?;
        let depth = depth.as_deref_mut().ok_or(Error::TargetsNotBound)?;

        if (color.width(), color.height()) != (depth.width(), depth.height())
        {
            return Err(Error::TargetFormat);
        }
        let color = color.argb_mut().ok_or(Error::TargetFormat)?;
        let depth = depth.depth_mut().ok_or(Error::TargetFormat)?;
        Ok((color, depth))
    }

    fn check_range(
        offset: usize,
        count: usize,
        len: usize,
    ) -> Result<core::ops::Range<usize>> {
        if count % 3 != 0 {
            return Err(Error::BadCount { count });
        }
        let end = offset
            .checked_add(count)
            .filter(|&end| end <= len)
            .ok_or(Error::OutOfBounds {
                index: offset.saturating_add(count),
                len,
            })?;
        Ok(offset..end)
    }

    /// Projects one triangle, reversing the vertex order so that front
    /// faces wind the way the rasterizer fills. Back faces still pass
    /// through here; the rasterizer rejects them by coverage sign.
    fn project(&mut self, [v0, v1, v2]: [Vertex; 3], (w, h): (i32, i32)) {
        let s0 = self.project_vertex(&v0, (w, h));
        let s1 = self.project_vertex(&v1, (w, h));
        let s2 = self.project_vertex(&v2, (w, h));

        // Admit the triangle if any corner lands on screen. Not a real
        // clip: a triangle whose corners all lie off screen is dropped
        // even if its interior would be visible.
        let on_screen = |v: &ScreenVertex| {
            (0..w).contains(&v.x) && (0..h).contains(&v.y)
        };
        if on_screen(&s0) || on_screen(&s1) || on_screen(&s2) {
            self.pending.push(ScreenTri { v0: s0, v1: s1, v2: s2 });
        }
    }

    fn project_vertex(&self, v: &Vertex, (w, h): (i32, i32)) -> ScreenVertex {
        let clip = self.mvp.apply(v.pos.to_vec4());
        let inv_w = 1.0 / clip.w();
        let ndc = clip * inv_w;

        // Truncation toward zero, not rounding. Without a near-plane
        // clip, w near zero can fling a coordinate arbitrarily far off
        // screen; clamp it into the range the rasterizer arithmetic
        // supports.
        let to_screen = |ndc: f32, dim: i32| {
            (((ndc * 0.5 + 0.5) * dim as f32) as i32)
                .clamp(-raster::MAX_COORD, raster::MAX_COORD)
        };
        ScreenVertex {
            x: to_screen(ndc.x(), w),
            y: to_screen(ndc.y(), h),
            z: ndc.z() * 0.5 + 0.5,
            uv_over_w: v.uv * inv_w,
            inv_w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::vertex;
    use crate::math::{mat::translate, vec2, vec3, Mat4};
    use crate::render::target::PixelFormat;

    fn targets() -> (RenderTarget, RenderTarget) {
        (
            RenderTarget::new(64, 64, PixelFormat::ColorArgb8),
            RenderTarget::new(64, 64, PixelFormat::Depth32F),
        )
    }

    /// A triangle that, with identity matrices, covers the middle of a
    /// 64×64 target and winds front-facing in buffer order.
    fn tri_verts() -> [Vertex; 3] {
        let ndc = |px: f32, py: f32| (px / 32.0 - 1.0, py / 32.0 - 1.0);
        [(10.0, 10.0), (50.0, 10.0), (30.0, 50.0)].map(|(px, py)| {
            let (x, y) = ndc(px, py);
            vertex(vec3(x, y, 0.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0))
        })
    }

    #[test]
    fn clear_requires_bound_targets() {
        let mut ctx = DrawContext::new();
        assert_eq!(ctx.clear(0, 1.0), Err(Error::TargetsNotBound));

        let (mut color, _) = targets();
        ctx.set_render_target(&mut color);
        assert_eq!(ctx.clear(0, 1.0), Err(Error::TargetsNotBound));
    }

    #[test]
    fn clear_requires_matching_formats() {
        let (mut color, mut depth) = targets();
        // Bound the wrong way around
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut depth);
        ctx.set_depth_target(&mut color);
        assert_eq!(ctx.clear(0, 1.0), Err(Error::TargetFormat));
    }

    #[test]
    fn clear_requires_equal_sizes() {
        let mut color = RenderTarget::new(64, 64, PixelFormat::ColorArgb8);
        let mut depth = RenderTarget::new(32, 32, PixelFormat::Depth32F);
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);
        assert_eq!(ctx.clear(0, 1.0), Err(Error::TargetFormat));
    }

    #[test]
    fn clear_byte_fills_color_and_float_fills_depth() {
        let (mut color, mut depth) = targets();
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);
        ctx.clear(0x00FFFF42, 1.0).unwrap();
        drop(ctx);

        assert!(color.argb().unwrap().data().iter().all(|&px| px == 0x42424242));
        assert!(depth.depth().unwrap().data().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn modelview_write_caches_combined_matrix() {
        let mut ctx = DrawContext::new();
        let p1 = translate(vec3(1.0, 0.0, 0.0));
        let m1 = translate(vec3(0.0, 2.0, 0.0));

        ctx.set_matrix(MatrixSlot::Projection, &p1);
        ctx.set_matrix(MatrixSlot::Modelview, &m1);
        assert_eq!(ctx.mvp, p1.compose(&m1));

        // A later projection write leaves the cached product alone
        let p2 = translate(vec3(5.0, 5.0, 5.0));
        ctx.set_matrix(MatrixSlot::Projection, &p2);
        assert_eq!(ctx.mvp, p1.compose(&m1));

        // The next modelview write picks it up
        ctx.set_matrix(MatrixSlot::Modelview, &m1);
        assert_eq!(ctx.mvp, p2.compose(&m1));
    }

    #[test]
    fn draw_validates_before_queueing() {
        let (mut color, mut depth) = targets();
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);

        assert_eq!(ctx.draw(0, 3), Err(Error::NoVertexBuffer));

        let verts = tri_verts();
        ctx.set_vertex_buffer(&verts);
        assert_eq!(ctx.draw(0, 4), Err(Error::BadCount { count: 4 }));
        assert_eq!(ctx.draw(3, 3), Err(Error::OutOfBounds { index: 6, len: 3 }));
        assert!(ctx.pending.is_empty());

        assert_eq!(ctx.draw(0, 3), Ok(()));
        assert_eq!(ctx.pending.len(), 1);
    }

    #[test]
    fn draw_indexed_validates_indices() {
        let (mut color, mut depth) = targets();
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);

        let verts = tri_verts();
        ctx.set_vertex_buffer(&verts);
        assert_eq!(ctx.draw_indexed(0, 3), Err(Error::NoIndexBuffer));

        let bad = [0u32, 1, 7];
        ctx.set_index_buffer(&bad);
        assert_eq!(
            ctx.draw_indexed(0, 3),
            Err(Error::OutOfBounds { index: 7, len: 3 })
        );
        assert!(ctx.pending.is_empty());

        let good = [0u32, 1, 2];
        ctx.set_index_buffer(&good);
        assert_eq!(ctx.draw_indexed(0, 3), Ok(()));
        assert_eq!(ctx.pending.len(), 1);
    }

    #[test]
    fn draw_requires_bound_targets() {
        let verts = tri_verts();
        let mut ctx = DrawContext::new();
        ctx.set_vertex_buffer(&verts);
        assert_eq!(ctx.draw(0, 3), Err(Error::TargetsNotBound));
    }

    #[test]
    fn fully_offscreen_triangle_is_dropped() {
        let (mut color, mut depth) = targets();
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);

        // Entirely right of the viewport in NDC
        let verts = [
            vertex(vec3(2.0, 0.0, 0.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
            vertex(vec3(3.0, 0.0, 0.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
            vertex(vec3(2.0, 1.0, 0.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
        ];
        ctx.set_vertex_buffer(&verts);
        ctx.draw(0, 3).unwrap();
        assert!(ctx.pending.is_empty());
    }

    #[test]
    fn vertex_near_camera_plane_does_not_fault() {
        let (mut color, mut depth) = targets();
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);

        // w_clip = -z_view, as a perspective projection produces
        let mut proj = Mat4::IDENTITY;
        proj.0[11] = -1.0;
        proj.0[15] = 0.0;
        ctx.set_matrix(MatrixSlot::Projection, &proj);
        ctx.set_matrix(MatrixSlot::Modelview, &Mat4::IDENTITY);

        // Two corners on screen, one a hair in front of the camera so
        // its w is nearly zero and its projection lands absurdly far out
        let verts = [
            vertex(vec3(0.1, -0.1, -1.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
            vertex(vec3(-0.1, 0.1, -1.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
            vertex(vec3(0.5, 0.5, -1e-7), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
        ];
        ctx.set_vertex_buffer(&verts);
        ctx.clear(0, 1.0).unwrap();
        ctx.draw(0, 3).unwrap();
        ctx.present().unwrap();
    }

    #[test]
    fn present_clears_queue_even_on_error() {
        let (mut color, mut depth) = targets();
        let mut wrong = RenderTarget::new(64, 64, PixelFormat::Depth32F);

        let verts = tri_verts();
        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);
        ctx.set_vertex_buffer(&verts);
        ctx.draw(0, 3).unwrap();
        assert_eq!(ctx.pending.len(), 1);

        // Rebinding a depth-format target as the color target makes
        // present fail, but the queue still empties
        ctx.set_render_target(&mut wrong);
        assert_eq!(ctx.present(), Err(Error::TargetFormat));
        assert!(ctx.pending.is_empty());
    }

    #[test]
    fn present_rasterizes_queued_triangles() {
        let (mut color, mut depth) = targets();
        let verts = tri_verts();

        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);
        ctx.set_vertex_buffer(&verts);
        ctx.clear(0, 1.0).unwrap();
        ctx.draw(0, 3).unwrap();
        ctx.present().unwrap();
        assert!(ctx.pending.is_empty());
        drop(ctx);

        // The triangle interior got texel (0, 0) of the checkerboard
        assert_eq!(color.argb().unwrap()[[30, 20]], 0xFF7F_7F7F);
        assert!(depth.depth().unwrap()[[30, 20]] < 1.0);
    }

    #[test]
    fn back_face_rasterizes_to_nothing() {
        let (mut color, mut depth) = targets();
        let mut verts = tri_verts();
        verts.swap(0, 1);

        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);
        ctx.set_vertex_buffer(&verts);
        ctx.clear(0, 1.0).unwrap();
        ctx.draw(0, 3).unwrap();
        ctx.present().unwrap();
        drop(ctx);

        assert!(color.argb().unwrap().data().iter().all(|&px| px == 0));
    }
}
