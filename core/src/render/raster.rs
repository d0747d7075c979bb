//! Tiled half-space triangle rasterization.
//!
//! Coverage is computed with three edge functions in 28.4 fixed point,
//! evaluated per 8×8 pixel block. A block with all four corners inside
//! every edge is filled wholesale; a block fully outside any edge is
//! skipped; the rest fall back to a per-pixel scan that steps the edge
//! functions incrementally. A top-left fill rule keeps triangles that
//! share an edge from drawing any pixel twice or leaving gaps.

use crate::math::Vec2;
use crate::render::tex::Texture;
use crate::util::buf::Buf2;

/// Edge length of a rasterizer block, in pixels. Must be a power of two.
const BLOCK: i32 = 8;

/// Largest projected coordinate magnitude the rasterizer accepts.
///
/// With no near-plane clip, a vertex close to or behind the camera can
/// project arbitrarily far off screen. Clamping such coordinates to this
/// range keeps the widened edge arithmetic in range while leaving every
/// coordinate a real target could contain untouched.
pub const MAX_COORD: i32 = 1 << 23;

//
// Types
//

/// A vertex projected to screen space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScreenVertex {
    /// Pixel x coordinate, truncated toward zero.
    pub x: i32,
    /// Pixel y coordinate, truncated toward zero.
    pub y: i32,
    /// Depth after the perspective divide, visible range [0, 1].
    pub z: f32,
    /// Texture coordinate divided by the clip-space w.
    pub uv_over_w: Vec2,
    /// Reciprocal of the clip-space w.
    pub inv_w: f32,
}

/// A triangle projected to screen space, ready to rasterize.
///
/// Coverage is one-sided: a triangle is only filled if its vertices wind
/// clockwise in screen coordinates (y growing downward). The opposite
/// winding lies entirely on the negative side of its own edge functions
/// and produces no pixels, which is what culls back faces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenTri {
    pub v0: ScreenVertex,
    pub v1: ScreenVertex,
    pub v2: ScreenVertex,
}

impl ScreenTri {
    /// Returns twice the signed area of `self` in pixel units.
    ///
    /// Zero for degenerate triangles, negative for the winding that
    /// the rasterizer fills. Widened to `i64` so that far offscreen
    /// coordinates cannot overflow the products.
    pub fn denom(&self) -> i64 {
        let [x0, y0, x1, y1, x2, y2] = [
            self.v0.x, self.v0.y, self.v1.x, self.v1.y, self.v2.x, self.v2.y,
        ]
        .map(i64::from);
        (y1 - y2) * (x0 - x2) + (x2 - x1) * (y0 - y2)
    }
}

//
// Functions
//

/// Calls `pixel_fn(x, y)` once for every pixel covered by `tri`,
/// restricted to `0 <= x < w` and `0 <= y < h`.
pub fn fill_tri<F>(tri: &ScreenTri, (w, h): (i32, i32), mut pixel_fn: F)
where
    F: FnMut(i32, i32),
{
    // 28.4 fixed-point coordinates, widened so far offscreen vertices
    // cannot overflow the half-edge constants
    let (x1, y1) = (i64::from(tri.v0.x) << 4, i64::from(tri.v0.y) << 4);
    let (x2, y2) = (i64::from(tri.v1.x) << 4, i64::from(tri.v1.y) << 4);
    let (x3, y3) = (i64::from(tri.v2.x) << 4, i64::from(tri.v2.y) << 4);

    // Edge deltas
    let (dx12, dy12) = (x1 - x2, y1 - y2);
    let (dx23, dy23) = (x2 - x3, y2 - y3);
    let (dx31, dy31) = (x3 - x1, y3 - y1);

    // Deltas scaled to whole-pixel steps
    let (fdx12, fdy12) = (dx12 << 4, dy12 << 4);
    let (fdx23, fdy23) = (dx23 << 4, dy23 << 4);
    let (fdx31, fdy31) = (dx31 << 4, dy31 << 4);

    // Bounding rectangle, rounded up to whole pixels and clipped to
    // the output dimensions
    let minx = (imin3(x1, x2, x3) + 0xF) >> 4;
    let maxx = ((imax3(x1, x2, x3) + 0xF) >> 4).min(i64::from(w)) as i32;
    let miny = (imin3(y1, y2, y3) + 0xF) >> 4;
    let maxy = ((imax3(y1, y2, y3) + 0xF) >> 4).min(i64::from(h)) as i32;

    // Snap to the block grid; zero is block aligned so clipping to it
    // keeps the alignment
    let minx = (minx & !(i64::from(BLOCK) - 1)).max(0) as i32;
    let miny = (miny & !(i64::from(BLOCK) - 1)).max(0) as i32;

    // Half-edge constants
    let mut c1 = dy12 * x1 - dx12 * y1;
    let mut c2 = dy23 * x2 - dx23 * y2;
    let mut c3 = dy31 * x3 - dx31 * y3;

    // Top-left fill rule: shared edges belong to the triangle on whose
    // top or left side they lie
    if dy12 < 0 || (dy12 == 0 && dx12 > 0) {
        c1 += 1;
    }
    if dy23 < 0 || (dy23 == 0 && dx23 > 0) {
        c2 += 1;
    }
    if dy31 < 0 || (dy31 == 0 && dx31 > 0) {
        c3 += 1;
    }

    let mut y = miny;
    while y < maxy {
        let mut x = minx;
        while x < maxx {
            // Block corners in fixed point
            let x0f = i64::from(x) << 4;
            let x1f = i64::from(x + BLOCK - 1) << 4;
            let y0f = i64::from(y) << 4;
            let y1f = i64::from(y + BLOCK - 1) << 4;

            // 4-bit corner masks, one bit per corner inside the edge
            let corners = |c: i64, dx: i64, dy: i64| {
                (i32::from(c + dx * y0f - dy * x0f > 0))
                    | (i32::from(c + dx * y0f - dy * x1f > 0) << 1)
                    | (i32::from(c + dx * y1f - dy * x0f > 0) << 2)
                    | (i32::from(c + dx * y1f - dy * x1f > 0) << 3)
            };
            let a = corners(c1, dx12, dy12);
            let b = corners(c2, dx23, dy23);
            let c = corners(c3, dx31, dy31);

            // Fully outside some edge
            if a == 0x0 || b == 0x0 || c == 0x0 {
                x += BLOCK;
                continue;
            }

            let y_end = (y + BLOCK).min(h);
            let x_end = (x + BLOCK).min(w);

            if a == 0xF && b == 0xF && c == 0xF {
                // Fully inside all three
                for iy in y..y_end {
                    for ix in x..x_end {
                        pixel_fn(ix, iy);
                    }
                }
            } else {
                // Partially covered, scan per pixel
                let mut cy1 = c1 + dx12 * y0f - dy12 * x0f;
                let mut cy2 = c2 + dx23 * y0f - dy23 * x0f;
                let mut cy3 = c3 + dx31 * y0f - dy31 * x0f;

                for iy in y..y_end {
                    let mut cx1 = cy1;
                    let mut cx2 = cy2;
                    let mut cx3 = cy3;

                    for ix in x..x_end {
                        if cx1 > 0 && cx2 > 0 && cx3 > 0 {
                            pixel_fn(ix, iy);
                        }
                        cx1 -= fdy12;
                        cx2 -= fdy23;
                        cx3 -= fdy31;
                    }
                    cy1 += fdx12;
                    cy2 += fdx23;
                    cy3 += fdx31;
                }
            }
            x += BLOCK;
        }
        y += BLOCK;
    }
}

/// Rasterizes `tri` into `color` and `depth`, which must have equal
/// dimensions.
///
/// For every covered pixel, interpolates depth, 1/w, and uv/w with
/// barycentric weights, recovers the perspective-correct texture
/// coordinate by dividing out the interpolated 1/w, and samples `tex`.
/// A fragment is written only if its depth is strictly less than the
/// stored depth. Degenerate triangles are skipped.
pub fn draw_tri(
    tri: &ScreenTri,
    tex: &Texture,
    color: &mut Buf2<u32>,
    depth: &mut Buf2<f32>,
) {
    let d = tri.denom();
    if d == 0 {
        return;
    }
    let inv_d = 1.0 / d as f32;

    let (v0, v1, v2) = (tri.v0, tri.v1, tri.v2);
    let dims = (color.width() as i32, color.height() as i32);

    // Barycentric edge coefficients, widened like the coverage math
    let (e0x, e0y) = (i64::from(v1.y - v2.y), i64::from(v2.x - v1.x));
    let (e1x, e1y) = (i64::from(v2.y - v0.y), i64::from(v0.x - v2.x));

    fill_tri(tri, dims, |x, y| {
        // Barycentric weights from integer pixel coordinates
        let ex = i64::from(x - v2.x);
        let ey = i64::from(y - v2.y);
        let b0 = (e0x * ex + e0y * ey) as f32 * inv_d;
        let b1 = (e1x * ex + e1y * ey) as f32 * inv_d;

        // Delta form, so attributes constant across the triangle
        // interpolate without rounding
        let z = v2.z + b0 * (v0.z - v2.z) + b1 * (v1.z - v2.z);

        let px = [x as usize, y as usize];
        if z < depth[px] {
            let inv_w = v2.inv_w
                + b0 * (v0.inv_w - v2.inv_w)
                + b1 * (v1.inv_w - v2.inv_w);
            let uv = (v2.uv_over_w
                + (v0.uv_over_w - v2.uv_over_w) * b0
                + (v1.uv_over_w - v2.uv_over_w) * b1)
                * (1.0 / inv_w);

            depth[px] = z;
            color[px] = tex.sample(uv);
        }
    });
}

#[inline]
fn imin3(x: i64, y: i64, z: i64) -> i64 {
    x.min(y).min(z)
}
#[inline]
fn imax3(x: i64, y: i64, z: i64) -> i64 {
    x.max(y).max(z)
}
