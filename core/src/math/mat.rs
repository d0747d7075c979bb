//! Column-major 4×4 transform matrices.

use super::vec::{vec4, Vec3, Vec4};

/// A 4×4 matrix of `f32`, stored in column-major order.
///
/// Element (row, col) maps to index `col * 4 + row` of the backing array,
/// so the translation part of an affine transform occupies indices 12..15.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Returns the composite transform of `self` and `other` such that
    /// applying the result is equivalent to first applying `other` and
    /// then `self`:
    /// ```text
    /// a.compose(&b).apply(v) == a.apply(b.apply(v))
    /// ```
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.0[k * 4 + row] * other.0[col * 4 + k];
                }
                out[col * 4 + row] = sum;
            }
        }
        Self(out)
    }

    /// Returns the homogeneous vector `v` transformed by `self`.
    #[must_use]
    pub fn apply(&self, v: Vec4) -> Vec4 {
        let m = &self.0;
        let col = |i: usize| vec4(m[i], m[i + 1], m[i + 2], m[i + 3]);
        col(0) * v.x() + col(4) * v.y() + col(8) * v.z() + col(12) * v.w()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Returns a matrix translating by `t`.
pub const fn translate(t: Vec3) -> Mat4 {
    Mat4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        t.0[0], t.0[1], t.0[2], 1.0,
    ])
}

/// Returns a matrix rotating about the x axis by `a` radians.
#[cfg(feature = "std")]
pub fn rotate_x(a: f32) -> Mat4 {
    let (sin, cos) = a.sin_cos();
    Mat4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, cos, sin, 0.0, //
        0.0, -sin, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ])
}

/// Returns a matrix rotating about the y axis by `a` radians.
#[cfg(feature = "std")]
pub fn rotate_y(a: f32) -> Mat4 {
    let (sin, cos) = a.sin_cos();
    Mat4([
        cos, 0.0, -sin, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        sin, 0.0, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ])
}

/// Returns a matrix rotating about the z axis by `a` radians.
#[cfg(feature = "std")]
pub fn rotate_z(a: f32) -> Mat4 {
    let (sin, cos) = a.sin_cos();
    Mat4([
        cos, sin, 0.0, 0.0, //
        -sin, cos, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ])
}

/// Returns a perspective projection matrix.
///
/// * `fov_y`: Vertical field of view in radians.
/// * `aspect`: Width-to-height aspect ratio of the viewport.
/// * `near`, `far`: Depth range mapped to clip-space z.
///
/// Points inside the frustum project to w > 0, with visible depths mapping
/// to z/w in [-1, 1].
#[cfg(feature = "std")]
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let mut m = [0.0; 16];
    m[0] = f / aspect;
    m[5] = f;
    m[10] = (far + near) / (near - far);
    m[11] = -1.0;
    m[14] = 2.0 * far * near / (near - far);
    Mat4(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    #[test]
    fn identity_is_noop() {
        let v = vec4(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Mat4::IDENTITY.apply(v), v);
        assert_eq!(Mat4::IDENTITY.compose(&Mat4::IDENTITY), Mat4::IDENTITY);
    }

    #[test]
    fn translate_moves_points_not_directions() {
        let m = translate(vec3(1.0, 2.0, 3.0));

        let pt = vec4(1.0, 1.0, 1.0, 1.0);
        assert_eq!(m.apply(pt), vec4(2.0, 3.0, 4.0, 1.0));

        let dir = vec4(1.0, 1.0, 1.0, 0.0);
        assert_eq!(m.apply(dir), dir);
    }

    #[test]
    fn translation_occupies_last_column() {
        let m = translate(vec3(5.0, 6.0, 7.0));
        assert_eq!(&m.0[12..15], &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let a = translate(vec3(1.0, 0.0, 0.0));
        let b = translate(vec3(0.0, 2.0, 0.0));
        let v = vec4(0.0, 0.0, 0.0, 1.0);

        assert_eq!(a.compose(&b).apply(v), a.apply(b.apply(v)));
    }

    #[cfg(feature = "std")]
    #[test]
    fn rotate_z_quarter_turn() {
        let m = rotate_z(core::f32::consts::FRAC_PI_2);
        let v = m.apply(vec4(1.0, 0.0, 0.0, 1.0));

        assert!((v.x() - 0.0).abs() < 1e-6);
        assert!((v.y() - 1.0).abs() < 1e-6);
    }

    #[cfg(feature = "std")]
    #[test]
    fn perspective_maps_depth_range() {
        let m = perspective(1.0, 1.0, 1.0, 10.0);

        // A point on the near plane projects to z/w = -1...
        let near = m.apply(vec4(0.0, 0.0, -1.0, 1.0));
        assert!((near.z() / near.w() + 1.0).abs() < 1e-5);

        // ...and one on the far plane to z/w = 1.
        let far = m.apply(vec4(0.0, 0.0, -10.0, 1.0));
        assert!((far.z() / far.w() - 1.0).abs() < 1e-5);
    }
}
