//! Two-, three-, and four-component `f32` vectors.

use core::ops::{Add, Div, Mul, Sub};

/// A two-component vector, used for texture coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct Vec2(pub [f32; 2]);

/// A three-component vector, used for positions and normals.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct Vec3(pub [f32; 3]);

/// A four-component homogeneous vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct Vec4(pub [f32; 4]);

/// Returns a 2-vector with components `x` and `y`.
#[inline]
pub const fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2([x, y])
}
/// Returns a 3-vector with components `x`, `y`, and `z`.
#[inline]
pub const fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3([x, y, z])
}
/// Returns a 4-vector with components `x`, `y`, `z`, and `w`.
#[inline]
pub const fn vec4(x: f32, y: f32, z: f32, w: f32) -> Vec4 {
    Vec4([x, y, z, w])
}

//
// Inherent impls
//

impl Vec2 {
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
}

impl Vec3 {
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }

    /// Returns `self` extended into a homogeneous 4-vector with `w` = 1.
    #[inline]
    pub const fn to_vec4(self) -> Vec4 {
        vec4(self.x(), self.y(), self.z(), 1.0)
    }
}

impl Vec4 {
    #[inline]
    pub const fn x(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub const fn y(&self) -> f32 {
        self.0[1]
    }
    #[inline]
    pub const fn z(&self) -> f32 {
        self.0[2]
    }
    #[inline]
    pub const fn w(&self) -> f32 {
        self.0[3]
    }
}

//
// Operator impls
//

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        vec2(self.x() + rhs.x(), self.y() + rhs.y())
    }
}
impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        vec2(self.x() - rhs.x(), self.y() - rhs.y())
    }
}
impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, s: f32) -> Self {
        vec2(self.x() * s, self.y() * s)
    }
}

impl Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        vec4(
            self.x() + rhs.x(),
            self.y() + rhs.y(),
            self.z() + rhs.z(),
            self.w() + rhs.w(),
        )
    }
}
impl Mul<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, s: f32) -> Self {
        vec4(self.x() * s, self.y() * s, self.z() * s, self.w() * s)
    }
}
impl Div<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn div(self, s: f32) -> Self {
        vec4(self.x() / s, self.y() / s, self.z() / s, self.w() / s)
    }
}
