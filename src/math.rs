//! Small fixed-size float vectors used by the colour fitting code.

mod covariance;

use std::ops::{Add, AddAssign, Mul, Sub};

pub(crate) use self::covariance::Sym3x3;

/// Rounds `a` to the nearest integer and clamps it to `0..=limit`.
#[inline(always)]
pub(crate) fn float_to_int(a: f32, limit: i32) -> i32 {
    // `as` truncates toward zero, adding a half first rounds to nearest
    let i = (a + 0.5) as i32;
    i.clamp(0, limit)
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl Vec3 {
    pub(crate) const ZERO: Self = Self::splat(0.0);
    pub(crate) const ONE: Self = Self::splat(1.0);

    #[inline(always)]
    pub(crate) const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub(crate) const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    #[inline(always)]
    pub(crate) const fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    #[inline(always)]
    pub(crate) const fn x(self) -> f32 {
        self.x
    }

    #[inline(always)]
    pub(crate) const fn y(self) -> f32 {
        self.y
    }

    #[inline(always)]
    pub(crate) const fn z(self) -> f32 {
        self.z
    }

    #[inline(always)]
    pub(crate) fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline(always)]
    pub(crate) fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline(always)]
    pub(crate) fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline(always)]
    pub(crate) fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    #[inline(always)]
    pub(crate) fn clamp(self, min: Self, max: Self) -> Self {
        min.max(self.min(max))
    }

    /// Rounds every component toward zero.
    #[inline(always)]
    pub(crate) fn truncate(self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc(), self.z.trunc())
    }

    #[inline(always)]
    pub(crate) fn reciprocal(self) -> Self {
        Self::new(1.0 / self.x, 1.0 / self.y, 1.0 / self.z)
    }

    /// `self * b + c`
    #[inline(always)]
    pub(crate) fn multiply_add(self, b: Self, c: Self) -> Self {
        self * b + c
    }

    /// Largest absolute component.
    #[inline(always)]
    pub(crate) fn max_abs_component(self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    #[inline(always)]
    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

/// Colour plus a fourth lane, used for pixels (alpha) and weighted sums
/// (accumulated weight).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Vec4 {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl Vec4 {
    pub(crate) const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline(always)]
    pub(crate) const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Normalizes an RGBA8 pixel to `0.0..=1.0`.
    #[inline(always)]
    pub(crate) fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(
            f32::from(rgba[0]) / 255.0,
            f32::from(rgba[1]) / 255.0,
            f32::from(rgba[2]) / 255.0,
            f32::from(rgba[3]) / 255.0,
        )
    }

    /// Stores `v * weight` in the first three lanes and `weight` in the last.
    #[inline(always)]
    pub(crate) fn weighted(v: Vec3, weight: f32) -> Self {
        Self::new(v.x * weight, v.y * weight, v.z * weight, weight)
    }

    #[inline(always)]
    pub(crate) const fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline(always)]
    pub(crate) const fn w(self) -> f32 {
        self.w
    }
}

impl Add for Vec4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}
