//! 2D vector helpers on top of `glam::Vec2`
//!
//! `Vec2` is `Copy`, so clone/copy are plain assignments, `-v` reverses,
//! `v * f` scales and `+`/`-` add and subtract. The trait below adds the
//! operations glam does not ship in the shape the steering code needs.

use glam::Vec2;

/// Extra vector operations used by the body chain and steering engine
pub trait VectorExt: Sized {
    /// Rescale to the given length.
    ///
    /// Panics on a zero-length or non-finite vector.
    fn resize(self, length: f32) -> Self;

    /// Rescale to the given length, or `None` if the vector has no direction
    fn try_resize(self, length: f32) -> Option<Self>;

    /// Rotate counter-clockwise by `angle` radians
    fn rotated(self, angle: f32) -> Self;

    /// Copy rotated 90° clockwise (no trigonometry)
    fn cw_normal(self) -> Self;

    /// Copy rotated 90° counter-clockwise (no trigonometry)
    fn ccw_normal(self) -> Self;

    /// Signed angle needed to rotate `self` onto `other`, in `(-π, π]`.
    ///
    /// Returns 0 if either vector has zero length.
    fn signed_angle(self, other: Self) -> f32;
}

impl VectorExt for Vec2 {
    #[inline]
    fn resize(self, length: f32) -> Self {
        match self.try_resize(length) {
            Some(v) => v,
            None => panic!("cannot resize degenerate vector ({}, {})", self.x, self.y),
        }
    }

    #[inline]
    fn try_resize(self, length: f32) -> Option<Self> {
        let current = self.length();
        if current > 0.0 && current.is_finite() {
            Some(self * (length / current))
        } else {
            None
        }
    }

    #[inline]
    fn rotated(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    #[inline]
    fn cw_normal(self) -> Self {
        Vec2::new(self.y, -self.x)
    }

    #[inline]
    fn ccw_normal(self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    fn signed_angle(self, other: Self) -> f32 {
        let denom = self.length() * other.length();
        if denom <= 0.0 {
            return 0.0;
        }
        // Rounding can push the cosine slightly outside [-1, 1]
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        let angle = cos.acos();
        if self.perp_dot(other) < 0.0 {
            -angle
        } else {
            angle
        }
    }
}

/// Signed turning angle at `b` when walking `a -> b -> c`
#[inline]
pub fn angle3(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).signed_angle(c - b)
}
