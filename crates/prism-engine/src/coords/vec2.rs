use core::ops::{Mul, Sub};

/// 2D point or offset in logical pixels, origin top-left.
///
/// Carries only the arithmetic the pointer mapping needs: subtraction to
/// rebase a window-space point onto a panel origin, and scalar
/// multiplication to convert logical points into render-target pixels.
/// GPU-side math uses `glam` instead.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtraction_rebases_componentwise() {
        let local = Vec2::new(250.0, 90.0) - Vec2::new(200.0, 40.0);
        assert_eq!(local, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn scalar_multiply_scales_both_axes() {
        assert_eq!(Vec2::new(3.0, -2.0) * 1.5, Vec2::new(4.5, -3.0));
    }
}
