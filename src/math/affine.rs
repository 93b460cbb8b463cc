//! 2D affine transform (2×2 linear part plus translation).

use serde::{Deserialize, Serialize};

/// 2D affine transform mapping `(x, y)` to
/// `(m11·x + m21·y + dx, m12·x + m22·y + dy)`.
///
/// [`translate`](Self::translate) and [`scale`](Self::scale) act in the
/// transform's local coordinates: the new operation is applied to points
/// *before* the existing transform, so a chain such as
/// `flip.translate(..).scale(..)` reads outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine2D {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2D {
    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            dx,
            dy,
        }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn diagonal(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Prepends a translation by `(tx, ty)`.
    pub fn translate(mut self, tx: f64, ty: f64) -> Self {
        self.dx += tx * self.m11 + ty * self.m21;
        self.dy += tx * self.m12 + ty * self.m22;
        self
    }

    /// Prepends a scale by `(sx, sy)`.
    pub fn scale(mut self, sx: f64, sy: f64) -> Self {
        self.m11 *= sx;
        self.m12 *= sx;
        self.m21 *= sy;
        self.m22 *= sy;
        self
    }

    /// Composition that applies `self` first and `next` second.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m11 * x + self.m21 * y + self.dx,
            self.m12 * x + self.m22 * y + self.dy,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Inverse transform, used to turn screen clicks back into plane
    /// coordinates. `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m11 = self.m22 / det;
        let m12 = -self.m12 / det;
        let m21 = -self.m21 / det;
        let m22 = self.m11 / det;
        Some(Self {
            m11,
            m12,
            m21,
            m22,
            dx: -(self.dx * m11 + self.dy * m21),
            dy: -(self.dx * m12 + self.dy * m22),
        })
    }

    /// The six coefficients `[m11, m12, m21, m22, dx, dy]`.
    pub fn coefficients(&self) -> [f64; 6] {
        [self.m11, self.m12, self.m21, self.m22, self.dx, self.dy]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_then_scale_order() {
        let t = Affine2D::identity().translate(10.0, 20.0).scale(2.0, 3.0);
        // scale is applied first, then the translation
        assert_eq!(t.map(1.0, 1.0), (12.0, 23.0));
    }

    #[test]
    fn test_translate_respects_linear_part() {
        let t = Affine2D::diagonal(-1.0, 1.0).translate(5.0, 5.0);
        assert_eq!(t.map(0.0, 0.0), (-5.0, 5.0));
    }

    #[test]
    fn test_then_applies_left_first() {
        let a = Affine2D::translation(1.0, 0.0);
        let b = Affine2D::diagonal(2.0, 2.0);
        assert_eq!(a.then(&b).map(1.0, 1.0), (4.0, 2.0));
        assert_eq!(b.then(&a).map(1.0, 1.0), (3.0, 2.0));
    }

    #[test]
    fn test_inverse() {
        let t = Affine2D::new(0.0, 2.0, -3.0, 0.0, 7.0, -1.0);
        let inv = t.inverse().unwrap();
        let (x, y) = t.map(4.0, -6.0);
        let (bx, by) = inv.map(x, y);
        assert!((bx - 4.0).abs() < 1e-12);
        assert!((by + 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine2D::diagonal(0.0, 1.0).inverse().is_none());
    }
}
