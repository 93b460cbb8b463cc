//! 4×4 matrix for orientation, permutation and composed transforms.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::Vector4;
use crate::error::MatrixInversionFallback;

const ORTHONORMAL_TOLERANCE: f64 = 1e-9;
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Row-major 4×4 matrix. Products use the column-vector convention `M × v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4(pub [[f64; 4]; 4]);

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn zeros() -> Self {
        Self([[0.0; 4]; 4])
    }

    pub const fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(rows)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.0[row][col] = value;
    }

    pub fn transpose(&self) -> Self {
        Self(std::array::from_fn(|r| std::array::from_fn(|c| self.0[c][r])))
    }

    /// Entry-wise absolute value of the spatial 3×3 block; the rest is kept.
    pub fn abs3(&self) -> Self {
        let mut out = *self;
        for row in out.0.iter_mut().take(3) {
            for v in row.iter_mut().take(3) {
                *v = v.abs();
            }
        }
        out
    }

    /// True when the spatial 3×3 block has exactly one `±1` per row and per
    /// column (zeros elsewhere) and the homogeneous row/column is `(0, 0, 0, 1)`.
    pub fn is_signed_permutation(&self) -> bool {
        if !self.is_affine() || self.0[0][3] != 0.0 || self.0[1][3] != 0.0 || self.0[2][3] != 0.0
        {
            return false;
        }
        let one_per_line = |line: [f64; 3]| {
            let nonzero: Vec<f64> = line.into_iter().filter(|v| *v != 0.0).collect();
            nonzero.len() == 1 && nonzero[0].abs() == 1.0
        };
        (0..3).all(|r| one_per_line([self.0[r][0], self.0[r][1], self.0[r][2]]))
            && (0..3).all(|c| one_per_line([self.0[0][c], self.0[1][c], self.0[2][c]]))
    }

    /// Last row is `(0, 0, 0, 1)`.
    pub fn is_affine(&self) -> bool {
        self.0[3] == [0.0, 0.0, 0.0, 1.0]
    }

    pub fn is_orthonormal(&self) -> bool {
        let product = *self * self.transpose();
        (0..4).all(|r| {
            (0..4).all(|c| {
                let expected = if r == c { 1.0 } else { 0.0 };
                (product.0[r][c] - expected).abs() <= ORTHONORMAL_TOLERANCE
            })
        })
    }

    /// Determinant of the spatial 3×3 block.
    pub fn determinant3(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Exact inverse, or the transpose when no exact inverse exists.
    ///
    /// Orthonormal matrices (every signed permutation among them) invert to
    /// their transpose. Other affine matrices are inverted through the
    /// adjugate of their 3×3 block. Singular or non-affine matrices yield
    /// [`MatrixInversionFallback`] carrying the transpose.
    pub fn inverse_or_transpose(&self) -> Result<Self, MatrixInversionFallback> {
        if self.is_orthonormal() {
            return Ok(self.transpose());
        }
        let det = self.determinant3();
        if !self.is_affine() || !det.is_finite() || det.abs() < SINGULAR_TOLERANCE {
            tracing::warn!(
                determinant = det,
                affine = self.is_affine(),
                "failed to invert matrix, falling back to transposed"
            );
            return Err(MatrixInversionFallback {
                transpose: self.transpose(),
            });
        }

        let m = &self.0;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        let mut inv = Self::identity();
        inv.0[0][0] = cof(1, 2, 1, 2) / det;
        inv.0[0][1] = -cof(0, 2, 1, 2) / det;
        inv.0[0][2] = cof(0, 1, 1, 2) / det;
        inv.0[1][0] = -cof(1, 2, 0, 2) / det;
        inv.0[1][1] = cof(0, 2, 0, 2) / det;
        inv.0[1][2] = -cof(0, 1, 0, 2) / det;
        inv.0[2][0] = cof(1, 2, 0, 1) / det;
        inv.0[2][1] = -cof(0, 2, 0, 1) / det;
        inv.0[2][2] = cof(0, 1, 0, 1) / det;

        let t = [m[0][3], m[1][3], m[2][3]];
        for r in 0..3 {
            inv.0[r][3] = -(0..3).map(|c| inv.0[r][c] * t[c]).sum::<f64>();
        }
        Ok(inv)
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .map(|(r, c)| (self.0[r][c] - other.0[r][c]).abs())
            .fold(0.0, f64::max)
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(std::array::from_fn(|r| {
            std::array::from_fn(|c| (0..4).map(|k| self.0[r][k] * rhs.0[k][c]).sum())
        }))
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Self::Output {
        Vector4(std::array::from_fn(|r| {
            (0..4).map(|k| self.0[r][k] * rhs.0[k]).sum()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap_xy() -> Matrix4 {
        Matrix4::from_rows([
            [0.0, -1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    #[test]
    fn test_product_with_identity() {
        let m = swap_xy();
        assert_eq!(m * Matrix4::identity(), m);
        assert_eq!(Matrix4::identity() * m, m);
    }

    #[test]
    fn test_matrix_vector_product() {
        let v = swap_xy() * Vector4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v, Vector4::new(-2.0, 1.0, 3.0, 4.0));
    }

    #[test]
    fn test_signed_permutation_detection() {
        assert!(swap_xy().is_signed_permutation());
        assert!(Matrix4::identity().is_signed_permutation());
        let mut m = swap_xy();
        m.set(0, 2, 1.0);
        assert!(!m.is_signed_permutation());
        let mut m = Matrix4::identity();
        m.set(1, 1, 2.0);
        assert!(!m.is_signed_permutation());
    }

    #[test]
    fn test_inverse_of_permutation_is_transpose() {
        let m = swap_xy();
        let inv = m.inverse_or_transpose().unwrap();
        assert_eq!(inv, m.transpose());
        assert_eq!(m * inv, Matrix4::identity());
    }

    #[test]
    fn test_inverse_of_scaled_affine() {
        let m = Matrix4::from_rows([
            [2.0, 0.0, 0.0, 4.0],
            [0.0, 0.5, 0.0, -1.0],
            [0.0, 1.0, 3.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let inv = m.inverse_or_transpose().unwrap();
        assert!((m * inv).max_abs_diff(&Matrix4::identity()) < 1e-12);
        assert!((inv * m).max_abs_diff(&Matrix4::identity()) < 1e-12);
    }

    #[test]
    fn test_singular_matrix_falls_back_to_transpose() {
        let m = Matrix4::from_rows([
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let fallback = m.inverse_or_transpose().unwrap_err();
        assert_eq!(fallback.into_transpose(), m.transpose());
    }

    #[test]
    fn test_abs3_keeps_homogeneous_part() {
        let mut m = swap_xy();
        m.set(0, 3, -5.0);
        let a = m.abs3();
        assert_eq!(a.get(0, 1), 1.0);
        assert_eq!(a.get(0, 3), -5.0);
    }
}
