//! Homogeneous 4-component vector.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

/// Ordered 4-tuple `(x, y, z, w)`.
///
/// Used for coordinates, voxel sizes, image sizes and direction vectors. The
/// fourth component is `1` for positions, `0` for directions and carries the
/// number of time steps for image sizes. Every [`Matrix4`](super::Matrix4) in
/// this crate has a `1` at `(3, 3)`, so `w` passes through mappings untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4(pub [f64; 4]);

impl Vector4 {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self([x, y, z, w])
    }

    /// Direction or extent (`w = 0`).
    pub const fn direction(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z, 0.0])
    }

    /// Position (`w = 1`).
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z, 1.0])
    }

    pub const fn zeros() -> Self {
        Self([0.0; 4])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    pub fn w(&self) -> f64 {
        self.0[3]
    }

    pub fn as_array(&self) -> &[f64; 4] {
        &self.0
    }

    pub fn xyz(&self) -> [f64; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Component-wise absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.map(f64::abs))
    }

    /// Component-wise product.
    pub fn component_mul(&self, other: &Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i] * other.0[i]))
    }

    /// Dot product over the spatial components only.
    pub fn dot3(&self, other: &Self) -> f64 {
        (0..3).map(|i| self.0[i] * other.0[i]).sum()
    }

    /// Cross product over the spatial components, `w = 0`.
    pub fn cross3(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.xyz();
        let [bx, by, bz] = other.xyz();
        Self::direction(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    pub fn norm3(&self) -> f64 {
        self.dot3(self).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Index of the spatial component with the largest magnitude.
    ///
    /// Ties resolve to the lowest index. Returns `None` for a zero or
    /// non-finite vector.
    pub fn largest_abs_index(&self) -> Option<usize> {
        if !self.xyz().iter().all(|v| v.is_finite()) {
            return None;
        }
        let mut best = 0;
        for i in 1..3 {
            if self.0[i].abs() > self.0[best].abs() {
                best = i;
            }
        }
        (self.0[best] != 0.0).then_some(best)
    }

    /// Maximum absolute component-wise difference.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        (0..4)
            .map(|i| (self.0[i] - other.0[i]).abs())
            .fold(0.0, f64::max)
    }
}

impl From<[f64; 4]> for Vector4 {
    fn from(value: [f64; 4]) -> Self {
        Self(value)
    }
}

impl From<[usize; 4]> for Vector4 {
    fn from(value: [usize; 4]) -> Self {
        Self(value.map(|v| v as f64))
    }
}

impl Index<usize> for Vector4 {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vector4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Add for Vector4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for Vector4 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Mul<f64> for Vector4 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0.map(|v| v * rhs))
    }
}

impl Neg for Vector4 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.map(|v| -v))
    }
}
