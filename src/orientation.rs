//! Normalized orientation matrices derived from acquisition basis vectors.
//!
//! An image's row, column and slice direction vectors are rarely exactly
//! axis-aligned. For display purposes every voxel axis is snapped to the
//! physical axis it is closest to, which yields a signed permutation matrix
//! whose inverse is its transpose.

use serde::{Deserialize, Serialize};

use crate::enums::BasisAxis;
use crate::error::{GeometryError, Result};
use crate::math::{Matrix4, Vector4};

/// Row, column and slice direction vectors of an image in physical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationBasis {
    pub row: Vector4,
    pub column: Vector4,
    pub slice: Vector4,
}

impl Default for OrientationBasis {
    fn default() -> Self {
        Self::identity()
    }
}

impl OrientationBasis {
    pub const fn new(row: Vector4, column: Vector4, slice: Vector4) -> Self {
        Self { row, column, slice }
    }

    pub const fn identity() -> Self {
        Self {
            row: Vector4::direction(1.0, 0.0, 0.0),
            column: Vector4::direction(0.0, 1.0, 0.0),
            slice: Vector4::direction(0.0, 0.0, 1.0),
        }
    }

    /// Basis with the slice vector taken as `row × column`.
    pub fn from_row_column(row: Vector4, column: Vector4) -> Self {
        Self {
            row,
            column,
            slice: row.cross3(&column),
        }
    }

    pub fn vector(&self, axis: BasisAxis) -> &Vector4 {
        match axis {
            BasisAxis::Row => &self.row,
            BasisAxis::Column => &self.column,
            BasisAxis::Slice => &self.slice,
        }
    }

    /// Un-normalized orientation: the basis vectors as columns, or as rows
    /// when `transposed`.
    pub fn raw_matrix(&self, transposed: bool) -> Matrix4 {
        let mut m = Matrix4::zeros();
        m.set(3, 3, 1.0);
        for axis in BasisAxis::ALL {
            let v = self.vector(axis);
            for i in 0..3 {
                if transposed {
                    m.set(axis.slot(), i, v[i]);
                } else {
                    m.set(i, axis.slot(), v[i]);
                }
            }
        }
        m
    }

    /// Builds the normalized orientation matrix.
    ///
    /// Each basis vector is assigned to the physical axis of its
    /// largest-magnitude component, with the sign of that component. When two
    /// components tie, the lower physical axis wins. Without `transposed` the
    /// matrix maps voxel to physical axes; with it, physical to voxel.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidOrientation`] if a vector is zero or not finite,
    /// or if two vectors snap to the same physical axis.
    pub fn normalized(&self, transposed: bool) -> Result<NormalizedOrientation> {
        let mut m = Matrix4::zeros();
        m.set(3, 3, 1.0);
        let mut claimed: [Option<BasisAxis>; 3] = [None; 3];

        for axis in BasisAxis::ALL {
            let v = self.vector(axis);
            let physical = v.largest_abs_index().ok_or_else(|| {
                GeometryError::invalid_orientation(format!(
                    "degenerate {axis} direction vector {:?}",
                    v.xyz()
                ))
            })?;
            if let Some(other) = claimed[physical] {
                return Err(GeometryError::invalid_orientation(format!(
                    "{other} and {axis} direction vectors both align with physical axis {physical}"
                )));
            }
            claimed[physical] = Some(axis);

            let sign = if v[physical] < 0.0 { -1.0 } else { 1.0 };
            if transposed {
                m.set(axis.slot(), physical, sign);
            } else {
                m.set(physical, axis.slot(), sign);
            }
        }

        Ok(NormalizedOrientation(m))
    }
}

/// Signed permutation matrix snapping voxel axes onto physical axes.
///
/// Every row and every column of the spatial block holds exactly one `±1`,
/// so the transpose is the exact inverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Matrix4", into = "Matrix4")]
pub struct NormalizedOrientation(Matrix4);

impl Default for NormalizedOrientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl NormalizedOrientation {
    pub const fn identity() -> Self {
        Self(Matrix4::IDENTITY)
    }

    /// Wraps an existing matrix, e.g. a latched orientation resolved by the
    /// caller.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidOrientation`] if `matrix` is not a signed
    /// permutation.
    pub fn from_matrix(matrix: Matrix4) -> Result<Self> {
        if matrix.is_signed_permutation() {
            Ok(Self(matrix))
        } else {
            Err(GeometryError::invalid_orientation(
                "matrix is not a signed permutation",
            ))
        }
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.0
    }

    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Same as [`transpose`](Self::transpose).
    pub fn inverse(&self) -> Self {
        self.transpose()
    }

    /// Physical axis that voxel axis `slot` maps onto, with its sign.
    pub fn physical_axis_of(&self, slot: usize) -> (usize, f64) {
        (0..3)
            .find_map(|r| {
                let v = self.0.get(r, slot);
                (v != 0.0).then_some((r, v))
            })
            .unwrap_or((slot, 1.0))
    }
}

impl TryFrom<Matrix4> for NormalizedOrientation {
    type Error = GeometryError;

    fn try_from(matrix: Matrix4) -> Result<Self> {
        Self::from_matrix(matrix)
    }
}

impl From<NormalizedOrientation> for Matrix4 {
    fn from(value: NormalizedOrientation) -> Self {
        value.0
    }
}
