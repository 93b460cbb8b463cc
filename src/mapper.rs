//! Mapping of coordinates between image space and plane display space.

use crate::enums::{MapDirection, Plane, PlaneOrientation};
use crate::error::Result;
use crate::math::{Matrix4, Vector4};
use crate::orientation::NormalizedOrientation;

/// Composed `plane × orientation` matrix for one image on one plane.
///
/// Because both factors are signed permutations, mapping back uses the
/// transpose, which is the exact inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    plane: Plane,
    composed: Matrix4,
}

impl CoordinateMapper {
    /// # Errors
    ///
    /// [`GeometryError::UnspecifiedPlane`](crate::error::GeometryError::UnspecifiedPlane)
    /// if `plane` is not resolved.
    pub fn new(
        orientation: &NormalizedOrientation,
        plane: impl Into<PlaneOrientation>,
    ) -> Result<Self> {
        let plane = plane.into().resolve()?;
        Ok(Self::for_plane(orientation, plane))
    }

    pub fn for_plane(orientation: &NormalizedOrientation, plane: Plane) -> Self {
        Self {
            plane,
            composed: plane.compose(orientation),
        }
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn composed(&self) -> &Matrix4 {
        &self.composed
    }

    pub fn forward(&self, coords: Vector4) -> Vector4 {
        self.composed * coords
    }

    pub fn back(&self, coords: Vector4) -> Vector4 {
        self.composed.transpose() * coords
    }

    /// Maps `coords` in `direction`. With `absolute` every output component is
    /// sign-stripped, which only makes sense for sizes and extents.
    pub fn map(&self, coords: Vector4, direction: MapDirection, absolute: bool) -> Vector4 {
        let mapped = match direction {
            MapDirection::Forward => self.forward(coords),
            MapDirection::Back => self.back(coords),
        };
        if absolute { mapped.abs() } else { mapped }
    }

    /// Maps voxel indices. Results are always sign-stripped since indices
    /// are never negative.
    pub fn map_index(&self, index: [usize; 4], direction: MapDirection) -> [usize; 4] {
        let m = match direction {
            MapDirection::Forward => self.composed,
            MapDirection::Back => self.composed.transpose(),
        };
        std::array::from_fn(|r| {
            let sum: i64 = (0..4)
                .map(|k| m.get(r, k) as i64 * index[k] as i64)
                .sum();
            sum.unsigned_abs() as usize
        })
    }
}

/// One-shot form of [`CoordinateMapper::map`].
pub fn map_coords(
    coords: Vector4,
    orientation: &NormalizedOrientation,
    plane: impl Into<PlaneOrientation>,
    direction: MapDirection,
    absolute: bool,
) -> Result<Vector4> {
    Ok(CoordinateMapper::new(orientation, plane)?.map(coords, direction, absolute))
}

/// One-shot form of [`CoordinateMapper::map_index`].
pub fn map_index(
    index: [usize; 4],
    orientation: &NormalizedOrientation,
    plane: impl Into<PlaneOrientation>,
    direction: MapDirection,
) -> Result<[usize; 4]> {
    Ok(CoordinateMapper::new(orientation, plane)?.map_index(index, direction))
}
