//! Image metadata consumed by the transform engine.

use crate::bounding_box::BoundingBox;
use crate::enums::{MapDirection, Plane, PlaneOrientation};
use crate::error::{GeometryError, Result};
use crate::mapper::CoordinateMapper;
use crate::math::Vector4;
use crate::orientation::{NormalizedOrientation, OrientationBasis};

/// Geometry of one image: voxel grid size, spacing, position and orientation.
///
/// The normalized orientation is derived once on construction. All fields are
/// read-only afterwards, so nothing derived from them can go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGeometry {
    size: [usize; 4],
    voxel_size: Vector4,
    origin: Vector4,
    basis: OrientationBasis,
    orientation: NormalizedOrientation,
    latched_orientation: NormalizedOrientation,
}

impl ImageGeometry {
    /// Image with its origin at zero. The latched orientation defaults to the
    /// image's own normalized orientation.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidOrientation`] for a degenerate basis and
    /// [`GeometryError::InvalidVoxelSize`] for a non-positive or non-finite
    /// voxel size.
    pub fn new(size: [usize; 4], voxel_size: Vector4, basis: OrientationBasis) -> Result<Self> {
        if !voxel_size.xyz().iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(GeometryError::InvalidVoxelSize(format!(
                "must be positive, got {:?}",
                voxel_size.xyz()
            )));
        }
        let orientation = basis.normalized(false)?;
        Ok(Self {
            size,
            voxel_size,
            origin: Vector4::point(0.0, 0.0, 0.0),
            basis,
            orientation,
            latched_orientation: orientation,
        })
    }

    /// Physical position of the centre of voxel `(0, 0, 0)`.
    pub fn with_origin(mut self, origin: Vector4) -> Self {
        self.origin = origin;
        self
    }

    /// Orientation shared by several images for aligned comparison.
    pub fn with_latched_orientation(mut self, latched: NormalizedOrientation) -> Self {
        self.latched_orientation = latched;
        self
    }

    pub fn size(&self) -> [usize; 4] {
        self.size
    }

    /// Size as a vector, `w` carrying the number of time steps.
    pub fn size_vector(&self) -> Vector4 {
        Vector4::from(self.size)
    }

    pub fn voxel_size(&self) -> Vector4 {
        self.voxel_size
    }

    pub fn origin(&self) -> Vector4 {
        self.origin
    }

    pub fn basis(&self) -> &OrientationBasis {
        &self.basis
    }

    pub fn orientation(&self) -> &NormalizedOrientation {
        &self.orientation
    }

    pub fn latched_orientation(&self) -> &NormalizedOrientation {
        &self.latched_orientation
    }

    /// Physical coordinates of a (possibly fractional) voxel index.
    pub fn physical_coords_from_index(&self, index: Vector4) -> Vector4 {
        let mut p = self.origin;
        for (slot, dir) in [self.basis.row, self.basis.column, self.basis.slice]
            .iter()
            .enumerate()
        {
            let step = index[slot] * self.voxel_size[slot];
            for i in 0..3 {
                p[i] += dir[i] * step;
            }
        }
        p
    }

    /// Physical extent of the whole voxel grid, voxel corners included.
    pub fn physical_extent(&self) -> BoundingBox {
        let lo = -0.5;
        let hi = |slot: usize| self.size[slot] as f64 - 0.5;
        let mut bbox = BoundingBox::empty();
        for corner in 0..8 {
            let pick = |slot: usize| if corner & (1 << slot) == 0 { lo } else { hi(slot) };
            let index = Vector4::point(pick(0), pick(1), pick(2));
            bbox.include(&self.physical_coords_from_index(index));
        }
        bbox
    }

    pub fn mapper(&self, plane: impl Into<PlaneOrientation>) -> Result<CoordinateMapper> {
        CoordinateMapper::new(&self.orientation, plane)
    }

    pub fn latched_mapper(&self, plane: impl Into<PlaneOrientation>) -> Result<CoordinateMapper> {
        CoordinateMapper::new(&self.latched_orientation, plane)
    }

    /// Voxel grid size as seen on `plane`: `(width, height, slices)`.
    pub fn mapped_size(&self, plane: Plane) -> Vector4 {
        CoordinateMapper::for_plane(&self.orientation, plane).map(
            self.size_vector(),
            MapDirection::Forward,
            true,
        )
    }

    /// Voxel spacing as seen on `plane`.
    pub fn mapped_voxel_size(&self, plane: Plane) -> Vector4 {
        CoordinateMapper::for_plane(&self.orientation, plane).map(
            self.voxel_size,
            MapDirection::Forward,
            true,
        )
    }
}
