use ndarray::{Array3, ArrayView2, Axis};

use crate::enums::{Plane, PlaneOrientation};
use crate::error::{GeometryError, Result};
use crate::image::ImageGeometry;
use crate::math::Matrix4;

/// Voxel block together with the geometry that places it in physical space.
///
/// Data is stored as `(depth, height, width)`, i.e. voxel axes `(z, y, x)`.
#[derive(Debug, Clone)]
pub struct Volume<A> {
    data: Array3<A>,
    geometry: ImageGeometry,
}

/// Voxel axis feeding display row `row` of a composed plane matrix.
fn voxel_axis(composed: &Matrix4, row: usize) -> usize {
    (0..3).find(|&c| composed.get(row, c) != 0.0).unwrap_or(row)
}

/// Array axis holding voxel axis `voxel`.
fn array_axis(voxel: usize) -> Axis {
    Axis(2 - voxel)
}

impl<A> Volume<A> {
    /// # Errors
    ///
    /// [`GeometryError::DimensionMismatch`] if the array shape is not the
    /// geometry's `(z, y, x)` size.
    pub fn new(data: Array3<A>, geometry: ImageGeometry) -> Result<Self> {
        let size = geometry.size();
        let expected = (size[2], size[1], size[0]);
        if data.dim() != expected {
            return Err(GeometryError::dimension_mismatch(format!(
                "voxel data has shape {:?}, geometry expects {:?}",
                data.dim(),
                expected
            )));
        }
        Ok(Self { data, geometry })
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<A> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array3<A> {
        &mut self.data
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// Number of slices through the volume on `plane`.
    pub fn slice_count(&self, plane: impl Into<PlaneOrientation>) -> Result<usize> {
        let mapper = self.geometry.mapper(plane)?;
        let through = voxel_axis(mapper.composed(), 2);
        Ok(self.data.len_of(array_axis(through)))
    }

    /// Slice `index` on `plane`, counted along the voxel axis the plane looks
    /// through.
    ///
    /// Rows of the view follow the plane's vertical display axis and columns
    /// its horizontal one. Voxel order is kept; display flips are the job of
    /// the view transform.
    pub fn slice(
        &self,
        index: usize,
        plane: impl Into<PlaneOrientation>,
    ) -> Result<ArrayView2<'_, A>> {
        let plane: Plane = plane.into().resolve()?;
        let mapper = self.geometry.mapper(plane)?;
        let composed = mapper.composed();
        let through = voxel_axis(composed, 2);
        let vertical = voxel_axis(composed, 1);

        let count = self.data.len_of(array_axis(through));
        if index >= count {
            return Err(GeometryError::SliceOutOfRange { index, count });
        }

        let view = self.data.index_axis(array_axis(through), index);
        // remaining array axes run from the higher voxel axis to the lower one
        let row_axis = (0..3).filter(|&v| v != through).max().unwrap_or(vertical);
        Ok(if row_axis == vertical {
            view
        } else {
            view.reversed_axes()
        })
    }
}
