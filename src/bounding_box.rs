//! Plane bounding boxes and viewport fitting.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::enums::{MapDirection, Plane, PlaneOrientation};
use crate::error::{GeometryError, Result};
use crate::image::ImageGeometry;
use crate::mapper::CoordinateMapper;
use crate::math::Vector4;

/// Per-axis `(min, max)` in physical or voxel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Box containing nothing; the identity of [`union`](Self::union).
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn include(&mut self, point: &Vector4) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: std::array::from_fn(|i| self.min[i].min(other.min[i])),
            max: std::array::from_fn(|i| self.max[i].max(other.max[i])),
        }
    }

    pub fn extent(&self, axis: usize) -> f64 {
        (self.max[axis] - self.min[axis]).abs()
    }

    /// Projection onto `plane`, scaled by `factor`.
    pub fn project(&self, plane: Plane, factor: f64) -> PlaneRect {
        let (a, b) = plane.axes();
        PlaneRect {
            x: self.min[a] * factor,
            y: self.min[b] * factor,
            width: self.extent(a) * factor,
            height: self.extent(b) * factor,
        }
    }
}

/// Rectangle on a plane: `(offset x, offset y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlaneRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// Voxel-grid bounding box of latched images.
///
/// Sizes and spacings are mapped through each image's latched orientation
/// onto the axial plane, which puts them in physical axis order. The box spans
/// `[0, max(size × spacing)]` on each axis.
pub fn voxel_bounding_box(images: &[ImageGeometry]) -> Result<BoundingBox> {
    if images.is_empty() {
        return Err(GeometryError::NoImages);
    }
    Ok(images
        .par_iter()
        .map(|image| {
            let mapper = CoordinateMapper::for_plane(image.latched_orientation(), Plane::Axial);
            let size = mapper.map(image.size_vector(), MapDirection::Forward, true);
            let spacing = mapper.map(image.voxel_size(), MapDirection::Forward, true);
            BoundingBox {
                min: [0.0; 3],
                max: std::array::from_fn(|i| size[i] * spacing[i]),
            }
        })
        .reduce(BoundingBox::empty, BoundingBox::union))
}

/// Union of the physical extents of all images.
pub fn physical_extent(images: &[ImageGeometry]) -> Result<BoundingBox> {
    if images.is_empty() {
        return Err(GeometryError::NoImages);
    }
    Ok(images
        .par_iter()
        .map(ImageGeometry::physical_extent)
        .reduce(BoundingBox::empty, BoundingBox::union))
}

/// Bounding box of `images` on `plane`, in rastered units.
///
/// `latched` aligns the images on a shared voxel grid and ignores their true
/// positions; the box then starts at the plane origin. Otherwise the union of
/// their physical extents is used, where an image spans its voxel corners:
/// voxel centres sit at `origin + index * spacing`, so an axis of `n` voxels
/// covers `origin - spacing / 2` to `origin + (n - 1/2) * spacing`. A
/// 100 × 100 axial image with unit spacing and its origin at zero therefore
/// projects to `(-5, -5, 1000, 1000)` at the default rastering factor.
pub fn physical_bounding_box(
    images: &[ImageGeometry],
    plane: impl Into<PlaneOrientation>,
    latched: bool,
    config: &ViewConfig,
) -> Result<PlaneRect> {
    let plane = plane.into().resolve()?;
    let bbox = if latched {
        voxel_bounding_box(images)?
    } else {
        physical_extent(images)?
    };
    let rect = bbox.project(plane, config.rastering());
    tracing::debug!(%plane, latched, images = images.len(), ?rect, "computed plane bounding box");
    Ok(rect)
}

/// Scale and centring offset that fit an image into a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScalingAndOffset {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ScalingAndOffset {
    /// Aspect-preserving fit of a `width × height` extent into a
    /// `viewport_width × viewport_height` viewport, centred.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidViewport`] when a viewport dimension is negative
    /// or not finite, [`GeometryError::ZeroExtent`] when either extent is zero
    /// or not finite.
    pub fn fit(width: f64, height: f64, viewport_width: f64, viewport_height: f64) -> Result<Self> {
        if ![viewport_width, viewport_height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
        {
            return Err(GeometryError::InvalidViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }
        for (axis, extent) in [width, height].into_iter().enumerate() {
            if !extent.is_finite() || extent == 0.0 {
                return Err(GeometryError::ZeroExtent { axis });
            }
        }

        let scale_w = viewport_width / width;
        let scale_h = viewport_height / height;
        let norm_h = if scale_w < scale_h { scale_w / scale_h } else { 1.0 };
        let norm_w = if scale_w > scale_h { scale_h / scale_w } else { 1.0 };
        let scale_x = scale_w * norm_w;
        let scale_y = scale_h * norm_h;

        Ok(Self {
            scale_x,
            scale_y,
            offset_x: (viewport_width - scale_x * width) / 2.0,
            offset_y: (viewport_height - scale_y * height) / 2.0,
        })
    }

    /// Unit scale, centred. Used in place of a fit that hit a zero extent.
    pub fn unit_fallback(
        width: f64,
        height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: (viewport_width - finite(width)) / 2.0,
            offset_y: (viewport_height - finite(height)) / 2.0,
        }
    }
}

/// Scale and offset that fit `image` into the viewport on `plane`.
pub fn scaling_and_offset(
    image: &ImageGeometry,
    viewport_width: f64,
    viewport_height: f64,
    plane: impl Into<PlaneOrientation>,
) -> Result<ScalingAndOffset> {
    let plane = plane.into().resolve()?;
    let mapped = image.mapped_size(plane);
    ScalingAndOffset::fit(mapped[0], mapped[1], viewport_width, viewport_height)
}

/// Like [`scaling_and_offset`], but a zero extent yields
/// [`ScalingAndOffset::unit_fallback`] with a warning instead of an error.
pub fn scaling_and_offset_or_fallback(
    image: &ImageGeometry,
    viewport_width: f64,
    viewport_height: f64,
    plane: impl Into<PlaneOrientation>,
) -> Result<ScalingAndOffset> {
    let plane = plane.into().resolve()?;
    match scaling_and_offset(image, viewport_width, viewport_height, plane) {
        Err(GeometryError::ZeroExtent { axis }) => {
            let mapped = image.mapped_size(plane);
            tracing::warn!(%plane, axis, "image has zero extent on plane, using unit scale");
            Ok(ScalingAndOffset::unit_fallback(
                mapped[0],
                mapped[1],
                viewport_width,
                viewport_height,
            ))
        }
        other => other,
    }
}
