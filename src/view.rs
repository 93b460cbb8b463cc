//! Composition of the 2D transforms that put a plane on screen.

use rayon::prelude::*;

use crate::bounding_box::{PlaneRect, ScalingAndOffset, scaling_and_offset};
use crate::config::ViewConfig;
use crate::enums::{MapDirection, Plane, PlaneOrientation};
use crate::error::{MatrixInversionFallback, Result};
use crate::image::ImageGeometry;
use crate::mapper::CoordinateMapper;
use crate::math::{Affine2D, Vector4};

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Transform from an image's plane voxel coordinates to viewport pixels.
///
/// The image is flipped to radiological display orientation, scaled to fit
/// the viewport with its aspect ratio preserved and centred. Flipped axes are
/// shifted back by the mapped image extent so the result stays inside
/// positive screen coordinates.
pub fn view_transform(
    image: &ImageGeometry,
    viewport_width: f64,
    viewport_height: f64,
    plane: impl Into<PlaneOrientation>,
) -> Result<Affine2D> {
    let plane = plane.into().resolve()?;
    let mapper = CoordinateMapper::for_plane(image.orientation(), plane);
    let mapped_size = image.mapped_size(plane);
    let flip = mapper.map(Vector4::direction(1.0, 1.0, 1.0), MapDirection::Forward, false);
    let (flip_x, flip_y) = (sign(flip[0]), sign(flip[1]));

    let fit = scaling_and_offset(image, viewport_width, viewport_height, plane)?;

    Ok(Affine2D::diagonal(flip_x, flip_y)
        .translate(flip_x * fit.offset_x, flip_y * fit.offset_y)
        .scale(fit.scale_x, fit.scale_y)
        .translate(
            if flip_x < 0.0 { -mapped_size[0] } else { 0.0 },
            if flip_y < 0.0 { -mapped_size[1] } else { 0.0 },
        ))
}

/// [`view_transform`] for several images at once, computed in parallel.
pub fn view_transforms(
    images: &[ImageGeometry],
    viewport_width: f64,
    viewport_height: f64,
    plane: impl Into<PlaneOrientation>,
) -> Result<Vec<Affine2D>> {
    let plane = plane.into().resolve()?;
    images
        .par_iter()
        .map(|image| view_transform(image, viewport_width, viewport_height, plane))
        .collect()
}

/// Aspect-preserving transform from a rastered plane rectangle (for example a
/// zoomed bounding box) to viewport pixels.
pub fn bounding_box_view_transform(
    rect: &PlaneRect,
    viewport_width: f64,
    viewport_height: f64,
) -> Result<Affine2D> {
    let fit = ScalingAndOffset::fit(rect.width, rect.height, viewport_width, viewport_height)?;
    Ok(Affine2D::translation(fit.offset_x, fit.offset_y)
        .scale(fit.scale_x, fit.scale_y)
        .translate(-rect.x, -rect.y))
}

/// Mirrors plane coordinates inside `rect` into radiological display
/// convention.
pub fn display_flip_transform(
    plane: impl Into<PlaneOrientation>,
    rect: &PlaneRect,
) -> Result<Affine2D> {
    let flip_x = rect.width + rect.x * 2.0;
    let flip_y = rect.height + rect.y * 2.0;
    Ok(match plane.into().resolve()? {
        Plane::Axial => Affine2D::new(-1.0, 0.0, 0.0, 1.0, flip_x, 0.0),
        Plane::Sagittal => Affine2D::new(1.0, 0.0, 0.0, -1.0, 0.0, flip_y),
        Plane::Coronal => Affine2D::new(-1.0, 0.0, 0.0, -1.0, flip_x, flip_y),
    })
}

/// In-plane 2×2 part of an image's orientation relative to its latched
/// orientation.
///
/// The orientation (latched or raw) is multiplied by the inverse, or with
/// `inverse = false` the transpose, of the sign-stripped latched orientation.
/// A latched orientation that cannot be inverted falls back to the transpose.
pub fn in_plane_matrix(
    image: &ImageGeometry,
    plane: impl Into<PlaneOrientation>,
    latched: bool,
    inverse: bool,
) -> Result<[[f64; 2]; 2]> {
    let plane = plane.into().resolve()?;
    let latched_abs = image.latched_orientation().matrix().abs3();
    let inv = if inverse {
        latched_abs
            .inverse_or_transpose()
            .unwrap_or_else(MatrixInversionFallback::into_transpose)
    } else {
        latched_abs.transpose()
    };
    let orientation = if latched {
        *image.latched_orientation().matrix()
    } else {
        image.basis().raw_matrix(false)
    };
    let m = orientation * inv;
    let pick = |r0: usize, r1: usize| {
        [[m.get(r0, r0), m.get(r0, r1)], [m.get(r1, r0), m.get(r1, r1)]]
    };
    Ok(match plane {
        Plane::Axial => pick(0, 1),
        Plane::Sagittal => pick(1, 2),
        Plane::Coronal => pick(0, 2),
    })
}

/// Places an image's voxel raster in rastered physical plane space.
///
/// Latched images sit at the plane origin. Otherwise the raster is moved to
/// the physical position of the first voxel of the slice under
/// `cursor_voxel`, less half a voxel so that voxel corners line up.
pub fn image_placement_transform(
    image: &ImageGeometry,
    plane: impl Into<PlaneOrientation>,
    latched: bool,
    cursor_voxel: [usize; 4],
    config: &ViewConfig,
) -> Result<Affine2D> {
    let plane = plane.into().resolve()?;
    let m = in_plane_matrix(image, plane, latched, false)?;
    let mapper = CoordinateMapper::for_plane(image.latched_orientation(), plane);
    let voxel = mapper.map(image.voxel_size(), MapDirection::Forward, true) * config.rastering();

    let (origin, half_voxel) = if latched {
        (Vector4::zeros(), [0.0, 0.0])
    } else {
        let slice = mapper.map_index(cursor_voxel, MapDirection::Forward)[2];
        let first = mapper.map_index([0, 0, slice, 0], MapDirection::Back);
        let origin = image.physical_coords_from_index(Vector4::from(first)) * config.rastering();
        let half = [voxel[0] / 2.0, voxel[1] / 2.0];
        (
            origin,
            [
                m[0][0] * half[0] + m[0][1] * half[1],
                m[1][0] * half[0] + m[1][1] * half[1],
            ],
        )
    };

    let (a, b) = plane.axes();
    tracing::trace!(%plane, latched, ?origin, ?half_voxel, "image placement");
    Ok(Affine2D::new(m[0][0], m[0][1], m[1][0], m[1][1], 0.0, 0.0)
        .then(&Affine2D::translation(origin[a] - half_voxel[0], origin[b] - half_voxel[1]))
        .scale(voxel[0], voxel[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::orientation::OrientationBasis;

    fn image(size: [usize; 4]) -> ImageGeometry {
        ImageGeometry::new(size, Vector4::direction(1.0, 1.0, 1.0), OrientationBasis::identity())
            .unwrap()
    }

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_axial_view_transform_flips_horizontally() {
        let t = view_transform(&image([256, 128, 10, 1]), 512.0, 512.0, Plane::Axial).unwrap();
        assert_close(t.map(0.0, 0.0), (512.0, 128.0));
        assert_close(t.map(256.0, 128.0), (0.0, 384.0));
    }

    #[test]
    fn test_coronal_view_transform_stays_in_viewport() {
        let g = image([64, 32, 16, 1]);
        let t = view_transform(&g, 300.0, 200.0, Plane::Coronal).unwrap();
        for (x, y) in [(0.0, 0.0), (64.0, 0.0), (0.0, 16.0), (64.0, 16.0)] {
            let (px, py) = t.map(x, y);
            assert!((-1e-9..=300.0 + 1e-9).contains(&px), "x {px}");
            assert!((-1e-9..=200.0 + 1e-9).contains(&py), "y {py}");
        }
    }

    #[test]
    fn test_view_transform_inverse_maps_clicks_back() {
        let t = view_transform(&image([100, 60, 20, 1]), 640.0, 480.0, Plane::Sagittal).unwrap();
        let inv = t.inverse().unwrap();
        let (sx, sy) = t.map(12.5, 7.0);
        assert_close(inv.map(sx, sy), (12.5, 7.0));
    }

    #[test]
    fn test_view_transforms_batch() {
        let images = [image([10, 10, 10, 1]), image([20, 10, 5, 1])];
        let all = view_transforms(&images, 100.0, 100.0, Plane::Axial).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], view_transform(&images[1], 100.0, 100.0, Plane::Axial).unwrap());
    }

    #[test]
    fn test_unspecified_plane_is_rejected() {
        let err = view_transform(&image([1, 1, 1, 1]), 10.0, 10.0, PlaneOrientation::NotSpecified);
        assert_eq!(err.unwrap_err(), GeometryError::UnspecifiedPlane);
        let err = display_flip_transform(PlaneOrientation::NotSpecified, &PlaneRect::default());
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_viewport_is_rejected() {
        let g = image([256, 128, 10, 1]);
        let err = view_transform(&g, f64::NAN, 512.0, Plane::Axial).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidViewport { .. }));
        let err = view_transform(&g, -512.0, 512.0, Plane::Axial).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidViewport { .. }));
        let rect = PlaneRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(bounding_box_view_transform(&rect, 400.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_bounding_box_view_transform() {
        let rect = PlaneRect::new(50.0, 50.0, 100.0, 100.0);
        let t = bounding_box_view_transform(&rect, 400.0, 200.0).unwrap();
        assert_close(t.map(50.0, 50.0), (100.0, 0.0));
        assert_close(t.map(150.0, 150.0), (300.0, 200.0));
    }

    #[test]
    fn test_display_flip_mirrors_inside_box() {
        let rect = PlaneRect::new(10.0, 20.0, 100.0, 50.0);
        let axial = display_flip_transform(Plane::Axial, &rect).unwrap();
        assert_close(axial.map(10.0, 20.0), (110.0, 20.0));
        let coronal = display_flip_transform(Plane::Coronal, &rect).unwrap();
        assert_close(coronal.map(10.0, 20.0), (110.0, 70.0));
        let sagittal = display_flip_transform(Plane::Sagittal, &rect).unwrap();
        assert_close(sagittal.map(10.0, 70.0), (10.0, 20.0));
    }

    #[test]
    fn test_in_plane_matrix_identity() {
        let g = image([4, 4, 4, 1]);
        for plane in Plane::ALL {
            assert_eq!(in_plane_matrix(&g, plane, true, true).unwrap(), [[1.0, 0.0], [0.0, 1.0]]);
        }
    }

    #[test]
    fn test_in_plane_matrix_keeps_flip() {
        let basis = OrientationBasis::new(
            Vector4::direction(-1.0, 0.0, 0.0),
            Vector4::direction(0.0, 1.0, 0.0),
            Vector4::direction(0.0, 0.0, 1.0),
        );
        let g = ImageGeometry::new([4, 4, 4, 1], Vector4::direction(1.0, 1.0, 1.0), basis).unwrap();
        let m = in_plane_matrix(&g, Plane::Axial, true, false).unwrap();
        assert_eq!(m, [[-1.0, 0.0], [0.0, 1.0]]);
    }

    #[test]
    fn test_image_placement_latched() {
        let config = ViewConfig::default();
        let t = image_placement_transform(&image([8, 8, 8, 1]), Plane::Axial, true, [0; 4], &config)
            .unwrap();
        assert_close(t.map(0.0, 0.0), (0.0, 0.0));
        assert_close(t.map(1.0, 1.0), (10.0, 10.0));
    }

    #[test]
    fn test_image_placement_physical() {
        let g = image([8, 8, 8, 1]).with_origin(Vector4::point(5.0, 5.0, 5.0));
        let config = ViewConfig::default();
        let t = image_placement_transform(&g, Plane::Axial, false, [2, 3, 4, 0], &config).unwrap();
        assert_close(t.map(0.0, 0.0), (45.0, 45.0));
        assert_close(t.map(1.0, 1.0), (55.0, 55.0));
    }
}
