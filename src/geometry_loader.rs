use crate::{
    enums::SortBy,
    error::GeometryError,
    image::ImageGeometry,
    math::Vector4,
    orientation::OrientationBasis,
};

use dicom::object::{FileDicomObject, InMemDicomObject};
use dicom_dictionary_std::tags;
use std::cmp::Ordering;
use thiserror::Error;

const POSITION_EPSILON: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum GeometryLoaderError {
    #[error("No valid DICOM images found")]
    NoValidImages,

    #[error("Inconsistent image dimensions")]
    InconsistentDimensions,

    #[error("Missing spacing information")]
    MissingSpacing,

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

struct SliceInfo {
    rows: u32,
    columns: u32,
    row: Vector4,
    column: Vector4,
    position: Vector4,
    order: Option<f64>,
}

/// Builds [`ImageGeometry`] from the metadata of a DICOM series.
///
/// Only geometry attributes are read; pixel data is never decoded.
pub struct GeometryLoader;

impl GeometryLoader {
    /// Load the geometry of a series from DICOM objects
    ///
    /// # Arguments
    ///
    /// * `dicom_objects` - DICOM objects of one series, one slice each
    /// * `sort_by` - Method to sort the slices
    ///
    /// # Errors
    ///
    /// Returns error if no object carries geometry, the in-plane dimensions
    /// differ, no spacing can be found or the orientation is degenerate
    pub fn load_from_dicom_objects<'a>(
        dicom_objects: impl IntoIterator<Item = &'a InMemDicomObject>,
        sort_by: SortBy,
    ) -> Result<ImageGeometry, GeometryLoaderError> {
        let dicom_objects: Vec<&InMemDicomObject> = dicom_objects.into_iter().collect();
        let mut slices: Vec<SliceInfo> = dicom_objects
            .iter()
            .filter_map(|dicom_object| {
                let slice = Self::extract_slice(dicom_object, &sort_by);
                if slice.is_none() {
                    tracing::debug!("skipping DICOM object without image geometry");
                }
                slice
            })
            .collect();

        if slices.is_empty() {
            return Err(GeometryLoaderError::NoValidImages);
        }
        Self::validate_dimensions(&slices)?;

        let normal = slices[0].row.cross3(&slices[0].column);
        Self::sort_slices(&mut slices, &sort_by, &normal);

        let first = &slices[0];
        let last = &slices[slices.len() - 1];
        let travel = last.position - first.position;
        let slice_vector = if travel.norm3() > POSITION_EPSILON {
            travel * (1.0 / travel.norm3())
        } else {
            normal
        };

        let slice_spacing = Self::get_slice_spacing(&slices, &slice_vector)
            .or_else(|| Self::get_fallback_slice_spacing(&dicom_objects))
            .ok_or(GeometryLoaderError::MissingSpacing)?;
        let (row_spacing, column_spacing) =
            Self::get_pixel_spacing(&dicom_objects).ok_or(GeometryLoaderError::MissingSpacing)?;

        tracing::debug!(
            slices = slices.len(),
            slice_spacing,
            row_spacing,
            column_spacing,
            "loaded series geometry"
        );

        let basis = OrientationBasis::new(first.row, first.column, slice_vector);
        let geometry = ImageGeometry::new(
            [
                first.columns as usize,
                first.rows as usize,
                slices.len(),
                1,
            ],
            // x runs along a row, so it steps by the spacing between columns
            Vector4::direction(column_spacing, row_spacing, slice_spacing),
            basis,
        )?
        .with_origin(first.position);

        Ok(geometry)
    }

    /// Load the geometry of a series from file objects
    pub fn load_from_file_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
        sort_by: SortBy,
    ) -> Result<ImageGeometry, GeometryLoaderError> {
        Self::load_from_dicom_objects(dicom_objects.iter().map(|object| &**object), sort_by)
    }

    fn extract_slice(dicom_object: &InMemDicomObject, sort_by: &SortBy) -> Option<SliceInfo> {
        let rows = dicom_object.element(tags::ROWS).ok()?.to_int::<u32>().ok()?;
        let columns = dicom_object.element(tags::COLUMNS).ok()?.to_int::<u32>().ok()?;

        let orientation = dicom_object
            .element(tags::IMAGE_ORIENTATION_PATIENT)
            .ok()?
            .to_multi_float64()
            .ok()?;
        let position = dicom_object
            .element(tags::IMAGE_POSITION_PATIENT)
            .ok()?
            .to_multi_float64()
            .ok()?;
        if orientation.len() < 6 || position.len() < 3 {
            return None;
        }

        Some(SliceInfo {
            rows,
            columns,
            row: Vector4::direction(orientation[0], orientation[1], orientation[2]),
            column: Vector4::direction(orientation[3], orientation[4], orientation[5]),
            position: Vector4::point(position[0], position[1], position[2]),
            order: Self::get_sort_order(dicom_object, sort_by),
        })
    }

    fn get_sort_order(dicom_object: &InMemDicomObject, sort_by: &SortBy) -> Option<f64> {
        match sort_by {
            SortBy::TablePosition => dicom_object
                .element(tags::TABLE_POSITION)
                .ok()?
                .to_float64()
                .ok(),
            SortBy::InstanceNumber => dicom_object
                .element(tags::INSTANCE_NUMBER)
                .ok()?
                .to_int::<i32>()
                .ok()
                .map(f64::from),
            SortBy::ImagePositionPatient | SortBy::None => None,
        }
    }

    fn sort_slices(slices: &mut [SliceInfo], sort_by: &SortBy, normal: &Vector4) {
        match sort_by {
            SortBy::None => {}
            SortBy::ImagePositionPatient => slices.sort_by(|a, b| {
                a.position
                    .dot3(normal)
                    .partial_cmp(&b.position.dot3(normal))
                    .unwrap_or(Ordering::Equal)
            }),
            SortBy::TablePosition | SortBy::InstanceNumber => {
                slices.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(Ordering::Equal))
            }
        }
    }

    fn validate_dimensions(slices: &[SliceInfo]) -> Result<(), GeometryLoaderError> {
        let first = (slices[0].rows, slices[0].columns);
        if slices.iter().any(|s| (s.rows, s.columns) != first) {
            return Err(GeometryLoaderError::InconsistentDimensions);
        }
        Ok(())
    }

    fn get_slice_spacing(slices: &[SliceInfo], slice_vector: &Vector4) -> Option<f64> {
        let [first, second, ..] = slices else {
            return None;
        };
        let spacing = (second.position - first.position).dot3(slice_vector).abs();
        (spacing > POSITION_EPSILON).then_some(spacing)
    }

    fn get_fallback_slice_spacing(dicom_objects: &[&InMemDicomObject]) -> Option<f64> {
        [tags::SPACING_BETWEEN_SLICES, tags::SLICE_THICKNESS]
            .into_iter()
            .find_map(|tag| {
                dicom_objects.iter().find_map(|dicom_object| {
                    let value = dicom_object.element(tag).ok()?.to_float64().ok()?;
                    (value > 0.0).then_some(value)
                })
            })
    }

    fn get_pixel_spacing(dicom_objects: &[&InMemDicomObject]) -> Option<(f64, f64)> {
        dicom_objects.iter().find_map(|dicom_object| {
            let pixel_spacing = dicom_object
                .element(tags::PIXEL_SPACING)
                .ok()?
                .to_multi_float64()
                .ok()?;
            match pixel_spacing.as_slice() {
                [row, column, ..] if *row > 0.0 && *column > 0.0 => Some((*row, *column)),
                _ => None,
            }
        })
    }
}
