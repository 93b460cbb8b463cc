//! # DICOM-orientation library
//!
//! This crate maps voxel coordinates, physical coordinates and on-screen
//! plane coordinates into one another for the three medical viewing planes:
//!  - Axial
//!  - Sagittal
//!  - Coronal
//!
//! Images may be acquired in any orientation. Their row, column and slice
//! direction vectors are snapped to a signed permutation matrix, which is
//! combined with a fixed matrix per plane. Because every matrix involved is a
//! signed permutation, mapping back is an exact transpose and round trips do
//! not drift.
//!
//! On top of the coordinate mapping the crate computes:
//!   - bounding boxes of one or several images on a plane, either latched to
//!     a shared voxel grid or from their true physical extents
//!   - aspect-preserving scale and offset to fit an image into a viewport
//!   - the 2D affine view transform including radiological flips
//!   - zoom toward a cursor and pan, with the zoom/pan state owned by the
//!     caller
//!
//! Rendering, resampling and pixel decoding are left to other crates; the
//! outputs here are plain transforms, rectangles and coordinates.
//!
//! # Examples
//!
//! ## Fitting an axial slice into a viewport
//!
//! ```
//! # use dicom_orientation::{ImageGeometry, OrientationBasis, Plane, Vector4, view_transform};
//! let image = ImageGeometry::new(
//!     [256, 128, 40, 1],
//!     Vector4::direction(0.9, 0.9, 3.0),
//!     OrientationBasis::identity(),
//! )
//! .expect("identity basis is valid");
//! let transform = view_transform(&image, 512.0, 512.0, Plane::Axial)
//!     .expect("image has a non-zero extent");
//! // axial display mirrors the x axis
//! assert_eq!(transform.map(0.0, 0.0), (512.0, 128.0));
//! ```
//!
//! ## Reading series geometry from DICOM objects
//!
//! ```no_run
//! # use dicom_orientation::{GeometryLoader, SortBy};
//! # use dicom::object::open_file;
//! let objects = vec![open_file("dicom/1.dcm").expect("should have opened file")];
//! let geometry = GeometryLoader::load_from_file_objects(&objects, SortBy::ImagePositionPatient)
//!     .expect("should have read series geometry");
//! println!("{:?}", geometry.orientation());
//! ```

pub mod bounding_box;
pub mod config;
pub mod enums;
pub mod error;
pub mod geometry_loader;
pub mod image;
pub mod mapper;
pub mod math;
pub mod orientation;
pub mod plane;
pub mod view;
pub mod volume;
pub mod zoom;

pub use bounding_box::{
    BoundingBox, PlaneRect, ScalingAndOffset, physical_bounding_box, scaling_and_offset,
    scaling_and_offset_or_fallback, voxel_bounding_box,
};
pub use config::{MIN_ZOOM, RASTERING_FACTOR, ViewConfig};
pub use enums::{BasisAxis, MapDirection, Plane, PlaneOrientation, SortBy};
pub use error::{GeometryError, MatrixInversionFallback, Result};
pub use geometry_loader::{GeometryLoader, GeometryLoaderError};
pub use image::ImageGeometry;
pub use mapper::{CoordinateMapper, map_coords, map_index};
pub use math::{Affine2D, Matrix4, Vector4};
pub use orientation::{NormalizedOrientation, OrientationBasis};
pub use plane::map_physical_to_plane;
pub use view::{
    bounding_box_view_transform, display_flip_transform, image_placement_transform,
    in_plane_matrix, view_transform, view_transforms,
};
pub use volume::Volume;
pub use zoom::{ViewSession, ZoomOutcome, ZoomPanState, zoom_bounding_box};
