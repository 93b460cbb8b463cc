//! Error types for the orientation and transform engine.

use thiserror::Error;

use crate::math::Matrix4;

/// Main error type for geometry operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// The basis vectors of an image cannot be turned into a signed permutation.
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),

    /// An extent used as a divisor collapsed to zero.
    #[error("Zero extent on axis {axis}")]
    ZeroExtent { axis: usize },

    /// `PlaneOrientation::NotSpecified` reached an operation that needs a concrete plane.
    #[error("Plane orientation is not specified")]
    UnspecifiedPlane,

    #[error("Invalid zoom factor: {0}")]
    InvalidZoomFactor(f64),

    #[error("No images to compute a bounding box for")]
    NoImages,

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Slice index {index} out of range for {count} slices")]
    SliceOutOfRange { index: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Viewport dimensions must be finite and not negative.
    #[error("Invalid viewport {width} x {height}")]
    InvalidViewport { width: f64, height: f64 },

    /// Voxel spacing must be finite and positive on every axis.
    #[error("Invalid voxel size: {0}")]
    InvalidVoxelSize(String),

    #[error("Zoom anchor is not a finite position")]
    NonFiniteAnchor,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

impl GeometryError {
    pub fn invalid_orientation(msg: impl Into<String>) -> Self {
        Self::InvalidOrientation(msg.into())
    }

    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Recoverable failure of [`Matrix4::inverse_or_transpose`].
///
/// The matrix could not be inverted exactly. The transpose is carried along as a
/// best-effort approximation; whether that is good enough is up to the caller.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("Matrix is not invertible, falling back to its transpose")]
pub struct MatrixInversionFallback {
    pub transpose: Matrix4,
}

impl MatrixInversionFallback {
    pub fn into_transpose(self) -> Matrix4 {
        self.transpose
    }
}
