use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};

/// One of the three canonical anatomical planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plane {
    Axial,
    Sagittal,
    Coronal,
}

/// Plane selection as it arrives from the UI, which may not be resolved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaneOrientation {
    Axial,
    Sagittal,
    Coronal,
    #[default]
    NotSpecified,
}

impl PlaneOrientation {
    /// Resolves to a concrete [`Plane`].
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnspecifiedPlane`] for `NotSpecified`.
    pub fn resolve(self) -> Result<Plane> {
        match self {
            PlaneOrientation::Axial => Ok(Plane::Axial),
            PlaneOrientation::Sagittal => Ok(Plane::Sagittal),
            PlaneOrientation::Coronal => Ok(Plane::Coronal),
            PlaneOrientation::NotSpecified => Err(GeometryError::UnspecifiedPlane),
        }
    }
}

impl From<Plane> for PlaneOrientation {
    fn from(plane: Plane) -> Self {
        match plane {
            Plane::Axial => PlaneOrientation::Axial,
            Plane::Sagittal => PlaneOrientation::Sagittal,
            Plane::Coronal => PlaneOrientation::Coronal,
        }
    }
}

impl TryFrom<PlaneOrientation> for Plane {
    type Error = GeometryError;

    fn try_from(value: PlaneOrientation) -> Result<Self> {
        value.resolve()
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Plane::Axial => "axial",
            Plane::Sagittal => "sagittal",
            Plane::Coronal => "coronal",
        };
        f.write_str(name)
    }
}

/// Direction of a coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapDirection {
    /// Image space to plane display space.
    #[default]
    Forward,
    /// Plane display space back to image space.
    Back,
}

/// The three direction vectors of an acquisition basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisAxis {
    Row,
    Column,
    Slice,
}

impl BasisAxis {
    pub const ALL: [BasisAxis; 3] = [BasisAxis::Row, BasisAxis::Column, BasisAxis::Slice];

    /// Voxel axis slot this direction vector describes.
    pub fn slot(self) -> usize {
        match self {
            BasisAxis::Row => 0,
            BasisAxis::Column => 1,
            BasisAxis::Slice => 2,
        }
    }
}

impl fmt::Display for BasisAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BasisAxis::Row => "row",
            BasisAxis::Column => "column",
            BasisAxis::Slice => "slice",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}
