//! Fixed projection matrices of the anatomical planes.
//!
//! The matrices encode the radiological display convention. Downstream flip
//! and scale logic depends on their exact signs.

use crate::enums::Plane;
use crate::math::{Matrix4, Vector4};
use crate::orientation::NormalizedOrientation;

/// Axial: x negated, y and z unchanged.
pub const AXIAL_MATRIX: Matrix4 = Matrix4::from_rows([
    [-1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
]);

/// Sagittal: display x from y, display y from negated z, depth from x.
pub const SAGITTAL_MATRIX: Matrix4 = Matrix4::from_rows([
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
]);

/// Coronal: display x from negated x, display y from negated z, depth from y.
pub const CORONAL_MATRIX: Matrix4 = Matrix4::from_rows([
    [-1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
]);

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Axial, Plane::Sagittal, Plane::Coronal];

    pub fn matrix(self) -> &'static Matrix4 {
        match self {
            Plane::Axial => &AXIAL_MATRIX,
            Plane::Sagittal => &SAGITTAL_MATRIX,
            Plane::Coronal => &CORONAL_MATRIX,
        }
    }

    /// Physical axes spanning the plane, as `(horizontal, vertical)`.
    pub fn axes(self) -> (usize, usize) {
        match self {
            Plane::Axial => (0, 1),
            Plane::Sagittal => (1, 2),
            Plane::Coronal => (0, 2),
        }
    }

    /// `plane × orientation`: image space to plane display space.
    pub fn compose(self, orientation: &NormalizedOrientation) -> Matrix4 {
        *self.matrix() * *orientation.matrix()
    }
}

/// Reorders physical coordinates so the plane's axes come first, without
/// changing signs: axial `(x, y, z)`, sagittal `(y, z, x)`, coronal `(x, z, y)`.
pub fn map_physical_to_plane(coords: Vector4, plane: Plane) -> Vector4 {
    let c = coords;
    match plane {
        Plane::Axial => c,
        Plane::Sagittal => Vector4::new(c[1], c[2], c[0], c[3]),
        Plane::Coronal => Vector4::new(c[0], c[2], c[1], c[3]),
    }
}
