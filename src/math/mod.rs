//! Small fixed-size linear algebra for orientation work.
//!
//! Every matrix the engine builds is a signed permutation or close to one, so
//! a 4×4 matrix with product, transpose and an exact-inverse-or-transpose
//! operation is all that is needed.

mod affine;
mod matrix;
mod vector;

pub use affine::Affine2D;
pub use matrix::Matrix4;
pub use vector::Vector4;
