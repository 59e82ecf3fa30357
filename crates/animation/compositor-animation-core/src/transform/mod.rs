//! 4x4 transforms, decomposition and operation lists.
//!
//! Matrices act on column vectors; translation lives in column 3 and the
//! perspective terms in row 3. `pre_concat(other)` yields `self * other`, so
//! `other` is applied to points first.

pub mod decompose;
pub mod operations;

use nalgebra::{Matrix4, Rotation3, Unit, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::BlendError;
use crate::geometry::{BoxF, Point3};

pub use decompose::DecomposedTransform;
pub use operations::{TransformOperation, TransformOperations};

/// A 4x4 affine or projective transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[inline]
fn tan_degrees(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Build from 16 values in row-major order.
    pub fn from_row_major(values: [f64; 16]) -> Self {
        Self {
            matrix: Matrix4::from_row_slice(&values),
        }
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(x, y, z)),
        }
    }

    pub fn from_scale(x: f64, y: f64, z: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)),
        }
    }

    /// Rotation by `degrees` about `axis`. A zero-length axis yields identity.
    pub fn from_rotation(axis: [f64; 3], degrees: f64) -> Self {
        let Some(axis) = Unit::try_new(Vector3::new(axis[0], axis[1], axis[2]), 0.0) else {
            return Self::identity();
        };
        Self {
            matrix: Rotation3::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous(),
        }
    }

    pub fn from_skew_x(degrees: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(0, 1)] = tan_degrees(degrees);
        Self { matrix }
    }

    pub fn from_skew_y(degrees: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(1, 0)] = tan_degrees(degrees);
        Self { matrix }
    }

    /// Combined skew with both shear terms in one matrix.
    pub fn from_skew(x_degrees: f64, y_degrees: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(0, 1)] = tan_degrees(x_degrees);
        matrix[(1, 0)] = tan_degrees(y_degrees);
        Self { matrix }
    }

    /// Perspective projection with the viewer at `depth`. Zero depth is identity.
    pub fn from_perspective_depth(depth: f64) -> Self {
        let mut matrix = Matrix4::identity();
        if depth != 0.0 {
            matrix[(3, 2)] = -1.0 / depth;
        }
        Self { matrix }
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[(row, col)]
    }

    /// `self = self * other`.
    pub fn pre_concat(&mut self, other: &Transform) {
        self.matrix *= other.matrix;
    }

    /// `self = other * self`.
    pub fn concat(&mut self, other: &Transform) {
        self.matrix = other.matrix * self.matrix;
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.pre_concat(&Self::from_translation(x, y, z));
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.pre_concat(&Self::from_scale(x, y, z));
    }

    pub fn rotate_about(&mut self, axis: [f64; 3], degrees: f64) {
        self.pre_concat(&Self::from_rotation(axis, degrees));
    }

    pub fn skew_x(&mut self, degrees: f64) {
        self.pre_concat(&Self::from_skew_x(degrees));
    }

    pub fn skew_y(&mut self, degrees: f64) {
        self.pre_concat(&Self::from_skew_y(degrees));
    }

    pub fn skew(&mut self, x_degrees: f64, y_degrees: f64) {
        self.pre_concat(&Self::from_skew(x_degrees, y_degrees));
    }

    pub fn apply_perspective_depth(&mut self, depth: f64) {
        if depth != 0.0 {
            self.pre_concat(&Self::from_perspective_depth(depth));
        }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    fn has_no_perspective(&self) -> bool {
        let m = &self.matrix;
        m[(3, 0)] == 0.0 && m[(3, 1)] == 0.0 && m[(3, 2)] == 0.0 && m[(3, 3)] == 1.0
    }

    pub fn has_perspective(&self) -> bool {
        !self.has_no_perspective()
    }

    pub fn is_identity_or_translation(&self) -> bool {
        let m = &self.matrix;
        self.has_no_perspective()
            && (0..3).all(|r| (0..3).all(|c| m[(r, c)] == if r == c { 1.0 } else { 0.0 }))
    }

    /// True when the upper 3x3 is diagonal and there is no perspective.
    pub fn is_scale_or_translation(&self) -> bool {
        let m = &self.matrix;
        self.has_no_perspective() && (0..3).all(|r| (0..3).all(|c| r == c || m[(r, c)] == 0.0))
    }

    pub fn is_invertible(&self) -> bool {
        self.matrix.determinant().abs() > f64::EPSILON
    }

    /// Replace `self` (the "to" transform) with its decomposed blend from `from`.
    ///
    /// On failure `self` is left unchanged.
    pub fn blend(&mut self, from: &Transform, progress: f64) -> Result<(), BlendError> {
        let to_decomp = decompose::decompose(self)?;
        let from_decomp = decompose::decompose(from)?;
        let blended = decompose::blend_decomposed(&to_decomp, &from_decomp, progress);
        *self = decompose::compose(&blended);
        Ok(())
    }

    /// Map a point, dividing by the homogeneous coordinate when it is non-zero.
    pub fn map_point(&self, point: Point3) -> Point3 {
        let v = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        if v.w != 0.0 && v.w != 1.0 {
            Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
        } else {
            Point3::new(v.x, v.y, v.z)
        }
    }

    /// Bounding box of the mapped corners of `bbox`.
    pub fn map_box(&self, bbox: &BoxF) -> BoxF {
        let corners = bbox.corners().map(|c| self.map_point(c));
        BoxF::bounding(&corners)
    }
}
