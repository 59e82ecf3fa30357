//! Matrix decomposition into translate / scale / skew / perspective / quaternion,
//! component-wise blending, and recomposition.

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

use crate::error::BlendError;
use crate::transform::Transform;

const PERSPECTIVE_DETERMINANT_EPSILON: f64 = 1e-8;
const QUATERNION_EPSILON: f64 = 1e-5;

/// Components of a decomposed transform. The quaternion is stored as (x, y, z, w).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTransform {
    pub translate: [f64; 3],
    pub scale: [f64; 3],
    pub skew: [f64; 3],
    pub perspective: [f64; 4],
    pub quaternion: [f64; 4],
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            scale: [1.0; 3],
            skew: [0.0; 3],
            perspective: [0.0, 0.0, 0.0, 1.0],
            quaternion: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[inline]
fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn length3(a: &[f64; 3]) -> f64 {
    dot3(a, a).sqrt()
}

#[inline]
fn scale3(a: &mut [f64; 3], factor: f64) {
    for v in a.iter_mut() {
        *v *= factor;
    }
}

/// `a = a - factor * b`.
#[inline]
fn subtract_scaled(a: &mut [f64; 3], b: &[f64; 3], factor: f64) {
    for i in 0..3 {
        a[i] -= factor * b[i];
    }
}

#[inline]
fn combine<const N: usize>(to: &[f64; N], from: &[f64; N], progress: f64) -> [f64; N] {
    let mut out = [0.0; N];
    for i in 0..N {
        out[i] = to[i] * progress + from[i] * (1.0 - progress);
    }
    out
}

/// Decompose `transform`.
///
/// Fails when the matrix cannot be normalized (zero homogeneous scale) or when the
/// perspective sub-matrix is singular.
pub fn decompose(transform: &Transform) -> Result<DecomposedTransform, BlendError> {
    let mut matrix = *transform.matrix();

    let w = matrix[(3, 3)];
    if w == 0.0 {
        return Err(BlendError::NotDecomposable);
    }
    matrix /= w;

    let mut perspective_matrix = matrix;
    for i in 0..3 {
        perspective_matrix[(3, i)] = 0.0;
    }
    perspective_matrix[(3, 3)] = 1.0;

    if perspective_matrix.determinant().abs() < PERSPECTIVE_DETERMINANT_EPSILON {
        return Err(BlendError::SingularPerspective);
    }

    let mut decomp = DecomposedTransform::default();

    if matrix[(3, 0)] != 0.0 || matrix[(3, 1)] != 0.0 || matrix[(3, 2)] != 0.0 {
        let rhs = Vector4::new(matrix[(3, 0)], matrix[(3, 1)], matrix[(3, 2)], matrix[(3, 3)]);
        let inverse = perspective_matrix
            .try_inverse()
            .ok_or(BlendError::SingularPerspective)?;
        let solved = inverse.transpose() * rhs;
        decomp.perspective = [solved.x, solved.y, solved.z, solved.w];
    }

    for i in 0..3 {
        decomp.translate[i] = matrix[(i, 3)];
    }

    // Rows here are the columns of the upper 3x3.
    let mut row = [[0.0f64; 3]; 3];
    for (i, r) in row.iter_mut().enumerate() {
        for (j, v) in r.iter_mut().enumerate() {
            *v = matrix[(j, i)];
        }
    }

    decomp.scale[0] = length3(&row[0]);
    if decomp.scale[0] != 0.0 {
        scale3(&mut row[0], 1.0 / decomp.scale[0]);
    }

    decomp.skew[0] = dot3(&row[0], &row[1]);
    let r0 = row[0];
    subtract_scaled(&mut row[1], &r0, decomp.skew[0]);

    decomp.scale[1] = length3(&row[1]);
    if decomp.scale[1] != 0.0 {
        scale3(&mut row[1], 1.0 / decomp.scale[1]);
        decomp.skew[0] /= decomp.scale[1];
    }

    decomp.skew[1] = dot3(&row[0], &row[2]);
    subtract_scaled(&mut row[2], &r0, decomp.skew[1]);
    decomp.skew[2] = dot3(&row[1], &row[2]);
    let r1 = row[1];
    subtract_scaled(&mut row[2], &r1, decomp.skew[2]);

    decomp.scale[2] = length3(&row[2]);
    if decomp.scale[2] != 0.0 {
        scale3(&mut row[2], 1.0 / decomp.scale[2]);
        decomp.skew[1] /= decomp.scale[2];
        decomp.skew[2] /= decomp.scale[2];
    }

    // The rows are orthonormal now. A negative triple product means a flipped basis.
    let pdum3 = cross3(&row[1], &row[2]);
    if dot3(&row[0], &pdum3) < 0.0 {
        for (i, r) in row.iter_mut().enumerate() {
            decomp.scale[i] *= -1.0;
            scale3(r, -1.0);
        }
    }

    let (r00, r11, r22) = (row[0][0], row[1][1], row[2][2]);
    let mut q = [
        0.5 * (1.0 + r00 - r11 - r22).max(0.0).sqrt(),
        0.5 * (1.0 - r00 + r11 - r22).max(0.0).sqrt(),
        0.5 * (1.0 - r00 - r11 + r22).max(0.0).sqrt(),
        0.5 * (1.0 + r00 + r11 + r22).max(0.0).sqrt(),
    ];
    if row[2][1] > row[1][2] {
        q[0] = -q[0];
    }
    if row[0][2] > row[2][0] {
        q[1] = -q[1];
    }
    if row[1][0] > row[0][1] {
        q[2] = -q[2];
    }
    decomp.quaternion = q;

    Ok(decomp)
}

/// Rebuild a transform: perspective, translate, rotate, skew, then scale.
pub fn compose(decomp: &DecomposedTransform) -> Transform {
    let mut matrix = Matrix4::<f64>::identity();
    for i in 0..4 {
        matrix[(3, i)] = decomp.perspective[i];
    }
    let mut result = Transform::from_matrix(matrix);

    let [tx, ty, tz] = decomp.translate;
    result.translate(tx, ty, tz);

    let [x, y, z, w] = decomp.quaternion;
    let rotation = Matrix4::new(
        1.0 - 2.0 * (y * y + z * z),
        2.0 * (x * y - z * w),
        2.0 * (x * z + y * w),
        0.0,
        2.0 * (x * y + z * w),
        1.0 - 2.0 * (x * x + z * z),
        2.0 * (y * z - x * w),
        0.0,
        2.0 * (x * z - y * w),
        2.0 * (y * z + x * w),
        1.0 - 2.0 * (x * x + y * y),
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    );
    result.pre_concat(&Transform::from_matrix(rotation));

    let shear = |row: usize, col: usize, value: f64| {
        let mut m = Matrix4::<f64>::identity();
        m[(row, col)] = value;
        Transform::from_matrix(m)
    };
    if decomp.skew[2] != 0.0 {
        result.pre_concat(&shear(1, 2, decomp.skew[2]));
    }
    if decomp.skew[1] != 0.0 {
        result.pre_concat(&shear(0, 2, decomp.skew[1]));
    }
    if decomp.skew[0] != 0.0 {
        result.pre_concat(&shear(0, 1, decomp.skew[0]));
    }

    let [sx, sy, sz] = decomp.scale;
    result.scale(sx, sy, sz);
    result
}

/// Spherical interpolation from `q1` to `q2` along the shorter arc.
///
/// Nearly equal (or exactly opposite) quaternions return `q1` unchanged.
pub fn slerp(q1: &[f64; 4], q2: &[f64; 4], progress: f64) -> [f64; 4] {
    let mut product = (q1[0] * q2[0] + q1[1] * q2[1] + q1[2] * q2[2] + q1[3] * q2[3]).clamp(-1.0, 1.0);

    let mut scale1 = 1.0;
    if product < 0.0 {
        product = -product;
        scale1 = -1.0;
    }

    if (product - 1.0).abs() < QUATERNION_EPSILON {
        return *q1;
    }

    let denom = (1.0 - product * product).sqrt();
    let theta = product.acos();
    let w = (progress * theta).sin() / denom;

    scale1 *= (progress * theta).cos() - product * w;
    let scale2 = w;

    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = q1[i] * scale1 + q2[i] * scale2;
    }
    out
}

/// Component-wise blend of two decompositions; rotation uses [`slerp`].
pub fn blend_decomposed(
    to: &DecomposedTransform,
    from: &DecomposedTransform,
    progress: f64,
) -> DecomposedTransform {
    DecomposedTransform {
        translate: combine(&to.translate, &from.translate, progress),
        scale: combine(&to.scale, &from.scale, progress),
        skew: combine(&to.skew, &from.skew, progress),
        perspective: combine(&to.perspective, &from.perspective, progress),
        quaternion: slerp(&from.quaternion, &to.quaternion, progress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_round_trip(t: Transform) {
        let d = decompose(&t).unwrap();
        let back = compose(&d);
        assert_relative_eq!(*back.matrix(), *t.matrix(), epsilon = 1e-9);
    }

    #[test]
    fn identity_decomposes_to_defaults() {
        let d = decompose(&Transform::identity()).unwrap();
        assert_eq!(d, DecomposedTransform::default());
    }

    #[test]
    fn compose_inverts_decompose() {
        let mut t = Transform::from_translation(3.0, -4.0, 5.0);
        t.rotate_about([0.3, 1.0, 0.2], 37.0);
        t.skew_x(15.0);
        t.scale(2.0, 0.5, 1.5);
        assert_round_trip(t);

        let mut p = Transform::from_perspective_depth(400.0);
        p.rotate_about([1.0, 0.0, 0.0], 30.0);
        assert_round_trip(p);

        assert_round_trip(Transform::from_scale(-1.0, 1.0, 1.0));
    }

    #[test]
    fn rotation_quaternion_sign() {
        let d = decompose(&Transform::from_rotation([0.0, 0.0, 1.0], 90.0)).unwrap();
        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(d.quaternion[2], half, epsilon = 1e-12);
        assert_relative_eq!(d.quaternion[3], half, epsilon = 1e-12);
    }

    #[test]
    fn singular_perspective_is_an_error() {
        let t = Transform::from_scale(0.0, 1.0, 1.0);
        assert_eq!(decompose(&t), Err(BlendError::SingularPerspective));
    }

    #[test]
    fn slerp_halfway_between_rotations() {
        let from = decompose(&Transform::identity()).unwrap();
        let to = decompose(&Transform::from_rotation([0.0, 0.0, 1.0], 90.0)).unwrap();
        let mid = compose(&blend_decomposed(&to, &from, 0.5));
        let expected = Transform::from_rotation([0.0, 0.0, 1.0], 45.0);
        assert_relative_eq!(*mid.matrix(), *expected.matrix(), epsilon = 1e-9);
    }

    #[test]
    fn slerp_equal_and_opposite_fall_back_to_first() {
        let q = [0.0, 0.0, 0.0, 1.0];
        assert_eq!(slerp(&q, &q, 0.3), q);
        assert_eq!(slerp(&q, &[0.0, 0.0, 0.0, -1.0], 0.3), q);
    }
}
